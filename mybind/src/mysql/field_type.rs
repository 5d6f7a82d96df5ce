/// MySQL on-the-wire column type tag.
///
/// The discriminants are the protocol type codes as reported in column
/// definition metadata.
///
/// <https://dev.mysql.com/doc/dev/mysql-server/latest/field__types_8h.html>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FieldType {
    Decimal = 0,
    Tiny = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    Null = 6,
    Timestamp = 7,
    LongLong = 8,
    Int24 = 9,
    Date = 10,
    Time = 11,
    Datetime = 12,
    Year = 13,
    NewDate = 14,
    Varchar = 15,
    Bit = 16,
    Timestamp2 = 17,
    Datetime2 = 18,
    Time2 = 19,
    Json = 245,
    NewDecimal = 246,
    Enum = 247,
    Set = 248,
    TinyBlob = 249,
    MediumBlob = 250,
    LongBlob = 251,
    Blob = 252,
    VarString = 253,
    String = 254,
    Geometry = 255,
}

impl FieldType {
    /// Try convert a wire type code into `FieldType`.
    pub const fn from_code(code: u8) -> Option<FieldType> {
        Some(match code {
            0 => Self::Decimal,
            1 => Self::Tiny,
            2 => Self::Short,
            3 => Self::Long,
            4 => Self::Float,
            5 => Self::Double,
            6 => Self::Null,
            7 => Self::Timestamp,
            8 => Self::LongLong,
            9 => Self::Int24,
            10 => Self::Date,
            11 => Self::Time,
            12 => Self::Datetime,
            13 => Self::Year,
            14 => Self::NewDate,
            15 => Self::Varchar,
            16 => Self::Bit,
            17 => Self::Timestamp2,
            18 => Self::Datetime2,
            19 => Self::Time2,
            245 => Self::Json,
            246 => Self::NewDecimal,
            247 => Self::Enum,
            248 => Self::Set,
            249 => Self::TinyBlob,
            250 => Self::MediumBlob,
            251 => Self::LongBlob,
            252 => Self::Blob,
            253 => Self::VarString,
            254 => Self::String,
            255 => Self::Geometry,
            _ => return None,
        })
    }

    /// Returns the wire type code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Return `true` for the variable-width textual/binary family
    /// (decimal, json, bit, blob variants, fixed/variable string).
    pub const fn is_bytes(self) -> bool {
        matches!(
            self,
            Self::Json
                | Self::NewDecimal
                | Self::Varchar
                | Self::Bit
                | Self::TinyBlob
                | Self::MediumBlob
                | Self::LongBlob
                | Self::Blob
                | Self::VarString
                | Self::String
        )
    }

    /// Return `true` for the temporal family handled by the codec.
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Timestamp | Self::Date | Self::Time | Self::Datetime | Self::Timestamp2
        )
    }
}

#[cfg(test)]
mod test {
    use super::FieldType;

    #[test]
    fn code_round_trip() {
        for code in 0u8..=255 {
            if let Some(ty) = FieldType::from_code(code) {
                assert_eq!(ty.code(), code);
            }
        }
        assert_eq!(FieldType::from_code(20), None);
        assert_eq!(FieldType::from_code(244), None);
    }
}
