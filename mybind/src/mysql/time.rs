// Decomposed temporal bound-buffer record.
//
// year
// month
// day
// hour
// minute
// second
// microsecond
// timezone displacement
// negative flag
// temporal kind
const YEAR: usize = 0;
const MONTH: usize = 4;
const DAY: usize = 8;
const HOUR: usize = 12;
const MINUTE: usize = 16;
const SECOND: usize = 20;
const MICROSECOND: usize = 24;
const OFFSET: usize = 28;
const NEGATIVE: usize = 32;
const KIND: usize = 33;

/// Which shape a decomposed temporal record actually carries.
///
/// The server may report a narrower shape than the column's static type,
/// so decoding dispatches on this discriminant, not on [`FieldType`][1].
///
/// The discriminants mirror `enum_mysql_timestamp_type`.
///
/// [1]: crate::mysql::FieldType
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum TemporalKind {
    None = -2,
    Error = -1,
    Date = 0,
    Datetime = 1,
    Time = 2,
    DatetimeTz = 3,
}

impl TemporalKind {
    pub const fn from_code(code: i8) -> Option<TemporalKind> {
        Some(match code {
            -2 => Self::None,
            -1 => Self::Error,
            0 => Self::Date,
            1 => Self::Datetime,
            2 => Self::Time,
            3 => Self::DatetimeTz,
            _ => return None,
        })
    }

    pub const fn code(self) -> i8 {
        self as i8
    }
}

/// Decomposed date/time record exchanged through a bound buffer.
///
/// Fixed little-endian layout of [`MysqlTime::SIZE`] bytes, the buffer shape
/// every temporal column is bound to in the binary protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MysqlTime {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub microsecond: u32,
    /// Timezone displacement in seconds east of UTC.
    pub offset: i32,
    pub negative: bool,
    pub kind: TemporalKind,
}

impl MysqlTime {
    /// Byte length of the serialized record.
    pub const SIZE: usize = 34;

    pub const ZERO: MysqlTime = MysqlTime {
        year: 0,
        month: 0,
        day: 0,
        hour: 0,
        minute: 0,
        second: 0,
        microsecond: 0,
        offset: 0,
        negative: false,
        kind: TemporalKind::None,
    };

    /// Read a record from the start of `buf`.
    ///
    /// Returns [`None`] if `buf` is too short or the discriminant byte is
    /// not a known kind.
    pub fn read(buf: &[u8]) -> Option<MysqlTime> {
        if buf.len() < Self::SIZE {
            return None;
        }
        let u32_at = |at: usize| u32::from_le_bytes(buf[at..at + 4].try_into().unwrap());
        Some(MysqlTime {
            year: u32_at(YEAR),
            month: u32_at(MONTH),
            day: u32_at(DAY),
            hour: u32_at(HOUR),
            minute: u32_at(MINUTE),
            second: u32_at(SECOND),
            microsecond: u32_at(MICROSECOND),
            offset: i32::from_le_bytes(buf[OFFSET..OFFSET + 4].try_into().unwrap()),
            negative: buf[NEGATIVE] != 0,
            kind: TemporalKind::from_code(buf[KIND] as i8)?,
        })
    }

    /// Write the record to the start of `buf`.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`MysqlTime::SIZE`].
    pub fn write(&self, buf: &mut [u8]) {
        buf[YEAR..YEAR + 4].copy_from_slice(&self.year.to_le_bytes());
        buf[MONTH..MONTH + 4].copy_from_slice(&self.month.to_le_bytes());
        buf[DAY..DAY + 4].copy_from_slice(&self.day.to_le_bytes());
        buf[HOUR..HOUR + 4].copy_from_slice(&self.hour.to_le_bytes());
        buf[MINUTE..MINUTE + 4].copy_from_slice(&self.minute.to_le_bytes());
        buf[SECOND..SECOND + 4].copy_from_slice(&self.second.to_le_bytes());
        buf[MICROSECOND..MICROSECOND + 4].copy_from_slice(&self.microsecond.to_le_bytes());
        buf[OFFSET..OFFSET + 4].copy_from_slice(&self.offset.to_le_bytes());
        buf[NEGATIVE] = self.negative as u8;
        buf[KIND] = self.kind.code() as u8;
    }
}

#[cfg(test)]
mod test {
    use super::{MysqlTime, TemporalKind};

    #[test]
    fn buffer_round_trip() {
        let t = MysqlTime {
            year: 2024,
            month: 3,
            day: 5,
            hour: 13,
            minute: 45,
            second: 9,
            microsecond: 125_000,
            offset: 7200,
            negative: false,
            kind: TemporalKind::Datetime,
        };
        let mut buf = [0u8; MysqlTime::SIZE];
        t.write(&mut buf);
        assert_eq!(MysqlTime::read(&buf), Some(t));
    }

    #[test]
    fn negative_kinds_survive() {
        let mut buf = [0u8; MysqlTime::SIZE];
        let mut t = MysqlTime::ZERO;
        t.kind = TemporalKind::Error;
        t.write(&mut buf);
        assert_eq!(MysqlTime::read(&buf).unwrap().kind, TemporalKind::Error);
    }

    #[test]
    fn short_buffer() {
        assert_eq!(MysqlTime::read(&[0u8; 8]), None);
    }
}
