//! Text protocol row value decoding.
//!
//! On the non-prepared query path every wire value arrives as ASCII text
//! and is parsed per column type.
use bytes::Bytes;
use std::sync::Arc;

use crate::{
    column::Column,
    decode::DecodeError,
    mysql::FieldType,
    row::Row,
    value::{DateTimeValue, DateValue, TimeValue, Value},
};

/// Decode one text protocol cell into a [`Value`].
///
/// An absent cell is SQL `NULL` and decodes to [`Value::Null`]
/// unconditionally.
pub fn decode_text(cell: Option<&[u8]>, col: &Column) -> Result<Value, DecodeError> {
    let Some(cell) = cell else {
        return Ok(Value::Null);
    };

    let ty = col.ty();
    Ok(match ty {
        FieldType::Null => Value::Null,

        FieldType::Tiny => {
            let v = int(cell, ty)?;
            match col.length() == 1 {
                true => Value::Bool(v != 0),
                false => Value::Number(v as f64),
            }
        },

        FieldType::Short
        | FieldType::Year
        | FieldType::Int24
        | FieldType::Long
        | FieldType::LongLong => Value::Number(int(cell, ty)? as f64),

        FieldType::Float | FieldType::Double => {
            let s = std::str::from_utf8(cell).map_err(|_| DecodeError::Parse(ty))?;
            Value::Number(s.parse().map_err(|_| DecodeError::Parse(ty))?)
        },

        // YYYY-MM-DD
        FieldType::Date => {
            let [year, month, day] = split(cell, b'-', ty)?;
            Value::Date(DateValue { year, month, day })
        },

        // HH:MM:SS
        FieldType::Time => {
            let [hours, minutes, seconds] = split(cell, b':', ty)?;
            Value::Time(TimeValue { hours, minutes, seconds })
        },

        // YYYY-MM-DD HH:MM:SS, with a .ffffff suffix past 19 bytes
        FieldType::Timestamp | FieldType::Datetime | FieldType::Timestamp2 => {
            let (head, microseconds) = match cell.len() == 19 {
                true => (cell, 0),
                false => {
                    let dot = cell
                        .iter()
                        .position(|b| *b == b'.')
                        .ok_or(DecodeError::Parse(ty))?;
                    (&cell[..dot], uint(&cell[dot + 1..], ty)?)
                },
            };
            let space = head
                .iter()
                .position(|b| *b == b' ')
                .ok_or(DecodeError::Parse(ty))?;
            let [year, month, day] = split(&head[..space], b'-', ty)?;
            let [hours, minutes, seconds] = split(&head[space + 1..], b':', ty)?;
            Value::DateTime(DateTimeValue {
                year,
                month,
                day,
                hours,
                minutes,
                seconds,
                microseconds,
                // text protocol carries no displacement, DATETIME reports zero
                offset: matches!(ty, FieldType::Datetime).then_some(0),
            })
        },

        ty if ty.is_bytes() => Value::Bytes(Bytes::copy_from_slice(cell)),

        ty => return Err(DecodeError::Unsupported(ty)),
    })
}

/// Decode one text protocol row into a [`Row`].
pub fn decode_text_row(
    cells: &[Option<Bytes>],
    columns: &Arc<[Column]>,
) -> Result<Row, DecodeError> {
    debug_assert_eq!(cells.len(), columns.len());
    let mut values = Vec::with_capacity(columns.len());
    for (cell, col) in cells.iter().zip(columns.iter()) {
        values.push(decode_text(cell.as_deref(), col)?);
    }
    Ok(Row::new(Arc::clone(columns), values))
}

fn int(cell: &[u8], ty: FieldType) -> Result<i64, DecodeError> {
    std::str::from_utf8(cell)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(DecodeError::Parse(ty))
}

fn uint(cell: &[u8], ty: FieldType) -> Result<u32, DecodeError> {
    std::str::from_utf8(cell)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(DecodeError::Parse(ty))
}

/// Parse three `sep`-separated unsigned fields.
fn split(cell: &[u8], sep: u8, ty: FieldType) -> Result<[u32; 3], DecodeError> {
    let mut parts = cell.split(|b| *b == sep);
    let mut next = || {
        parts
            .next()
            .and_then(|p| std::str::from_utf8(p).ok())
            .and_then(|s| s.parse().ok())
            .ok_or(DecodeError::Parse(ty))
    };
    Ok([next()?, next()?, next()?])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mysql::FieldType::*;

    fn col(ty: FieldType, length: u32) -> Column {
        Column::new("c", ty, length)
    }

    fn d(cell: &[u8], col: &Column) -> Result<Value, DecodeError> {
        decode_text(Some(cell), col)
    }

    #[test]
    fn tiny_bool_coercion() {
        assert_eq!(d(b"1", &col(Tiny, 1)).unwrap(), Value::Bool(true));
        assert_eq!(d(b"0", &col(Tiny, 1)).unwrap(), Value::Bool(false));
        assert_eq!(d(b"1", &col(Tiny, 4)).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn integer_types_widen() {
        assert_eq!(d(b"-7", &col(Short, 6)).unwrap(), Value::Number(-7.0));
        assert_eq!(d(b"2024", &col(Year, 4)).unwrap(), Value::Number(2024.0));
        assert_eq!(
            d(b"123456", &col(Long, 11)).unwrap(),
            Value::Number(123456.0),
        );
        assert_eq!(
            d(b"-9000000000", &col(LongLong, 20)).unwrap(),
            Value::Number(-9000000000.0),
        );
    }

    #[test]
    fn floats() {
        assert_eq!(d(b"1.5", &col(Float, 12)).unwrap(), Value::Number(1.5));
        assert_eq!(d(b"-8.25", &col(Double, 22)).unwrap(), Value::Number(-8.25));
    }

    #[test]
    fn date() {
        assert_eq!(
            d(b"2024-03-05", &col(Date, 10)).unwrap(),
            Value::Date(DateValue { year: 2024, month: 3, day: 5 }),
        );
    }

    #[test]
    fn time() {
        assert_eq!(
            d(b"13:45:09", &col(Time, 10)).unwrap(),
            Value::Time(TimeValue { hours: 13, minutes: 45, seconds: 9 }),
        );
    }

    #[test]
    fn datetime_with_fraction() {
        let v = d(b"2024-03-05 13:45:09.125000", &col(Datetime, 26)).unwrap();
        assert_eq!(
            v,
            Value::DateTime(DateTimeValue {
                year: 2024,
                month: 3,
                day: 5,
                hours: 13,
                minutes: 45,
                seconds: 9,
                microseconds: 125_000,
                offset: Some(0),
            }),
        );
    }

    #[test]
    fn datetime_length_19_has_no_fraction() {
        let v = d(b"2024-03-05 13:45:09", &col(Datetime, 19)).unwrap();
        let Value::DateTime(dt) = v else { panic!("expected datetime, got {v:?}") };
        assert_eq!(dt.microseconds, 0);
        assert_eq!(dt.seconds, 9);
    }

    #[test]
    fn timestamp_has_no_offset_field() {
        for ty in [Timestamp, Timestamp2] {
            let v = d(b"2024-03-05 13:45:09", &col(ty, 19)).unwrap();
            let Value::DateTime(dt) = v else { panic!("expected datetime, got {v:?}") };
            assert_eq!(dt.offset, None, "{ty:?}");
        }
    }

    #[test]
    fn bytes_verbatim() {
        let v = d(b"O'Brien", &col(VarString, 32)).unwrap();
        assert_eq!(v, Value::Bytes(Bytes::from_static(b"O'Brien")));
        let v = d(b"12.50", &col(NewDecimal, 12)).unwrap();
        assert_eq!(v, Value::Bytes(Bytes::from_static(b"12.50")));
    }

    #[test]
    fn null_cell_wins_for_every_type() {
        for ty in [
            Tiny, Short, Year, Int24, Long, LongLong, Float, Double, Date, Time, Timestamp,
            Timestamp2, Datetime, Json, NewDecimal, Varchar, Bit, Blob, VarString, String, Null,
        ] {
            assert_eq!(decode_text(None, &col(ty, 4)).unwrap(), Value::Null, "{ty:?}");
        }
    }

    #[test]
    fn malformed_cells() {
        assert!(matches!(
            d(b"abc", &col(Long, 11)),
            Err(DecodeError::Parse(Long)),
        ));
        assert!(matches!(
            d(b"2024-03", &col(Date, 10)),
            Err(DecodeError::Parse(Date)),
        ));
        assert!(matches!(
            d(b"2024-03-05", &col(Datetime, 19)),
            Err(DecodeError::Parse(Datetime)),
        ));
    }

    #[test]
    fn unsupported_type() {
        assert!(matches!(
            d(b"x", &col(Set, 4)),
            Err(DecodeError::Unsupported(Set)),
        ));
    }
}
