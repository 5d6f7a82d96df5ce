//! Binary protocol row value decoding.
use bytes::Bytes;
use std::{borrow::Cow, fmt, str::Utf8Error, string::FromUtf8Error, sync::Arc};

use crate::{
    bind::{BindSlot, ResultBinds},
    column::Column,
    mysql::{FieldType, MysqlTime, TemporalKind},
    row::Row,
    value::{DateTimeValue, DateValue, TimeValue, Value},
};

/// Decode one bound column buffer into a [`Value`].
///
/// The null flag wins over everything, a null cell decodes to
/// [`Value::Null`] regardless of type. Temporal buffers dispatch on the
/// record's own discriminant because the server may report a narrower shape
/// than the column's static type.
pub fn decode_binary(slot: BindSlot, col: &Column) -> Result<Value, DecodeError> {
    if slot.error {
        return Err(DecodeError::Flagged);
    }
    if slot.is_null {
        return Ok(Value::Null);
    }

    macro_rules! le {
        ($ty:ty) => {{
            let mut le = [0u8; size_of::<$ty>()];
            le.copy_from_slice(&slot.buffer[..size_of::<$ty>()]);
            <$ty>::from_le_bytes(le)
        }};
    }

    Ok(match slot.ty {
        FieldType::Null => Value::Null,

        FieldType::Tiny => {
            let v = slot.buffer[0] as i8;
            match col.length() == 1 {
                true => Value::Bool(v != 0),
                false => Value::Number(v as f64),
            }
        },

        FieldType::Short | FieldType::Year => Value::Number(le!(i16) as f64),
        FieldType::Int24 | FieldType::Long => Value::Number(le!(i32) as f64),
        FieldType::Float => Value::Number(le!(f32) as f64),
        FieldType::Double => Value::Number(le!(f64)),

        FieldType::LongLong => match col.is_unsigned() {
            true => Value::UInt(le!(u64)),
            false => Value::Int(le!(i64)),
        },

        ty if ty.is_temporal() => {
            let t = MysqlTime::read(slot.buffer).ok_or(DecodeError::Parse(ty))?;
            decode_temporal(t, ty)?
        },

        ty if ty.is_bytes() => {
            let len = (slot.length as usize).min(slot.buffer.len());
            Value::Bytes(Bytes::copy_from_slice(&slot.buffer[..len]))
        },

        ty => return Err(DecodeError::Unsupported(ty)),
    })
}

fn decode_temporal(t: MysqlTime, ty: FieldType) -> Result<Value, DecodeError> {
    Ok(match t.kind {
        TemporalKind::Date => Value::Date(DateValue {
            year: t.year,
            month: t.month,
            day: t.day,
        }),

        TemporalKind::Time => Value::Time(TimeValue {
            hours: t.hour,
            minutes: t.minute,
            seconds: t.second,
        }),

        // TIMESTAMP carries UTC and omits the displacement,
        // DATETIME carries local time plus displacement.
        TemporalKind::Datetime => {
            let timestamp = matches!(ty, FieldType::Timestamp | FieldType::Timestamp2);
            Value::DateTime(DateTimeValue {
                year: t.year,
                month: t.month,
                day: t.day,
                hours: t.hour,
                minutes: t.minute,
                seconds: t.second,
                microseconds: t.microsecond,
                offset: (!timestamp).then_some(t.offset),
            })
        },

        kind => return Err(DecodeError::Temporal(kind)),
    })
}

/// Decode one fetched row of bound buffers into a [`Row`].
pub fn decode_row(binds: &ResultBinds, columns: &Arc<[Column]>) -> Result<Row, DecodeError> {
    let mut values = Vec::with_capacity(columns.len());
    for (i, col) in columns.iter().enumerate() {
        values.push(decode_binary(binds.slot(i), col)?);
    }
    Ok(Row::new(Arc::clone(columns), values))
}

/// A type that can be constructed from a decoded [`Value`].
///
/// This is the adapter seam between the codec and a host value model.
pub trait FromValue: Sized {
    /// Try construct self from a value.
    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value.is_null() {
            true => Ok(None),
            false => T::from_value(value).map(Some),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(v) => Ok(v),
            v => Err(v.shape_error("bool")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Number(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            v => Err(v.shape_error("number")),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Int(v) => Ok(v),
            Value::UInt(v) => i64::try_from(v).map_err(|_| Value::UInt(v).shape_error("int")),
            Value::Number(v) if v.fract() == 0.0 => Ok(v as i64),
            v => Err(v.shape_error("int")),
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::UInt(v) => Ok(v),
            Value::Int(v) => u64::try_from(v).map_err(|_| Value::Int(v).shape_error("uint")),
            Value::Number(v) if v.fract() == 0.0 && v >= 0.0 => Ok(v as u64),
            v => Err(v.shape_error("uint")),
        }
    }
}

impl FromValue for Bytes {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bytes(v) => Ok(v),
            v => Err(v.shape_error("bytes")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bytes(v) => Ok(String::from_utf8(v.into())?),
            v => Err(v.shape_error("bytes")),
        }
    }
}

impl Value {
    pub(crate) fn shape_error(&self, expected: &'static str) -> DecodeError {
        match self {
            Value::Null => DecodeError::Null,
            v => DecodeError::Shape { expected, got: v.shape() },
        }
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for DecodeError {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

/// An error when decoding a row value.
pub enum DecodeError {
    /// The client library flagged the column as errored.
    Flagged,
    /// Wire type the codec does not implement.
    Unsupported(FieldType),
    /// Bound temporal record carries an unsupported discriminant.
    Temporal(TemporalKind),
    /// Cell content is malformed for its column type.
    Parse(FieldType),
    /// Unexpected NULL value.
    Null,
    /// Value shape mismatch in typed extraction.
    Shape {
        expected: &'static str,
        got: &'static str,
    },
    /// Column requested not found.
    ColumnNotFound(Cow<'static, str>),
    /// Server returned non utf8 string.
    Utf8(Utf8Error),
    /// Failed to deserialize using `serde_json`.
    #[cfg(feature = "json")]
    Json(serde_json::error::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode value, ")?;
        match self {
            Self::Flagged => f.write_str("column error flag is set"),
            Self::Unsupported(ty) => write!(f, "unsupported wire type {ty:?}"),
            Self::Temporal(kind) => write!(f, "unexpected time type {}", kind.code()),
            Self::Parse(ty) => write!(f, "malformed cell for {ty:?}"),
            Self::Null => f.write_str("unexpected NULL value"),
            Self::Shape { expected, got } => write!(f, "expected {expected}, got {got}"),
            Self::ColumnNotFound(name) => write!(f, "column not found: {name:?}"),
            Self::Utf8(e) => write!(f, "{e}"),
            #[cfg(feature = "json")]
            Self::Json(e) => write!(f, "{e}"),
        }
    }
}

from!(<Utf8Error>e => Self::Utf8(e));
from!(<FromUtf8Error>e => Self::Utf8(e.utf8_error()));
#[cfg(feature = "json")]
from!(<serde_json::error::Error>e => Self::Json(e));

impl std::error::Error for DecodeError { }

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
