//! The dynamic value model.
//!
//! [`Value`] is what decoding produces and encoding consumes. Temporal
//! column values decompose into named integer fields ([`DateValue`],
//! [`TimeValue`], [`DateTimeValue`]) rather than an opaque timestamp.
use bytes::Bytes;

use crate::ext::FmtExt;

/// A decoded MySQL value.
///
/// 64-bit integers are kept distinct from the generic [`Number`][Value::Number]
/// representation so `BIGINT` values survive without precision loss.
#[derive(Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Generic numeric, the widened form of every fixed-width numeric type
    /// below 64 bits.
    Number(f64),
    /// Distinguished signed 64-bit integer.
    Int(i64),
    /// Distinguished unsigned 64-bit integer.
    UInt(u64),
    /// String or binary payload, kept opaque.
    Bytes(Bytes),
    Date(DateValue),
    Time(TimeValue),
    DateTime(DateTimeValue),
}

/// Decomposed date-only value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

/// Decomposed time-only value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

/// Decomposed datetime/timestamp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeValue {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub microseconds: u32,
    /// Timezone displacement in seconds east of UTC.
    ///
    /// Present only for `DATETIME` columns; `TIMESTAMP` carries UTC and
    /// omits it.
    pub offset: Option<i32>,
}

impl Value {
    /// Returns `true` if the value is [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the value shape, for error reporting.
    pub const fn shape(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Borrow the payload of a [`Value::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Borrow the payload of a [`Value::Bytes`] as utf8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => v.fmt(f),
            Value::Number(v) => v.fmt(f),
            Value::Int(v) => v.fmt(f),
            Value::UInt(v) => v.fmt(f),
            Value::Bytes(v) => v.lossy().fmt(f),
            Value::Date(v) => v.fmt(f),
            Value::Time(v) => v.fmt(f),
            Value::DateTime(v) => v.fmt(f),
        }
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Value {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

from!(<bool>v => Value::Bool(v));
from!(<f64>v => Value::Number(v));
from!(<i64>v => Value::Int(v));
from!(<u64>v => Value::UInt(v));
from!(<Bytes>v => Value::Bytes(v));
from!(<&str>v => Value::Bytes(Bytes::copy_from_slice(v.as_bytes())));
from!(<String>v => Value::Bytes(Bytes::from(v.into_bytes())));
from!(<&[u8]>v => Value::Bytes(Bytes::copy_from_slice(v)));
from!(<DateValue>v => Value::Date(v));
from!(<TimeValue>v => Value::Time(v));
from!(<DateTimeValue>v => Value::DateTime(v));

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
