//! Prepared statement parameter encoding.
use bytes::Bytes;
use std::fmt;

use crate::{mysql::FieldType, value::Value};

const INLINE_LEN: usize = 8;

/// Backing storage of one encoded parameter.
///
/// Fixed-width values are stored inline, payload values borrow the caller's
/// bytes without copying.
enum ParamBuf<'q> {
    Slice(&'q [u8]),
    Inline { len: u8, value: [u8; INLINE_LEN] },
    Bytes(Bytes),
}

impl ParamBuf<'_> {
    fn inline(slice: &[u8]) -> ParamBuf<'static> {
        let len = slice.len();
        assert!(len <= INLINE_LEN, "inline slice is too large");
        let mut value = [0u8; INLINE_LEN];
        value[..len].copy_from_slice(slice);
        ParamBuf::Inline { len: len as u8, value }
    }

    fn as_slice(&self) -> &[u8] {
        match self {
            ParamBuf::Slice(items) => items,
            ParamBuf::Inline { len, value } => &value[..*len as usize],
            ParamBuf::Bytes(bytes) => bytes,
        }
    }
}

/// Value that can be encoded to be bound to a statement parameter.
pub trait Encode<'q> {
    fn encode(self) -> Encoded<'q>;
}

/// One encoded wire parameter: type tag, buffer, optional explicit length.
pub struct Encoded<'q> {
    ty: FieldType,
    value: ParamBuf<'q>,
    length: Option<u32>,
    is_null: bool,
    unsigned: bool,
}

impl<'q> Encoded<'q> {
    fn null() -> Encoded<'static> {
        Encoded {
            ty: FieldType::Null,
            value: ParamBuf::inline(&[]),
            length: None,
            is_null: true,
            unsigned: false,
        }
    }

    fn fixed(ty: FieldType, bytes: &[u8]) -> Encoded<'static> {
        Encoded {
            ty,
            value: ParamBuf::inline(bytes),
            length: None,
            is_null: false,
            unsigned: false,
        }
    }

    #[cfg(feature = "json")]
    pub(crate) fn owned(bytes: Vec<u8>) -> Encoded<'static> {
        Encoded::string(ParamBuf::Bytes(Bytes::from(bytes)))
    }

    fn string(value: ParamBuf<'q>) -> Encoded<'q> {
        let length = Some(value.as_slice().len() as u32);
        Encoded {
            ty: FieldType::String,
            value,
            length,
            is_null: false,
            unsigned: false,
        }
    }

    /// Encode a dynamic [`Value`] into a wire parameter.
    ///
    /// Payload values borrow `value`'s own backing bytes. Generic numbers are
    /// always sent as doubles, only the distinguished [`Value::Int`] and
    /// [`Value::UInt`] take the exact 64-bit integer path. Temporal shapes
    /// are not encodable.
    pub fn try_from_value(value: &'q Value) -> Result<Encoded<'q>, EncodeError> {
        Ok(match value {
            Value::Null => Encoded::null(),
            Value::Bool(v) => Encoded::fixed(FieldType::Tiny, &[*v as u8]),
            Value::Number(v) => Encoded::fixed(FieldType::Double, &v.to_le_bytes()),
            Value::Int(v) => Encoded::fixed(FieldType::LongLong, &v.to_le_bytes()),
            Value::UInt(v) => {
                let mut e = Encoded::fixed(FieldType::LongLong, &v.to_le_bytes());
                e.unsigned = true;
                e
            },
            Value::Bytes(v) => Encoded::string(ParamBuf::Slice(v.as_ref())),
            v => return Err(EncodeError::Unsupported(v.shape())),
        })
    }

    /// Returns the wire type tag.
    pub const fn ty(&self) -> FieldType {
        self.ty
    }

    /// The parameter buffer. Empty for a null parameter.
    pub fn as_slice(&self) -> &[u8] {
        self.value.as_slice()
    }

    /// Explicit payload length, present for string parameters.
    pub const fn length(&self) -> Option<u32> {
        self.length
    }

    pub const fn is_null(&self) -> bool {
        self.is_null
    }

    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }
}

/// Encode `values` as the parameters of a statement expecting `param_count`.
///
/// The arity check happens here, before any server round-trip.
pub fn bind_params(values: &[Value], param_count: usize) -> Result<Vec<Encoded<'_>>, EncodeError> {
    if values.len() != param_count {
        return Err(EncodeError::Arity { expected: param_count, got: values.len() });
    }
    values.iter().map(Encoded::try_from_value).collect()
}

impl Encode<'static> for bool {
    fn encode(self) -> Encoded<'static> {
        Encoded::fixed(FieldType::Tiny, &[self as u8])
    }
}

impl Encode<'static> for f64 {
    fn encode(self) -> Encoded<'static> {
        Encoded::fixed(FieldType::Double, &self.to_le_bytes())
    }
}

impl Encode<'static> for i64 {
    fn encode(self) -> Encoded<'static> {
        Encoded::fixed(FieldType::LongLong, &self.to_le_bytes())
    }
}

impl Encode<'static> for u64 {
    fn encode(self) -> Encoded<'static> {
        let mut e = Encoded::fixed(FieldType::LongLong, &self.to_le_bytes());
        e.unsigned = true;
        e
    }
}

impl<'q> Encode<'q> for &'q str {
    fn encode(self) -> Encoded<'q> {
        Encoded::string(ParamBuf::Slice(self.as_bytes()))
    }
}

impl<'q> Encode<'q> for &'q [u8] {
    fn encode(self) -> Encoded<'q> {
        Encoded::string(ParamBuf::Slice(self))
    }
}

impl Encode<'static> for String {
    fn encode(self) -> Encoded<'static> {
        Encoded::string(ParamBuf::Bytes(Bytes::from(self.into_bytes())))
    }
}

impl Encode<'static> for Bytes {
    fn encode(self) -> Encoded<'static> {
        Encoded::string(ParamBuf::Bytes(self))
    }
}

impl<'q, T: Encode<'q>> Encode<'q> for Option<T> {
    fn encode(self) -> Encoded<'q> {
        match self {
            Some(v) => v.encode(),
            None => Encoded::null(),
        }
    }
}

impl fmt::Debug for Encoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::ext::FmtExt;
        f.debug_struct("Encoded")
            .field("ty", &self.ty)
            .field("value", &self.as_slice().lossy())
            .field("is_null", &self.is_null)
            .finish()
    }
}

/// An error when encoding a parameter or literal.
pub enum EncodeError {
    /// Parameter or placeholder count mismatch.
    Arity { expected: usize, got: usize },
    /// Value shape the codec cannot encode.
    Unsupported(&'static str),
    /// Literal payload is not valid utf8.
    ///
    /// Binary payloads belong on the prepared statement path, an
    /// interpolated query is a [`String`].
    Utf8(std::str::Utf8Error),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to encode value, ")?;
        match self {
            Self::Arity { expected, got } => {
                write!(f, "wrong arity: {expected} expected, got {got}")
            },
            Self::Unsupported(shape) => write!(f, "cannot encode {shape} value"),
            Self::Utf8(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EncodeError { }

impl fmt::Debug for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
