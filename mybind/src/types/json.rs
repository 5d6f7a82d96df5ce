use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    decode::{DecodeError, FromValue},
    encode::{Encode, Encoded},
    value::Value,
};

/// Decode and encode a MySQL `JSON` column value.
///
/// # Panics
///
/// Note that when performing [`Encode`], if [`Serialize`] implementation decide
/// to fail, it will will panics.
#[derive(Debug)]
pub struct Json<T>(pub T);

impl<T> FromValue for Json<T>
where
    T: DeserializeOwned,
{
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bytes(payload) => serde_json::from_slice(&payload).map(Json).map_err(Into::into),
            v => Err(v.shape_error("bytes")),
        }
    }
}

impl<T: Serialize> Encode<'static> for Json<T> {
    fn encode(self) -> Encoded<'static> {
        Encoded::owned(serde_json::to_vec(&self).unwrap())
    }
}

impl<T: Serialize> Serialize for Json<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Json<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self(T::deserialize(deserializer)?))
    }
}
