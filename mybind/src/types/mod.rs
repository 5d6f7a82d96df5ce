//! Type integration with external types.
//!
//! Implementation of [`FromValue`][f] and [`Encode`][e] for external types.
//!
//! Available for:
//!
//! - `serde`'s `Deserialize` and `Serialize` via [`Json`], requires `json` feature
//! - `time`'s `Date`, `Time` and `PrimitiveDateTime`, requires `time` feature
//!   (decode only, temporal parameters are not encodable)
//!
//! [f]: crate::decode::FromValue
//! [e]: crate::Encode

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::Json;

#[cfg(feature = "time")]
mod time;
