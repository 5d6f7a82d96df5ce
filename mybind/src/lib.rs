//! MySQL Value Codec
//!
//! Converts between MySQL's typed wire-level row and column values and the
//! dynamic [`Value`] model, in both directions: result rows decode from the
//! text protocol or the prepared statement binary protocol, values encode
//! into binary statement parameters or escaped textual SQL literals.
//!
//! Connection handling lives behind the [`Transport`] trait, implemented by
//! the embedding integration over the real wire client.
//!
//! # Examples
//!
//! Escaped literal interpolation:
//!
//! ```
//! use mybind::{sql, Value};
//!
//! let q = sql::interpolate(
//!     "SELECT * FROM users WHERE name = ? AND active = ?",
//!     &[Value::from("O'Brien"), Value::Bool(true)],
//! )?;
//!
//! assert_eq!(q, "SELECT * FROM users WHERE name = 'O\\'Brien' AND active = 1");
//! # Ok::<_, mybind::encode::EncodeError>(())
//! ```
//!
//! Decoding text protocol cells:
//!
//! ```
//! use mybind::{Column, Value, mysql::FieldType, text::decode_text};
//!
//! let id = Column::new("id", FieldType::Long, 11);
//! let at = Column::new("at", FieldType::Datetime, 26);
//!
//! assert_eq!(decode_text(Some(b"42".as_slice()), &id)?, Value::Number(42.0));
//!
//! let cell = b"2024-03-05 13:45:09.125000".as_slice();
//! let Value::DateTime(at) = decode_text(Some(cell), &at)? else {
//!     unreachable!()
//! };
//! assert_eq!((at.year, at.month, at.day), (2024, 3, 5));
//! assert_eq!(at.microseconds, 125_000);
//! # Ok::<_, mybind::DecodeError>(())
//! ```

pub mod common;
mod ext;

// Protocol
pub mod mysql;

// Encoding
mod value;
pub mod encode;
pub mod sql;

// Decoding
pub mod bind;
pub mod decode;
pub mod text;

// Component
pub mod column;
pub mod row;
pub mod rows;
pub mod statement;

// Operation
pub mod transport;
pub mod query;

mod error;

pub mod types;

#[cfg(test)]
mod testing;

pub use column::Column;
pub use decode::{DecodeError, FromValue};
pub use encode::Encode;
pub use row::{FromRow, Row, RowResult};
pub use rows::RowSet;
pub use statement::Statement;
pub use transport::Transport;
pub use value::{DateTimeValue, DateValue, TimeValue, Value};

#[doc(inline)]
pub use query::{QueryOutcome, query};
pub use error::{
    DataTruncated, Error, ErrorKind, NoResultSet, Result, RowNotFound, UnexpectedResultSet,
};
