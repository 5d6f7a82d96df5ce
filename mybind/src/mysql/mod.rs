//! MySQL wire protocol definitions.
mod field_type;
mod time;
mod error;

pub use field_type::FieldType;
pub use time::{MysqlTime, TemporalKind};
pub use error::ServerError;
