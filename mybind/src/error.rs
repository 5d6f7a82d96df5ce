//! `mybind` error types.
use std::{backtrace::Backtrace, fmt};

use crate::{
    common::unit_error,
    decode::DecodeError,
    encode::EncodeError,
    mysql::ServerError,
};

/// A specialized [`Result`] type for `mybind` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

unit_error! {
    /// An error when try to [`fetch_one`][crate::query::Query::fetch_one] and no row is returned.
    pub struct RowNotFound("row not found");
}

unit_error! {
    /// The server reported a value did not fit its bound buffer.
    ///
    /// The codec does not resize and re-fetch.
    pub struct DataTruncated("result data truncated");
}

unit_error! {
    /// A statement expected to produce rows reported zero columns.
    pub struct NoResultSet("statement produced no result set");
}

unit_error! {
    /// A statement expected to produce no rows reported columns.
    pub struct UnexpectedResultSet("statement unexpectedly produced a result set");
}

/// All possible error from the `mybind` library.
pub struct Error {
    context: String,
    backtrace: Backtrace,
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Attach the failing operation name, e.g `"stmt_execute"`.
    pub(crate) fn context(mut self, context: &str) -> Self {
        self.context = context.into();
        self
    }

    pub(crate) fn closed(what: &'static str) -> Self {
        ErrorKind::Closed(what).into()
    }
}

/// All possible error kind from the `mybind` library.
pub enum ErrorKind {
    /// The server reported an error.
    Server(ServerError),
    /// Row value decoding failed.
    Decode(DecodeError),
    /// Parameter or literal encoding failed.
    Encode(EncodeError),
    /// A fetched value did not fit its bound buffer.
    Truncated(DataTruncated),
    /// Operation on a closed or released resource.
    Closed(&'static str),
    RowNotFound(RowNotFound),
    NoResultSet(NoResultSet),
    UnexpectedResultSet(UnexpectedResultSet),
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Error {
            fn from($pat: $ty) -> Self {
                let backtrace = std::backtrace::Backtrace::capture();
                Self { context: String::new(), backtrace, kind: $body }
            }
        }
    };
}

from!(<ErrorKind>e => e);
from!(<ServerError>e => ErrorKind::Server(e));
from!(<DecodeError>e => ErrorKind::Decode(e));
from!(<EncodeError>e => ErrorKind::Encode(e));
from!(<DataTruncated>e => ErrorKind::Truncated(e));
from!(<RowNotFound>e => ErrorKind::RowNotFound(e));
from!(<NoResultSet>e => ErrorKind::NoResultSet(e));
from!(<UnexpectedResultSet>e => ErrorKind::UnexpectedResultSet(e));

impl std::error::Error for Error { }

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.context.is_empty() {
            write!(f, "{}: ", self.context)?;
        }

        fmt::Display::fmt(&self.kind, f)?;

        if let std::backtrace::BacktraceStatus::Captured = self.backtrace.status() {
            let mut backtrace = self.backtrace.to_string();
            write!(f, "\n\n")?;
            writeln!(f, "Stack backtrace:")?;
            backtrace.truncate(backtrace.trim_end().len());
            write!(f, "{}", backtrace)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for ErrorKind { }

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(e) => e.fmt(f),
            Self::Decode(e) => e.fmt(f),
            Self::Encode(e) => e.fmt(f),
            Self::Truncated(e) => e.fmt(f),
            Self::Closed(what) => write!(f, "{what} is closed"),
            Self::RowNotFound(e) => e.fmt(f),
            Self::NoResultSet(e) => e.fmt(f),
            Self::UnexpectedResultSet(e) => e.fmt(f),
        }
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
