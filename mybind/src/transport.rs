//! The [`Transport`] trait.
use bytes::Bytes;

use crate::{bind::ResultBinds, column::Column, encode::Encoded, mysql::ServerError};

/// Server-side prepared statement handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub u32);

/// Outcome of one bound-buffer fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// A row was fetched into the bound buffers.
    Row,
    /// End of data, no row was fetched.
    Done,
    /// A value did not fit its bound buffer.
    Truncated,
}

/// A stored text protocol result set.
///
/// The text path materializes the whole result client-side, an absent cell
/// is SQL `NULL`.
#[derive(Debug, Default)]
pub struct TextResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Option<Bytes>>>,
}

/// The client-library surface the codec rides on.
///
/// Implementations wrap the real wire client; connection establishment,
/// authentication, database selection and transaction control live behind
/// it and carry no codec logic. Every call blocks until the server
/// responds.
///
/// A transport and everything derived from it must be used from one thread
/// at a time: the codec adds no locking, and concurrent use of the same
/// connection, statement or result set is a caller error.
pub trait Transport {
    /// Prepare a statement, returning its handle and parameter count.
    fn prepare(&mut self, sql: &str) -> Result<(StmtId, u16), ServerError>;

    /// Execute a prepared statement with the encoded parameters bound.
    fn stmt_execute(&mut self, stmt: StmtId, params: &[Encoded]) -> Result<(), ServerError>;

    /// Result metadata of the last execution; empty when the statement
    /// produced no result set.
    ///
    /// Reported lengths size the bound buffers, so for the variable-width
    /// family they must reflect the materialized maximum of the stored
    /// result, not the schema limit.
    fn stmt_columns(&mut self, stmt: StmtId) -> Result<Vec<Column>, ServerError>;

    /// Fetch the next row into the bound buffers.
    fn stmt_fetch(&mut self, stmt: StmtId, binds: &mut ResultBinds)
        -> Result<Fetch, ServerError>;

    /// Rows affected by the last execution of `stmt`.
    fn stmt_affected_rows(&mut self, stmt: StmtId) -> u64;

    /// Generated id of the last insert through `stmt`.
    fn stmt_insert_id(&mut self, stmt: StmtId) -> u64;

    /// Free the server-side result of `stmt`, keeping the statement usable.
    fn stmt_free_result(&mut self, stmt: StmtId);

    /// Close the statement, releasing the server-side handle.
    fn stmt_close(&mut self, stmt: StmtId);

    /// Run a plain text protocol query, storing any produced result set.
    fn query(&mut self, sql: &str) -> Result<Option<TextResult>, ServerError>;

    /// Rows affected by the last plain query.
    fn affected_rows(&mut self) -> u64;

    /// Generated id of the last insert through a plain query.
    fn insert_id(&mut self) -> u64;
}

impl<T: Transport> Transport for &mut T {
    fn prepare(&mut self, sql: &str) -> Result<(StmtId, u16), ServerError> {
        T::prepare(self, sql)
    }

    fn stmt_execute(&mut self, stmt: StmtId, params: &[Encoded]) -> Result<(), ServerError> {
        T::stmt_execute(self, stmt, params)
    }

    fn stmt_columns(&mut self, stmt: StmtId) -> Result<Vec<Column>, ServerError> {
        T::stmt_columns(self, stmt)
    }

    fn stmt_fetch(
        &mut self,
        stmt: StmtId,
        binds: &mut ResultBinds,
    ) -> Result<Fetch, ServerError> {
        T::stmt_fetch(self, stmt, binds)
    }

    fn stmt_affected_rows(&mut self, stmt: StmtId) -> u64 {
        T::stmt_affected_rows(self, stmt)
    }

    fn stmt_insert_id(&mut self, stmt: StmtId) -> u64 {
        T::stmt_insert_id(self, stmt)
    }

    fn stmt_free_result(&mut self, stmt: StmtId) {
        T::stmt_free_result(self, stmt)
    }

    fn stmt_close(&mut self, stmt: StmtId) {
        T::stmt_close(self, stmt)
    }

    fn query(&mut self, sql: &str) -> Result<Option<TextResult>, ServerError> {
        T::query(self, sql)
    }

    fn affected_rows(&mut self) -> u64 {
        T::affected_rows(self)
    }

    fn insert_id(&mut self) -> u64 {
        T::insert_id(self)
    }
}
