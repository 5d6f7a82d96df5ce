//! Prepared statements.
use crate::{
    common::{debug, verbose},
    encode::bind_params,
    error::{Error, NoResultSet, Result, UnexpectedResultSet},
    query::QueryOutcome,
    row::RowResult,
    rows::RowSet,
    transport::{StmtId, Transport},
    value::Value,
};

/// A server-side prepared statement.
///
/// The parameter count is fixed at prepare time and every execution must
/// supply exactly that many values.
///
/// Closing requires the transport, so dropping a statement without
/// [`close`][Statement::close] leaves the server-side handle to the
/// connection's own teardown.
#[derive(Debug)]
pub struct Statement {
    stmt: Option<StmtId>,
    param_count: u16,
}

impl Statement {
    /// Prepare `sql` on the server.
    pub fn prepare<T: Transport>(io: &mut T, sql: &str) -> Result<Self> {
        let (stmt, param_count) = io
            .prepare(sql)
            .map_err(|e| Error::from(e).context("prepare"))?;
        debug!("prepared {stmt:?} with {param_count} parameters");
        Ok(Self { stmt: Some(stmt), param_count })
    }

    /// Number of `?` parameters the statement expects.
    pub const fn param_count(&self) -> u16 {
        self.param_count
    }

    pub const fn is_closed(&self) -> bool {
        self.stmt.is_none()
    }

    fn id(&self) -> Result<StmtId> {
        self.stmt.ok_or_else(|| Error::closed("mysql/statement"))
    }

    /// Bind `values`, execute, and report the outcome by the server's
    /// column count: a result set or an affected-rows summary.
    pub fn run<'c, T: Transport>(
        &self,
        io: &'c mut T,
        values: &[Value],
    ) -> Result<QueryOutcome<'c, T>> {
        let stmt = self.id()?;
        let params = bind_params(values, self.param_count as usize)?;
        io.stmt_execute(stmt, &params)
            .map_err(|e| Error::from(e).context("stmt_execute"))?;
        drop(params);

        let columns = io
            .stmt_columns(stmt)
            .map_err(|e| Error::from(e).context("stmt_columns"))?;
        verbose!("executed {stmt:?}, {} columns", columns.len());

        match columns.is_empty() {
            true => Ok(QueryOutcome::Done(RowResult {
                affected_rows: io.stmt_affected_rows(stmt),
                insert_id: io.stmt_insert_id(stmt),
            })),
            false => Ok(QueryOutcome::Rows(RowSet::binary(io, stmt, columns)?)),
        }
    }

    /// Execute a statement that must not produce rows.
    pub fn execute<T: Transport>(&self, io: &mut T, values: &[Value]) -> Result<RowResult> {
        match self.run(io, values)? {
            QueryOutcome::Done(result) => Ok(result),
            QueryOutcome::Rows(mut rows) => {
                rows.release();
                Err(UnexpectedResultSet.into())
            },
        }
    }

    /// Execute a statement that must produce rows.
    pub fn query<'c, T: Transport>(
        &self,
        io: &'c mut T,
        values: &[Value],
    ) -> Result<RowSet<'c, T>> {
        match self.run(io, values)? {
            QueryOutcome::Rows(rows) => Ok(rows),
            QueryOutcome::Done(_) => Err(NoResultSet.into()),
        }
    }

    /// Close the server-side statement.
    ///
    /// Idempotent, closing an already closed statement is a no-op.
    pub fn close<T: Transport>(&mut self, io: &mut T) {
        if let Some(stmt) = self.stmt.take() {
            debug!("closing {stmt:?}");
            io.stmt_close(stmt);
        }
    }
}
