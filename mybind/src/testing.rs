//! In-memory [`Transport`] for tests.
use bytes::Bytes;

use crate::{
    bind::ResultBinds,
    column::Column,
    encode::Encoded,
    mysql::ServerError,
    transport::{Fetch, StmtId, TextResult, Transport},
};

/// A scripted transport: prepared statements report `param_count`
/// parameters, every execution reports `columns` and serves `rows`.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    pub param_count: u16,
    pub columns: Vec<Column>,
    /// Binary rows, one cell per column, `None` is SQL NULL.
    pub rows: Vec<Vec<Option<Vec<u8>>>>,
    /// Report truncation at this row index.
    pub truncate_at: Option<usize>,
    /// Set the error flag on this (row, column).
    pub error_at: Option<(usize, usize)>,
    pub affected: u64,
    pub insert: u64,
    /// Stored result served to the next plain query.
    pub text: Option<TextResult>,

    pub cursor: usize,
    pub queries: Vec<String>,
    pub open_stmts: Vec<StmtId>,
    pub freed_results: u32,
    pub executions: u32,
    pub next_id: u32,
}

impl MockTransport {
    pub fn with_rows(columns: Vec<Column>, rows: Vec<Vec<Option<Vec<u8>>>>) -> Self {
        Self { columns, rows, ..Self::default() }
    }

    pub fn with_text(text: TextResult) -> Self {
        Self { text: Some(text), ..Self::default() }
    }
}

/// Build a text protocol cell.
pub(crate) fn cell(text: &str) -> Option<Bytes> {
    Some(Bytes::copy_from_slice(text.as_bytes()))
}

impl Transport for MockTransport {
    fn prepare(&mut self, _sql: &str) -> Result<(StmtId, u16), ServerError> {
        let id = StmtId(self.next_id);
        self.next_id += 1;
        self.open_stmts.push(id);
        Ok((id, self.param_count))
    }

    fn stmt_execute(&mut self, _stmt: StmtId, _params: &[Encoded]) -> Result<(), ServerError> {
        self.executions += 1;
        Ok(())
    }

    fn stmt_columns(&mut self, _stmt: StmtId) -> Result<Vec<Column>, ServerError> {
        Ok(self.columns.clone())
    }

    fn stmt_fetch(
        &mut self,
        _stmt: StmtId,
        binds: &mut ResultBinds,
    ) -> Result<Fetch, ServerError> {
        if self.truncate_at == Some(self.cursor) {
            return Ok(Fetch::Truncated);
        }
        let Some(row) = self.rows.get(self.cursor) else {
            return Ok(Fetch::Done);
        };
        for (i, cell) in row.iter().enumerate() {
            match cell {
                Some(data) => binds.write(i, data),
                None => binds.set_null(i),
            }
        }
        if let Some((r, c)) = self.error_at {
            if r == self.cursor {
                binds.set_error(c);
            }
        }
        self.cursor += 1;
        Ok(Fetch::Row)
    }

    fn stmt_affected_rows(&mut self, _stmt: StmtId) -> u64 {
        self.affected
    }

    fn stmt_insert_id(&mut self, _stmt: StmtId) -> u64 {
        self.insert
    }

    fn stmt_free_result(&mut self, _stmt: StmtId) {
        self.freed_results += 1;
    }

    fn stmt_close(&mut self, stmt: StmtId) {
        self.open_stmts.retain(|s| *s != stmt);
    }

    fn query(&mut self, sql: &str) -> Result<Option<TextResult>, ServerError> {
        self.queries.push(sql.into());
        Ok(self.text.take())
    }

    fn affected_rows(&mut self) -> u64 {
        self.affected
    }

    fn insert_id(&mut self) -> u64 {
        self.insert
    }
}
