//! Query API types.
use crate::{
    error::{Error, NoResultSet, Result, RowNotFound, UnexpectedResultSet},
    row::{Row, RowResult},
    rows::RowSet,
    sql::interpolate,
    statement::Statement,
    transport::Transport,
    value::Value,
};

/// Entrypoint of the prepared statement query API.
///
/// Prepares `sql`, binds parameters through the binary protocol and closes
/// the statement when done. Keep a [`Statement`] around instead to execute
/// the same query repeatedly or to fetch incrementally.
pub fn query<'c, 'q, T: Transport>(sql: &'q str, io: &'c mut T) -> Query<'c, 'q, T> {
    Query { sql, io, values: Vec::new() }
}

/// Entrypoint of the ad-hoc text query API.
///
/// Formats every bound value as an escaped SQL literal, substitutes the `?`
/// placeholders of `template` and runs the finished query over the text
/// protocol.
pub fn text<'c, 'q, T: Transport>(template: &'q str, io: &'c mut T) -> TextQuery<'c, 'q, T> {
    TextQuery { template, io, values: Vec::new() }
}

/// Either result of executing a statement, decided by the server-reported
/// column count.
#[derive(Debug)]
pub enum QueryOutcome<'c, T: Transport> {
    /// The statement produced no result set.
    Done(RowResult),
    /// The statement produced a result set.
    Rows(RowSet<'c, T>),
}

/// The prepared statement query API.
#[derive(Debug)]
#[must_use = "queries do nothing unless executed or fetched"]
pub struct Query<'c, 'q, T: Transport> {
    sql: &'q str,
    io: &'c mut T,
    values: Vec<Value>,
}

impl<T: Transport> Query<'_, '_, T> {
    /// Bind a query parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Execute a statement that must not produce rows, returning the number
    /// of affected rows and the generated insert id.
    pub fn execute(self) -> Result<RowResult> {
        let mut stmt = Statement::prepare(self.io, self.sql)?;
        let result = stmt.execute(self.io, &self.values);
        stmt.close(self.io);
        result
    }

    /// Fetch all rows into a [`Vec`].
    pub fn fetch_all(self) -> Result<Vec<Row>> {
        let mut stmt = Statement::prepare(self.io, self.sql)?;
        let result = match stmt.query(&mut *self.io, &self.values) {
            Ok(mut rows) => rows.unpack(),
            Err(err) => Err(err),
        };
        stmt.close(self.io);
        result
    }

    /// Fetch one row, [`RowNotFound`] if the result set is empty.
    pub fn fetch_one(self) -> Result<Row> {
        self.fetch_optional()?.ok_or_else(|| RowNotFound.into())
    }

    /// Optionally fetch one row, releasing the rest of the result set.
    pub fn fetch_optional(self) -> Result<Option<Row>> {
        let mut stmt = Statement::prepare(self.io, self.sql)?;
        let result = match stmt.query(&mut *self.io, &self.values) {
            Ok(mut rows) => {
                let row = rows.fetch_next();
                rows.release();
                row
            },
            Err(err) => Err(err),
        };
        stmt.close(self.io);
        result
    }
}

/// The ad-hoc text query API.
#[derive(Debug)]
#[must_use = "queries do nothing unless executed or fetched"]
pub struct TextQuery<'c, 'q, T: Transport> {
    template: &'q str,
    io: &'c mut T,
    values: Vec<Value>,
}

impl<'c, T: Transport> TextQuery<'c, '_, T> {
    /// Bind a value for the corresponding `?` placeholder.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Run a query that must not produce rows.
    pub fn execute(self) -> Result<RowResult> {
        let sql = interpolate(self.template, &self.values)?;
        match self.io.query(&sql).map_err(|e| Error::from(e).context("query"))? {
            None => Ok(RowResult {
                affected_rows: self.io.affected_rows(),
                insert_id: self.io.insert_id(),
            }),
            Some(_) => Err(UnexpectedResultSet.into()),
        }
    }

    /// Run a query that must produce rows.
    ///
    /// The whole result set is stored and decoded eagerly, the returned
    /// [`RowSet`] iterates in memory.
    pub fn fetch(self) -> Result<RowSet<'c, T>> {
        let sql = interpolate(self.template, &self.values)?;
        match self.io.query(&sql).map_err(|e| Error::from(e).context("query"))? {
            Some(result) => RowSet::text(result),
            None => Err(NoResultSet.into()),
        }
    }

    /// Fetch all rows into a [`Vec`].
    pub fn fetch_all(self) -> Result<Vec<Row>> {
        self.fetch()?.unpack()
    }

    /// Fetch one row, [`RowNotFound`] if the result set is empty.
    pub fn fetch_one(self) -> Result<Row> {
        match self.fetch()?.fetch_next()? {
            Some(row) => Ok(row),
            None => Err(RowNotFound.into()),
        }
    }

    /// Optionally fetch one row.
    pub fn fetch_optional(self) -> Result<Option<Row>> {
        self.fetch()?.fetch_next()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        column::Column,
        encode::EncodeError,
        error::ErrorKind,
        mysql::FieldType,
        testing::{MockTransport, cell},
        transport::TextResult,
    };

    #[test]
    fn end_to_end_binary_fetch() {
        // tiny with declared length 1 is a bool column, wider tiny is numeric
        let columns = vec![
            Column::new("flag", FieldType::Tiny, 1),
            Column::new("small", FieldType::Tiny, 4),
        ];
        let rows = vec![
            vec![Some(vec![0x01]), Some(vec![0x01])],
            vec![Some(vec![0x00]), Some(vec![0x05])],
        ];
        let mut io = MockTransport::with_rows(columns, rows);

        let all = query("SELECT flag, small FROM t", &mut io).fetch_all().unwrap();
        assert_eq!(all[0].get("flag"), Some(&Value::Bool(true)));
        assert_eq!(all[0].get("small"), Some(&Value::Number(1.0)));
        assert_eq!(all[1].get("flag"), Some(&Value::Bool(false)));
        assert_eq!(all[1].get("small"), Some(&Value::Number(5.0)));

        // statement closed, server result freed
        assert!(io.open_stmts.is_empty());
        assert_eq!(io.freed_results, 1);
    }

    #[test]
    fn execute_outcome() {
        let mut io = MockTransport { affected: 2, insert: 7, ..MockTransport::default() };
        let result = query("INSERT INTO t(a) VALUES(1)", &mut io).execute().unwrap();
        assert_eq!(result.affected_rows, 2);
        assert_eq!(result.insert_id, 7);
        assert!(io.open_stmts.is_empty());
    }

    #[test]
    fn bind_converts_into_values() {
        let mut io = MockTransport::with_rows(
            vec![Column::new("id", FieldType::Long, 11)],
            vec![vec![Some(1i32.to_le_bytes().to_vec())]],
        );
        io.param_count = 2;

        let row = query("SELECT id FROM t WHERE a = ? AND b = ?", &mut io)
            .bind(5i64)
            .bind("x")
            .fetch_one()
            .unwrap();
        assert_eq!(row.try_get::<_, i64>("id").unwrap(), 1);
    }

    #[test]
    fn fetch_one_requires_a_row() {
        let mut io =
            MockTransport::with_rows(vec![Column::new("id", FieldType::Long, 11)], vec![]);
        let err = query("SELECT id FROM t", &mut io).fetch_one().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::RowNotFound(_)));

        let mut io =
            MockTransport::with_rows(vec![Column::new("id", FieldType::Long, 11)], vec![]);
        assert!(query("SELECT id FROM t", &mut io).fetch_optional().unwrap().is_none());
    }

    #[test]
    fn text_query_interpolates_and_decodes() {
        let result = TextResult {
            columns: vec![
                Column::new("id", FieldType::Long, 11),
                Column::new("name", FieldType::VarString, 32),
            ],
            rows: vec![vec![cell("1"), cell("O'Brien")]],
        };
        let mut io = MockTransport::with_text(result);

        let rows = text("SELECT id, name FROM users WHERE name = ?", &mut io)
            .bind("O'Brien")
            .fetch_all()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].try_get::<_, String>("name").unwrap(), "O'Brien");
        assert_eq!(
            io.queries[0],
            "SELECT id, name FROM users WHERE name = 'O\\'Brien'",
        );
    }

    #[test]
    fn text_execute_outcome() {
        let mut io = MockTransport { affected: 1, ..MockTransport::default() };
        let result = text("DELETE FROM t WHERE id = ?", &mut io).bind(9i64).execute().unwrap();
        assert_eq!(result.affected_rows, 1);
        assert_eq!(io.queries[0], "DELETE FROM t WHERE id = 9");
    }

    #[test]
    fn text_execute_rejects_result_set() {
        let result = TextResult {
            columns: vec![Column::new("id", FieldType::Long, 11)],
            rows: vec![],
        };
        let mut io = MockTransport::with_text(result);
        let err = text("SELECT id FROM t", &mut io).execute().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedResultSet(_)));
    }

    #[test]
    fn text_arity_error_runs_nothing() {
        let mut io = MockTransport::default();
        let err = text("SELECT ?", &mut io).execute().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Encode(EncodeError::Arity { .. })));
        assert!(io.queries.is_empty());
    }
}
