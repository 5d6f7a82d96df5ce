//! Result set iteration.
use std::sync::Arc;

use crate::{
    bind::ResultBinds,
    column::{self, Column},
    common::verbose,
    decode::decode_row,
    error::{DataTruncated, Error, Result},
    mysql::FieldType,
    row::Row,
    text::decode_text_row,
    transport::{Fetch, StmtId, TextResult, Transport},
};

/// An open result set.
///
/// A row set created from a prepared statement decodes the binary protocol,
/// one created from a plain query decodes stored text, never both.
///
/// The binary path binds one set of buffers up front and re-fetches into
/// them for every row; the server-side result is released when the set is
/// exhausted, on a fetch error, or on [`release`][RowSet::release],
/// whichever comes first.
pub struct RowSet<'c, T: Transport> {
    columns: Arc<[Column]>,
    inner: Inner<'c, T>,
}

enum Inner<'c, T: Transport> {
    Binary {
        io: &'c mut T,
        stmt: StmtId,
        binds: ResultBinds,
    },
    Text {
        rows: std::vec::IntoIter<Row>,
    },
    /// Natural end of data, server result already released.
    Exhausted,
    /// Explicitly closed.
    Released,
}

impl<'c, T: Transport> RowSet<'c, T> {
    /// Bind buffers for a binary result set.
    pub(crate) fn binary(io: &'c mut T, stmt: StmtId, columns: Vec<Column>) -> Result<Self> {
        let columns: Arc<[Column]> = columns.into();
        let binds = match ResultBinds::allocate(&columns) {
            Ok(binds) => binds,
            Err(err) => {
                // nothing will fetch the result, release it up front
                io.stmt_free_result(stmt);
                return Err(err.into());
            },
        };
        Ok(Self { columns, inner: Inner::Binary { io, stmt, binds } })
    }

    /// Decode a stored text result eagerly.
    pub(crate) fn text(result: TextResult) -> Result<Self> {
        let columns: Arc<[Column]> = result.columns.into();
        let mut rows = Vec::with_capacity(result.rows.len());
        for cells in &result.rows {
            rows.push(decode_text_row(cells, &columns)?);
        }
        Ok(Self { columns, inner: Inner::Text { rows: rows.into_iter() } })
    }

    /// Shared column metadata.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Ordered column names.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        column::column_names(&self.columns)
    }

    /// Ordered column wire types.
    pub fn column_types(&self) -> impl Iterator<Item = FieldType> + '_ {
        column::column_types(&self.columns)
    }

    /// Fetch and decode the next row.
    ///
    /// Returns `Ok(None)` once the set is exhausted. Any fetch or decode
    /// error releases the server-side result before propagating.
    pub fn fetch_next(&mut self) -> Result<Option<Row>> {
        match &mut self.inner {
            Inner::Binary { io, stmt, binds } => {
                binds.clear_row();
                match io.stmt_fetch(*stmt, binds) {
                    Ok(Fetch::Row) => { },
                    Ok(Fetch::Done) => {
                        verbose!("result set exhausted");
                        self.close(Inner::Exhausted);
                        return Ok(None);
                    },
                    Ok(Fetch::Truncated) => {
                        self.close(Inner::Released);
                        return Err(Error::from(DataTruncated).context("stmt_fetch"));
                    },
                    Err(err) => {
                        self.close(Inner::Released);
                        return Err(Error::from(err).context("stmt_fetch"));
                    },
                }

                match decode_row(binds, &self.columns) {
                    Ok(row) => Ok(Some(row)),
                    Err(err) => {
                        self.close(Inner::Released);
                        Err(err.into())
                    },
                }
            },
            Inner::Text { rows } => Ok(rows.next()),
            Inner::Exhausted => Ok(None),
            Inner::Released => Err(Error::closed("mysql/rows")),
        }
    }

    /// Decode all remaining rows.
    pub fn unpack(&mut self) -> Result<Vec<Row>> {
        let mut out = Vec::new();
        while let Some(row) = self.fetch_next()? {
            out.push(row);
        }
        Ok(out)
    }

    /// Release the bound buffers and the server-side result.
    ///
    /// Idempotent, releasing an already released or exhausted set is a
    /// no-op.
    pub fn release(&mut self) {
        self.close(Inner::Released);
    }

    /// Returns `true` once the set is exhausted or released.
    pub fn is_released(&self) -> bool {
        matches!(self.inner, Inner::Exhausted | Inner::Released)
    }

    fn close(&mut self, state: Inner<'c, T>) {
        debug_assert!(matches!(state, Inner::Exhausted | Inner::Released));
        // terminal states stick, the handle is already gone
        if matches!(self.inner, Inner::Exhausted | Inner::Released) {
            return;
        }
        if let Inner::Binary { io, stmt, mut binds } = std::mem::replace(&mut self.inner, state) {
            binds.release();
            io.stmt_free_result(stmt);
        }
    }
}

impl<T: Transport> Iterator for RowSet<'_, T> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetch_next().transpose()
    }
}

impl<T: Transport> Drop for RowSet<'_, T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Transport> std::fmt::Debug for RowSet<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.inner {
            Inner::Binary { .. } => "binary",
            Inner::Text { .. } => "text",
            Inner::Exhausted => "exhausted",
            Inner::Released => "released",
        };
        f.debug_struct("RowSet")
            .field("columns", &self.columns.len())
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        decode::DecodeError,
        error::ErrorKind,
        testing::{MockTransport, cell},
        value::Value,
    };

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", FieldType::Long, 11),
            Column::new("name", FieldType::VarString, 16),
        ]
    }

    fn rows() -> Vec<Vec<Option<Vec<u8>>>> {
        vec![
            vec![Some(1i32.to_le_bytes().to_vec()), Some(b"foo".to_vec())],
            vec![Some(2i32.to_le_bytes().to_vec()), None],
        ]
    }

    #[test]
    fn binary_fetch_loop() {
        let mut io = MockTransport::with_rows(columns(), rows());
        let mut set = RowSet::binary(&mut io, StmtId(0), columns()).unwrap();

        let first = set.fetch_next().unwrap().unwrap();
        assert_eq!(first.get("id"), Some(&Value::Number(1.0)));
        assert_eq!(first.try_get::<_, String>("name").unwrap(), "foo");

        let second = set.fetch_next().unwrap().unwrap();
        assert_eq!(second.get("name"), Some(&Value::Null));

        assert!(set.fetch_next().unwrap().is_none());
        assert!(set.is_released());
        // exhausted is not an error state, it just stays empty
        assert!(set.fetch_next().unwrap().is_none());

        drop(set);
        assert_eq!(io.freed_results, 1);
    }

    #[test]
    fn truncation_is_fatal_and_releases() {
        let mut io = MockTransport::with_rows(columns(), rows());
        io.truncate_at = Some(1);
        let mut set = RowSet::binary(&mut io, StmtId(0), columns()).unwrap();

        assert!(set.fetch_next().unwrap().is_some());
        let err = set.fetch_next().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Truncated(_)));
        // operation on a released set is an error
        assert!(set.fetch_next().is_err());

        drop(set);
        assert_eq!(io.freed_results, 1);
    }

    #[test]
    fn error_flag_is_fatal_and_releases() {
        let mut io = MockTransport::with_rows(columns(), rows());
        io.error_at = Some((0, 1));
        let mut set = RowSet::binary(&mut io, StmtId(0), columns()).unwrap();

        let err = set.fetch_next().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::Flagged)));

        drop(set);
        assert_eq!(io.freed_results, 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut io = MockTransport::with_rows(columns(), rows());
        let mut set = RowSet::binary(&mut io, StmtId(0), columns()).unwrap();
        set.release();
        set.release();
        drop(set);
        assert_eq!(io.freed_results, 1);
    }

    #[test]
    fn text_set_is_materialized_eagerly() {
        let result = TextResult {
            columns: columns(),
            rows: vec![vec![cell("1"), cell("foo")], vec![cell("2"), None]],
        };
        let mut set = RowSet::<MockTransport>::text(result).unwrap();

        assert_eq!(set.column_names().collect::<Vec<_>>(), ["id", "name"]);
        assert_eq!(
            set.column_types().collect::<Vec<_>>(),
            [FieldType::Long, FieldType::VarString],
        );

        let all = set.unpack().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get("id"), Some(&Value::Number(1.0)));
        assert_eq!(all[1].get("name"), Some(&Value::Null));

        set.release();
        set.release();
    }

    #[test]
    fn iterator_yields_rows() {
        let mut io = MockTransport::with_rows(columns(), rows());
        let set = RowSet::binary(&mut io, StmtId(0), columns()).unwrap();
        let collected = set.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(collected.len(), 2);
    }
}
