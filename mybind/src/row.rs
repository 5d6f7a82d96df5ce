//! Decoded row records.
//!
//! - [`Row`]
//! - [`FromRow`]
//!
//! - [`Index`][crate::column::Index]
//! - [`DecodeError`]
use std::{fmt, sync::Arc};

use crate::{
    column::{Column, Index},
    decode::{DecodeError, FromValue},
    value::Value,
};

/// One decoded result row.
///
/// Column metadata is shared across every row of a result set.
pub struct Row {
    columns: Arc<[Column]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[Column]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Returns `true` if the row contains no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Shared column metadata.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Borrow a value by index or column name.
    pub fn get<I: Index>(&self, idx: I) -> Option<&Value> {
        idx.position(&self.columns).map(|i| &self.values[i])
    }

    /// Get and convert a column value.
    pub fn try_get<I, R>(&self, idx: I) -> Result<R, DecodeError>
    where
        I: Index + fmt::Display + Copy,
        R: FromValue,
    {
        match idx.position(&self.columns) {
            Some(i) => R::from_value(self.values[i].clone()),
            None => Err(DecodeError::ColumnNotFound(idx.to_string().into())),
        }
    }

    /// Consume self into the decoded values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Try decode a type using its [`FromRow`] implementation.
    pub fn decode<D: FromRow>(self) -> Result<D, DecodeError> {
        D::from_row(self)
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_map();
        for (col, value) in self.columns.iter().zip(&self.values) {
            dbg.key(&col.name()).value(value);
        }
        dbg.finish()
    }
}

/// Result of a statement that produced no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowResult {
    pub affected_rows: u64,
    /// Generated id of the last inserted row, zero when none was generated.
    pub insert_id: u64,
}

// ===== Traits =====

/// Type that can be constructed from a row.
pub trait FromRow: Sized {
    /// Construct self from row.
    fn from_row(row: Row) -> Result<Self, DecodeError>;
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self, DecodeError> {
        Ok(row)
    }
}

impl FromRow for () {
    fn from_row(_: Row) -> Result<Self, DecodeError> {
        Ok(())
    }
}

macro_rules! from_row_tuple {
    ($($t:ident $i:literal),*) => {
        impl<$($t),*> FromRow for ($($t),*,)
        where
            $($t: FromValue),*
        {
            fn from_row(row: Row) -> Result<Self, DecodeError> {
                Ok((
                    $(row.try_get($i)?),*,
                ))
            }
        }
    };
}

from_row_tuple!(T0 0);
from_row_tuple!(T0 0, T1 1);
from_row_tuple!(T0 0, T1 1, T2 2);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3);
