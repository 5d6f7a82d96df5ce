//! Result set column metadata.
use crate::{common::ByteStr, mysql::FieldType};

/// One column of a result set, as reported by the server metadata.
#[derive(Debug, Clone)]
pub struct Column {
    name: ByteStr,
    ty: FieldType,
    length: u32,
    unsigned: bool,
}

impl Column {
    pub fn new(name: impl Into<ByteStr>, ty: FieldType, length: u32) -> Self {
        Self { name: name.into(), ty, length, unsigned: false }
    }

    /// Mark the column as carrying an unsigned integer type.
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wire type tag.
    pub const fn ty(&self) -> FieldType {
        self.ty
    }

    /// Declared maximum byte length of the column.
    ///
    /// For the variable-width family this sizes the bound buffer, so it must
    /// reflect the materialized maximum of the result set, not the schema
    /// limit.
    pub const fn length(&self) -> u32 {
        self.length
    }

    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }
}

/// Ordered column names of a result set.
pub fn column_names(columns: &[Column]) -> impl Iterator<Item = &str> {
    columns.iter().map(Column::name)
}

/// Ordered wire types of a result set.
pub fn column_types(columns: &[Column]) -> impl Iterator<Item = FieldType> + '_ {
    columns.iter().map(Column::ty)
}

/// Type that can be used for indexing a column.
pub trait Index: Sized + sealed::Sealed {
    fn position(self, columns: &[Column]) -> Option<usize>;
}

impl Index for usize {
    fn position(self, columns: &[Column]) -> Option<usize> {
        columns.get(self).is_some().then_some(self)
    }
}

impl Index for &str {
    fn position(self, columns: &[Column]) -> Option<usize> {
        columns.iter().position(|e| e.name() == self)
    }
}

mod sealed {
    pub trait Sealed { }
    impl Sealed for usize { }
    impl Sealed for &str { }
}
