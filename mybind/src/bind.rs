//! Bound result buffers for the binary protocol.
use crate::{
    column::Column,
    common::verbose,
    decode::DecodeError,
    mysql::{FieldType, MysqlTime},
};

/// Owned scratch buffers for one binary result set.
///
/// One buffer per column, sized from the column metadata, plus the parallel
/// null/length/error flag arrays the client library reports into. Allocated
/// once per result set and reused across every fetched row; the decoder
/// copies variable-length payloads out because the next fetch overwrites
/// them.
pub struct ResultBinds {
    types: Box<[FieldType]>,
    buffers: Box<[Box<[u8]>]>,
    nulls: Box<[bool]>,
    lengths: Box<[u32]>,
    errors: Box<[bool]>,
    released: bool,
}

/// Borrowed view of one bound column after a fetch.
#[derive(Debug, Clone, Copy)]
pub struct BindSlot<'a> {
    pub ty: FieldType,
    pub buffer: &'a [u8],
    pub is_null: bool,
    pub length: u32,
    pub error: bool,
}

/// Fixed buffer length for `ty`, or the declared column length for the
/// variable-width family.
fn buffer_len(column: &Column) -> Result<usize, DecodeError> {
    Ok(match column.ty() {
        FieldType::Tiny => 1,
        FieldType::Short | FieldType::Year => 2,
        FieldType::Int24 | FieldType::Long => 4,
        FieldType::LongLong => 8,
        FieldType::Float => 4,
        FieldType::Double => 8,
        ty if ty.is_temporal() => MysqlTime::SIZE,
        ty if ty.is_bytes() => column.length() as usize,
        ty => return Err(DecodeError::Unsupported(ty)),
    })
}

impl ResultBinds {
    /// Allocate zeroed buffers and flag arrays for `columns`.
    ///
    /// An unknown wire type is a configuration error, the codec does not
    /// guess at buffer sizes.
    pub fn allocate(columns: &[Column]) -> Result<Self, DecodeError> {
        let mut types = Vec::with_capacity(columns.len());
        let mut buffers = Vec::with_capacity(columns.len());
        for col in columns {
            types.push(col.ty());
            buffers.push(vec![0u8; buffer_len(col)?].into_boxed_slice());
        }
        Ok(Self {
            types: types.into(),
            buffers: buffers.into(),
            nulls: vec![false; columns.len()].into(),
            lengths: vec![0u32; columns.len()].into(),
            errors: vec![false; columns.len()].into(),
            released: false,
        })
    }

    /// Number of bound columns.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Borrow column `i` as fetched.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds or the binds are released.
    pub fn slot(&self, i: usize) -> BindSlot<'_> {
        assert!(!self.released, "bound buffers already released");
        BindSlot {
            ty: self.types[i],
            buffer: &self.buffers[i],
            is_null: self.nulls[i],
            length: self.lengths[i],
            error: self.errors[i],
        }
    }

    /// Reset the per-row flags before a fetch.
    pub fn clear_row(&mut self) {
        self.nulls.fill(false);
        self.lengths.fill(0);
        self.errors.fill(false);
    }

    /// Store a fetched payload into column `i`.
    ///
    /// Copies at most the bound buffer length; the actual payload length is
    /// recorded separately so the caller can detect truncation.
    pub fn write(&mut self, i: usize, data: &[u8]) {
        let buf = &mut self.buffers[i];
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        self.lengths[i] = data.len() as u32;
        self.nulls[i] = false;
    }

    pub fn set_null(&mut self, i: usize) {
        self.nulls[i] = true;
    }

    pub fn set_error(&mut self, i: usize) {
        self.errors[i] = true;
    }

    /// Release every buffer and flag array in one batch.
    ///
    /// Idempotent, releasing already-released binds is a no-op.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        verbose!("releasing {} bound buffers", self.buffers.len());
        self.types = Box::default();
        self.buffers = Box::default();
        self.nulls = Box::default();
        self.lengths = Box::default();
        self.errors = Box::default();
        self.released = true;
    }
}

impl Drop for ResultBinds {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ResultBinds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultBinds")
            .field("len", &self.len())
            .field("released", &self.released)
            .finish()
    }
}
