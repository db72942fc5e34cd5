use crate::{bind, cache::Column, Mapper, Result};

use quarry_core::{Field, Reader};

/// A raw result reader returned by [`Mapper::execute_reader`].
///
/// Rows can be read column by column, or mapped through the binder cache
/// with [`next_as`](RowCursor::next_as). If the call that produced the cursor
/// opened the connection, dropping the cursor closes it.
pub struct RowCursor<'c> {
    reader: Box<dyn Reader + 'c>,
    mapper: Mapper,
    columns: Option<Vec<Column>>,
}

impl<'c> RowCursor<'c> {
    pub(crate) fn new(reader: Box<dyn Reader + 'c>, mapper: Mapper) -> RowCursor<'c> {
        RowCursor {
            reader,
            mapper,
            columns: None,
        }
    }

    /// Advances to the next row.
    pub async fn read(&mut self) -> Result<bool> {
        self.reader.read().await
    }

    /// The column shape of the result set.
    pub fn columns(&mut self) -> &[Column] {
        self.load_columns();
        self.columns.as_deref().unwrap_or_default()
    }

    /// Reads column `index` of the current row as `F`. Null becomes
    /// `F::default()`.
    pub fn get<F: Field>(&self, index: usize) -> Result<F> {
        let value = self.reader.value(index)?;

        if value.is_null() {
            Ok(F::default())
        } else {
            F::from_value(value)
        }
    }

    /// Advances to the next row and maps it to `T`, or returns `None` when
    /// the reader is exhausted.
    pub async fn next_as<T: 'static>(&mut self) -> Result<Option<T>> {
        if !self.reader.read().await? {
            return Ok(None);
        }

        self.load_columns();
        let columns = self.columns.as_deref().unwrap_or_default();
        let binder = self.mapper.binder::<T>(columns)?;
        binder.bind(self.reader.as_ref()).map(Some)
    }

    pub fn reader(&self) -> &dyn Reader {
        self.reader.as_ref()
    }

    fn load_columns(&mut self) {
        if self.columns.is_none() {
            self.columns = Some(bind::columns(self.reader.as_ref()));
        }
    }
}

impl std::fmt::Debug for RowCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowCursor")
            .field("columns", &self.columns)
            .finish()
    }
}
