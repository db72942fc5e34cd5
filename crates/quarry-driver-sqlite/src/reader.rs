use crate::{ResultSet, Sqlite};

use quarry_core::{async_trait, bail, driver::Reader, Connection, Result, Value, WireType};

/// Rows are buffered when the command runs, since a rusqlite statement
/// cannot be held across an await.
#[derive(Debug)]
pub(crate) struct SqliteReader<'c> {
    connection: &'c mut Sqlite,
    close_connection: bool,
    columns: Vec<(String, WireType)>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl<'c> SqliteReader<'c> {
    pub(crate) fn new(connection: &'c mut Sqlite, result: ResultSet, close_connection: bool) -> Self {
        Self {
            connection,
            close_connection,
            columns: result.columns,
            rows: result.rows.into_iter(),
            current: None,
        }
    }
}

#[async_trait]
impl Reader for SqliteReader<'_> {
    async fn read(&mut self) -> Result<bool> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn name(&self, index: usize) -> &str {
        &self.columns[index].0
    }

    fn field_type(&self, index: usize) -> WireType {
        self.columns[index].1
    }

    fn value(&self, index: usize) -> Result<Value> {
        let Some(row) = &self.current else {
            bail!("no current row; call `read` first");
        };

        match row.get(index) {
            Some(value) => Ok(value.clone()),
            None => bail!("column index out of range; index={index}; count={}", row.len()),
        }
    }
}

impl Drop for SqliteReader<'_> {
    fn drop(&mut self) {
        if self.close_connection {
            let _ = self.connection.close();
        }
    }
}
