//! Synchronous twins of the [`Mapper`] query operations.
//!
//! A [`Client`] owns a current-thread runtime and drives each async
//! operation to completion. It must not be used from inside another tokio
//! runtime.

use crate::{exec::RowCursor, Mapper, Result, Statement};

use quarry_core::{Connection, Field};

use tokio::runtime::{Builder, Runtime};
use tokio_stream::StreamExt;

/// Runs mapper operations on the calling thread.
#[derive(Debug)]
pub struct Client {
    mapper: Mapper,
    runtime: Runtime,
}

impl Client {
    pub fn new(mapper: Mapper) -> Result<Client> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Client { mapper, runtime })
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn execute<'s>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
    ) -> Result<u64> {
        self.runtime.block_on(self.mapper.execute(conn, stmt))
    }

    pub fn execute_many<'s, P>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
        params: &mut [P],
    ) -> Result<u64>
    where
        P: Send + 'static,
    {
        self.runtime
            .block_on(self.mapper.execute_many(conn, stmt, params))
    }

    pub fn execute_scalar<'s, T: Field>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
    ) -> Result<T> {
        self.runtime.block_on(self.mapper.execute_scalar(conn, stmt))
    }

    /// Executes a command and returns its cursor. Advance it with
    /// [`read`](Client::read).
    pub fn execute_reader<'c, 's>(
        &self,
        conn: &'c mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
    ) -> Result<RowCursor<'c>> {
        self.runtime.block_on(self.mapper.execute_reader(conn, stmt))
    }

    /// Advances a cursor returned by [`execute_reader`](Client::execute_reader).
    pub fn read(&self, cursor: &mut RowCursor<'_>) -> Result<bool> {
        self.runtime.block_on(cursor.read())
    }

    /// Lazily maps rows to `T`. Each call to `next` fetches one row.
    pub fn query<'a, T>(
        &'a self,
        conn: &'a mut dyn Connection,
        stmt: impl Into<Statement<'a>>,
    ) -> impl Iterator<Item = Result<T>> + 'a
    where
        T: Send + 'static,
    {
        let mut rows = Box::pin(self.mapper.query::<T>(conn, stmt));
        std::iter::from_fn(move || self.runtime.block_on(rows.next()))
    }

    pub fn query_list<'s, T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
    {
        self.runtime.block_on(self.mapper.query_list(conn, stmt))
    }

    pub fn query_first<'s, T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
    ) -> Result<T>
    where
        T: Send + 'static,
    {
        self.runtime.block_on(self.mapper.query_first(conn, stmt))
    }

    pub fn query_first_optional<'s, T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
    ) -> Result<Option<T>>
    where
        T: Send + 'static,
    {
        self.runtime
            .block_on(self.mapper.query_first_optional(conn, stmt))
    }

    pub fn query_single<'s, T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'s>>,
    ) -> Result<T>
    where
        T: Send + 'static,
    {
        self.runtime.block_on(self.mapper.query_single(conn, stmt))
    }
}
