//! Query execution.
//!
//! Every operation follows the same lifecycle: open the connection if it is
//! closed, bind parameters, execute, map rows or read the scalar, copy output
//! parameters back, and close the connection again if this call opened it.
//! The close runs on every exit path, including errors, cancellation and
//! dropping a [`query`](Mapper::query) stream early.

mod cancel;
use cancel::cancelable;

mod cursor;
pub use cursor::RowCursor;

mod scope;
use scope::ConnectionScope;

mod statement;
pub use statement::Statement;

use crate::{
    bind::{self, Parser},
    Mapper, Result,
};

use quarry_core::{Behavior, Command, Connection, Error, Field, Value};

use async_stream::try_stream;
use std::any::type_name;
use tokio_stream::Stream;
use tracing::trace;

impl Mapper {
    /// Executes a command and returns the number of affected rows.
    pub async fn execute(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
    ) -> Result<u64> {
        let mut stmt = stmt.into();
        let cancel = stmt.cancel.clone();

        cancelable(cancel.as_ref(), async {
            let mut scope = ConnectionScope::open(conn).await?;
            let mut command = self.command(&stmt)?;

            let affected = scope
                .connection()
                .execute_non_query(&mut command)
                .await?;

            stmt.complete(self, &command)?;
            scope.finish()?;
            Ok(affected)
        })
        .await
    }

    /// Executes the command once per element of `params`, returning the
    /// total number of affected rows.
    ///
    /// The connection is opened at most once for the whole batch.
    pub async fn execute_many<P>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
        params: &mut [P],
    ) -> Result<u64>
    where
        P: Send + 'static,
    {
        let stmt = stmt.into();
        let cancel = stmt.cancel.clone();

        cancelable(cancel.as_ref(), async move {
            let mut scope = ConnectionScope::open(conn).await?;
            let builder = self.parameter_builder::<P>()?;
            let mut total = 0;

            for params in params.iter_mut() {
                let mut command = self.command(&stmt)?;
                builder.build(params, &mut command)?;

                total += scope
                    .connection()
                    .execute_non_query(&mut command)
                    .await?;

                builder.post_process(params, &command)?;
            }

            scope.finish()?;
            Ok(total)
        })
        .await
    }

    /// Executes a command and returns the first column of the first row.
    ///
    /// Null and the absence of rows both produce `T::default()`.
    pub async fn execute_scalar<T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
    ) -> Result<T>
    where
        T: Field,
    {
        let mut stmt = stmt.into();
        let cancel = stmt.cancel.clone();

        let value = cancelable(cancel.as_ref(), async {
            let mut scope = ConnectionScope::open(conn).await?;
            let mut command = self.command(&stmt)?;

            let value = scope.connection().execute_scalar(&mut command).await?;

            stmt.complete(self, &command)?;
            scope.finish()?;
            Ok(value)
        })
        .await?;

        self.parse_scalar(value)
    }

    /// Executes a command and returns its reader.
    ///
    /// If this call opened the connection, the returned cursor closes it when
    /// dropped.
    pub async fn execute_reader<'c>(
        &self,
        conn: &'c mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
    ) -> Result<RowCursor<'c>> {
        let mut stmt = stmt.into();
        let cancel = stmt.cancel.clone();

        cancelable(cancel.as_ref(), async {
            let scope = ConnectionScope::open(conn).await?;
            let mut command = self.command(&stmt)?;

            // From here on the driver closes the connection if execution fails
            // or is cancelled, and the reader closes it otherwise.
            let (conn, opened) = scope.release();
            let behavior = self.behavior(false).with_close_connection(opened);
            let reader = conn.execute_reader(&mut command, behavior).await?;

            stmt.complete(self, &command)?;
            Ok(RowCursor::new(reader, self.clone()))
        })
        .await
    }

    /// Executes a query and lazily maps each row to `T`.
    ///
    /// Rows are fetched as the stream is polled. Dropping the stream before
    /// it is exhausted still closes a connection the query opened.
    pub fn query<'a, T>(
        &'a self,
        conn: &'a mut dyn Connection,
        stmt: impl Into<Statement<'a>>,
    ) -> impl Stream<Item = Result<T>> + Send + 'a
    where
        T: Send + 'static,
    {
        let mut stmt = stmt.into();

        try_stream! {
            let cancel = stmt.cancel.clone();
            let mut scope = cancelable(cancel.as_ref(), ConnectionScope::open(conn)).await?;
            let mut command = self.command(&stmt)?;

            let mut reader = cancelable(
                cancel.as_ref(),
                scope.connection().execute_reader(&mut command, self.behavior(false)),
            )
            .await?;

            if cancelable(cancel.as_ref(), reader.read()).await? {
                let binder = self.binder::<T>(&bind::columns(reader.as_ref()))?;

                loop {
                    yield binder.bind(reader.as_ref())?;

                    if !cancelable(cancel.as_ref(), reader.read()).await? {
                        break;
                    }
                }
            }

            drop(reader);
            stmt.complete(self, &command)?;
            scope.finish()?;
        }
    }

    /// Executes a query and maps every row to `T`, in row order.
    pub async fn query_list<T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
    {
        self.query_rows(conn, stmt.into(), self.behavior(false), None)
            .await
    }

    /// Returns the first row, failing with a record-not-found error when the
    /// query returns no rows.
    pub async fn query_first<T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
    ) -> Result<T>
    where
        T: Send + 'static,
    {
        match self.query_first_optional(conn, stmt).await? {
            Some(row) => Ok(row),
            None => Err(Error::record_not_found(format!(
                "query for `{}` returned no rows",
                type_name::<T>()
            ))),
        }
    }

    /// Returns the first row, or `None` when the query returns no rows.
    pub async fn query_first_optional<T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
    ) -> Result<Option<T>>
    where
        T: Send + 'static,
    {
        let rows = self
            .query_rows(conn, stmt.into(), self.behavior(true), Some(1))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Returns the only row, failing when the query returns zero rows or more
    /// than one.
    pub async fn query_single<T>(
        &self,
        conn: &mut dyn Connection,
        stmt: impl Into<Statement<'_>>,
    ) -> Result<T>
    where
        T: Send + 'static,
    {
        let mut rows = self
            .query_rows(conn, stmt.into(), self.behavior(false), Some(2))
            .await?
            .into_iter();

        match (rows.next(), rows.next()) {
            (Some(row), None) => Ok(row),
            (None, _) => Err(Error::record_not_found(format!(
                "query for `{}` returned no rows",
                type_name::<T>()
            ))),
            (Some(_), Some(_)) => Err(Error::too_many_records(format!(
                "query for `{}` returned more than one row",
                type_name::<T>()
            ))),
        }
    }

    /// Reads up to `limit` rows. The binder is only built once a first row
    /// exists.
    async fn query_rows<T>(
        &self,
        conn: &mut dyn Connection,
        mut stmt: Statement<'_>,
        behavior: Behavior,
        limit: Option<usize>,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
    {
        let cancel = stmt.cancel.clone();

        cancelable(cancel.as_ref(), async {
            let mut scope = ConnectionScope::open(conn).await?;
            let mut command = self.command(&stmt)?;
            let mut rows = vec![];

            let mut reader = scope
                .connection()
                .execute_reader(&mut command, behavior)
                .await?;

            if reader.read().await? {
                let binder = self.binder::<T>(&bind::columns(reader.as_ref()))?;

                loop {
                    rows.push(binder.bind(reader.as_ref())?);

                    if limit.is_some_and(|limit| rows.len() >= limit) || !reader.read().await? {
                        break;
                    }
                }
            }

            drop(reader);
            stmt.complete(self, &command)?;
            scope.finish()?;
            Ok(rows)
        })
        .await
    }

    /// Builds the driver command for a statement, binding its parameters.
    fn command(&self, stmt: &Statement<'_>) -> Result<Command> {
        let mut command = Command {
            text: stmt.text.clone(),
            kind: stmt.kind,
            timeout: stmt.timeout.or(self.settings().command_timeout),
            parameters: vec![],
        };

        stmt.build_parameters(self, &mut command)?;

        trace!(
            text = %command.text,
            parameters = command.parameters.len(),
            "prepared command"
        );
        Ok(command)
    }

    fn behavior(&self, first: bool) -> Behavior {
        let settings = self.settings();

        Behavior::DEFAULT
            .with_single_result(settings.single_result)
            .with_single_row(first && settings.single_row_for_first)
    }

    fn parse_scalar<T: Field>(&self, value: Value) -> Result<T> {
        let Some(wire_type) = value.wire_type() else {
            return Ok(T::default());
        };

        let handle = self.handles().lookup(T::type_info())?;
        Parser::resolve(&handle, wire_type).parse(value)
    }
}
