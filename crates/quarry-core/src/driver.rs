mod behavior;
pub use behavior::Behavior;

mod close_guard;
pub use close_guard::CloseGuard;

mod command;
pub use command::{Command, CommandKind};

mod parameter;
pub use parameter::{Direction, Parameter};

use crate::{async_trait, Result, Value, WireType};

use std::fmt::Debug;

/// Whether a connection is ready to execute commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Open,
}

/// A connection to a database, as seen by the mapper.
///
/// The mapper never opens a connection it did not find closed, and closes
/// every connection it opened before returning.
#[async_trait]
pub trait Connection: Debug + Send {
    fn state(&self) -> ConnectionState;

    async fn open(&mut self) -> Result<()>;

    /// Closes the connection.
    ///
    /// Synchronous so it can run from `Drop`. Closing an already closed
    /// connection is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Executes a command, returning the number of affected rows.
    async fn execute_non_query(&mut self, command: &mut Command) -> Result<u64>;

    /// Executes a command, returning the first column of the first row, or
    /// `Value::Null` when there are no rows.
    async fn execute_scalar(&mut self, command: &mut Command) -> Result<Value>;

    /// Executes a command and returns a reader over its result rows.
    ///
    /// Output parameters are written back to `command` before this returns.
    /// When `behavior.close_connection` is set, the connection is closed when
    /// the reader is dropped, before returning if execution fails, and when
    /// the returned future is dropped before completing. [`CloseGuard`]
    /// covers the last two.
    async fn execute_reader<'c>(
        &'c mut self,
        command: &mut Command,
        behavior: Behavior,
    ) -> Result<Box<dyn Reader + 'c>>;
}

/// Forward-only cursor over a result set.
#[async_trait]
pub trait Reader: Send {
    /// Advances to the next row, returning `false` when exhausted.
    async fn read(&mut self) -> Result<bool>;

    fn field_count(&self) -> usize;

    fn name(&self, index: usize) -> &str;

    fn field_type(&self, index: usize) -> WireType;

    /// The value of column `index` in the current row.
    fn value(&self, index: usize) -> Result<Value>;
}
