#![allow(dead_code)]

use quarry::{
    async_trait, Behavior, CloseGuard, Command, Connection, ConnectionState, Error, Reader, Result,
    Value, WireType,
};

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Everything a [`StubConnection`] observed, shared with the test.
#[derive(Debug, Clone, Default)]
pub struct Log {
    inner: Arc<Mutex<LogInner>>,
}

#[derive(Debug, Default)]
struct LogInner {
    opens: usize,
    closes: usize,
    commands: Vec<Command>,
    behaviors: Vec<Behavior>,
}

impl Log {
    pub fn opens(&self) -> usize {
        self.inner.lock().unwrap().opens
    }

    pub fn closes(&self) -> usize {
        self.inner.lock().unwrap().closes
    }

    pub fn commands(&self) -> Vec<Command> {
        self.inner.lock().unwrap().commands.clone()
    }

    #[track_caller]
    pub fn last_command(&self) -> Command {
        self.commands().pop().expect("no commands executed")
    }

    pub fn behaviors(&self) -> Vec<Behavior> {
        self.inner.lock().unwrap().behaviors.clone()
    }
}

/// A connection that replays a scripted result instead of talking to a
/// database.
#[derive(Debug, Default)]
pub struct StubConnection {
    state: Option<ConnectionState>,
    columns: Vec<(String, WireType)>,
    rows: Vec<Vec<Value>>,
    affected: u64,
    outputs: Vec<(String, Value)>,
    fail: Option<String>,
    hang: bool,
    stall_after: Option<usize>,
    log: Log,
}

impl StubConnection {
    pub fn new() -> StubConnection {
        StubConnection::default()
    }

    pub fn columns(mut self, columns: &[(&str, WireType)]) -> Self {
        self.columns = columns
            .iter()
            .map(|(name, ty)| (name.to_string(), *ty))
            .collect();
        self
    }

    pub fn row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    /// Writes `value` into the output parameter `name` on every execution.
    pub fn output(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.outputs.push((name.to_string(), value.into()));
        self
    }

    /// Makes every execution fail with a driver error.
    pub fn fail(mut self, message: &str) -> Self {
        self.fail = Some(message.to_string());
        self
    }

    /// Makes every execution wait forever.
    pub fn hang(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Makes the reader wait forever once `rows` rows have been read.
    pub fn stall_after(mut self, rows: usize) -> Self {
        self.stall_after = Some(rows);
        self
    }

    /// Starts out open, as if the caller had opened it.
    pub fn opened(mut self) -> Self {
        self.state = Some(ConnectionState::Open);
        self
    }

    pub fn log(&self) -> Log {
        self.log.clone()
    }

    async fn run(&mut self, command: &mut Command) -> Result<()> {
        assert_eq!(self.state(), ConnectionState::Open, "executed on a closed connection");

        if self.hang {
            std::future::pending::<()>().await;
        }

        for (name, value) in &self.outputs {
            if let Some(parameter) = command.parameter_mut(name) {
                if parameter.direction.is_output() {
                    parameter.value = value.clone();
                }
            }
        }

        self.log.inner.lock().unwrap().commands.push(command.clone());

        match &self.fail {
            Some(message) => Err(Error::driver(std::io::Error::other(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Connection for StubConnection {
    fn state(&self) -> ConnectionState {
        self.state.unwrap_or(ConnectionState::Closed)
    }

    async fn open(&mut self) -> Result<()> {
        self.state = Some(ConnectionState::Open);
        self.log.inner.lock().unwrap().opens += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.state() == ConnectionState::Open {
            self.state = Some(ConnectionState::Closed);
            self.log.inner.lock().unwrap().closes += 1;
        }
        Ok(())
    }

    async fn execute_non_query(&mut self, command: &mut Command) -> Result<u64> {
        self.run(command).await?;
        Ok(self.affected)
    }

    async fn execute_scalar(&mut self, command: &mut Command) -> Result<Value> {
        self.run(command).await?;

        Ok(self
            .rows
            .first()
            .and_then(|row| row.first())
            .cloned()
            .unwrap_or_default())
    }

    async fn execute_reader<'c>(
        &'c mut self,
        command: &mut Command,
        behavior: Behavior,
    ) -> Result<Box<dyn Reader + 'c>> {
        self.log.inner.lock().unwrap().behaviors.push(behavior);

        let mut guard = CloseGuard::new(self, behavior.close_connection);
        guard.connection().run(command).await?;
        let conn = guard.disarm();

        let columns = conn.columns.clone();
        let rows = conn.rows.iter().cloned().collect();
        let stall_after = conn.stall_after;

        Ok(Box::new(StubReader {
            conn,
            close: behavior.close_connection,
            columns,
            rows,
            current: None,
            read: 0,
            stall_after,
        }))
    }
}

struct StubReader<'c> {
    conn: &'c mut StubConnection,
    close: bool,
    columns: Vec<(String, WireType)>,
    rows: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    read: usize,
    stall_after: Option<usize>,
}

#[async_trait]
impl Reader for StubReader<'_> {
    async fn read(&mut self) -> Result<bool> {
        if self.stall_after == Some(self.read) {
            std::future::pending::<()>().await;
        }

        self.read += 1;
        self.current = self.rows.pop_front();
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
        match &self.current {
            Some(row) => Ok(row[index].clone()),
            None => Err(quarry::err!("no current row")),
        }
    }
}

impl Drop for StubReader<'_> {
    fn drop(&mut self) {
        if self.close {
            let _ = self.conn.close();
        }
    }
}
