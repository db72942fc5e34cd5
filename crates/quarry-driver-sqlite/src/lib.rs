mod reader;
use reader::SqliteReader;

mod value;
pub(crate) use value::Value;

use quarry_core::{
    async_trait, bail,
    driver::{Behavior, CloseGuard, Command, CommandKind, Connection, ConnectionState, Reader},
    Error, Result, Value as CoreValue, WireType,
};
use rusqlite::{types::Value as SqlValue, Connection as RusqliteConnection};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

#[derive(Debug)]
enum Target {
    File(PathBuf),
    InMemory,
}

/// A SQLite connection.
///
/// Starts out closed. An in-memory database lives only while the connection
/// is open, so keep it open across commands that share data.
#[derive(Debug)]
pub struct Sqlite {
    target: Target,
    busy_timeout: Option<Duration>,
    connection: Option<RusqliteConnection>,
}

/// Columns and rows produced by one command.
#[derive(Debug, Default)]
pub(crate) struct ResultSet {
    pub(crate) columns: Vec<(String, WireType)>,
    pub(crate) rows: Vec<Vec<CoreValue>>,
    pub(crate) changes: u64,
}

impl Sqlite {
    /// Create a new SQLite connection from a URL such as `sqlite::memory:` or
    /// `sqlite:///var/db/app.db?busy_timeout=500`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            bail!("connection URL does not have a `sqlite` scheme; url={url_str}");
        }

        let mut sqlite = if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        };

        for (key, value) in url.query_pairs() {
            match &*key {
                "busy_timeout" => {
                    let Ok(millis) = value.parse() else {
                        bail!("invalid busy_timeout `{value}`; url={url_str}");
                    };
                    sqlite.busy_timeout = Some(Duration::from_millis(millis));
                }
                _ => bail!("unknown connection option `{key}`; url={url_str}"),
            }
        }

        Ok(sqlite)
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self {
            target: Target::InMemory,
            busy_timeout: None,
            connection: None,
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            target: Target::File(path.as_ref().to_path_buf()),
            busy_timeout: None,
            connection: None,
        }
    }

    /// How long to wait on a locked database before failing.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    fn connection(&self) -> Result<&RusqliteConnection> {
        match &self.connection {
            Some(connection) => Ok(connection),
            None => bail!("sqlite connection is closed"),
        }
    }

    /// Prepares, binds and runs a command, buffering up to `limit` rows.
    fn run(&self, command: &mut Command, limit: Option<usize>) -> Result<ResultSet> {
        if command.kind == CommandKind::StoredProcedure {
            bail!("sqlite does not support stored procedures; name={}", command.text);
        }

        let connection = self.connection()?;

        if let Some(timeout) = command.timeout.or(self.busy_timeout) {
            connection.busy_timeout(timeout).map_err(Error::driver)?;
        }

        let mut stmt = connection.prepare_cached(&command.text).map_err(Error::driver)?;
        bind(&mut stmt, command)?;

        if stmt.column_count() == 0 {
            let changes = stmt.raw_execute().map_err(Error::driver)?;
            return Ok(ResultSet {
                changes: changes as u64,
                ..ResultSet::default()
            });
        }

        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let declared: Vec<Option<WireType>> = stmt
            .columns()
            .iter()
            .map(|column| column.decl_type().map(value::decltype_wire_type))
            .collect();

        let mut raw = vec![];
        let mut rows = stmt.raw_query();

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let values = (0..names.len())
                .map(|index| row.get_ref(index).map(SqlValue::from))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(Error::driver)?;
            raw.push(values);

            if limit.is_some_and(|limit| raw.len() >= limit) {
                break;
            }
        }
        drop(rows);

        let columns: Vec<(String, WireType)> = names
            .into_iter()
            .zip(declared)
            .enumerate()
            .map(|(index, (name, declared))| {
                let ty = declared
                    .or_else(|| {
                        raw.iter()
                            .find_map(|row| Value::storage_type((&row[index]).into()))
                    })
                    .unwrap_or(WireType::String);
                (name, ty)
            })
            .collect();

        let rows = raw
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&columns)
                    .map(|(value, (_, ty))| Value::from_sql(value.into(), *ty))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let result = ResultSet {
            columns,
            rows,
            changes: connection.changes() as u64,
        };

        write_outputs(command, &result);
        Ok(result)
    }
}

/// Binds command parameters to the statement's placeholders.
///
/// Named placeholders (`:name`, `@name`, `$name`) look up the parameter by
/// name, ignoring case. `?` and `?NNN` take input parameters by position.
fn bind(stmt: &mut rusqlite::Statement<'_>, command: &Command) -> Result<()> {
    let inputs: Vec<_> = command
        .parameters
        .iter()
        .filter(|parameter| parameter.direction.is_input())
        .collect();
    let mut next = 0;

    for index in 1..=stmt.parameter_count() {
        let placeholder = stmt.parameter_name(index).map(str::to_owned);

        let value = match placeholder.as_deref() {
            None => {
                next += 1;
                inputs.get(next - 1).map(|parameter| parameter_value(parameter))
            }
            Some(name) if name.starts_with('?') => {
                let position: usize = match name[1..].parse() {
                    Ok(position) => position,
                    Err(_) => bail!("invalid placeholder `{name}`"),
                };
                inputs
                    .get(position.wrapping_sub(1))
                    .map(|parameter| parameter_value(parameter))
            }
            Some(name) => command.parameter(&name[1..]).map(|parameter| {
                if parameter.direction.is_input() {
                    parameter_value(parameter)
                } else {
                    Ok(CoreValue::Null)
                }
            }),
        };

        let Some(value) = value else {
            bail!(
                "no value for placeholder `{}`",
                placeholder.unwrap_or_else(|| format!("?{index}"))
            );
        };

        stmt.raw_bind_parameter(index, Value::from(value?))
            .map_err(Error::driver)?;
    }

    Ok(())
}

fn parameter_value(parameter: &quarry_core::Parameter) -> Result<CoreValue> {
    match parameter.wire_type {
        Some(ty) => parameter.value.clone().convert(ty),
        None => Ok(parameter.value.clone()),
    }
}

/// SQLite has no output parameters. Output parameters are filled from the
/// column of the same name in the first row, so `insert .. returning id as
/// OrderId` populates an `OrderId` output parameter.
fn write_outputs(command: &mut Command, result: &ResultSet) {
    for parameter in &mut command.parameters {
        if !parameter.direction.is_output() {
            continue;
        }

        let column = result
            .columns
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(&parameter.name));

        if let Some(column) = column {
            parameter.value = result
                .rows
                .first()
                .map(|row| row[column].clone())
                .unwrap_or_default();
        }
    }
}

#[async_trait]
impl Connection for Sqlite {
    fn state(&self) -> ConnectionState {
        match self.connection {
            Some(_) => ConnectionState::Open,
            None => ConnectionState::Closed,
        }
    }

    async fn open(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }

        let connection = match &self.target {
            Target::File(path) => RusqliteConnection::open(path),
            Target::InMemory => RusqliteConnection::open_in_memory(),
        }
        .map_err(Error::driver)?;

        if let Some(timeout) = self.busy_timeout {
            connection.busy_timeout(timeout).map_err(Error::driver)?;
        }

        self.connection = Some(connection);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.close().map_err(|(_, err)| Error::driver(err)),
            None => Ok(()),
        }
    }

    async fn execute_non_query(&mut self, command: &mut Command) -> Result<u64> {
        Ok(self.run(command, None)?.changes)
    }

    async fn execute_scalar(&mut self, command: &mut Command) -> Result<CoreValue> {
        let result = self.run(command, Some(1))?;

        Ok(result
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default())
    }

    async fn execute_reader<'c>(
        &'c mut self,
        command: &mut Command,
        behavior: Behavior,
    ) -> Result<Box<dyn Reader + 'c>> {
        let mut guard = CloseGuard::new(self, behavior.close_connection);
        let result = guard
            .connection()
            .run(command, behavior.single_row.then_some(1))?;

        Ok(Box::new(SqliteReader::new(
            guard.disarm(),
            result,
            behavior.close_connection,
        )))
    }
}
