use crate::{err, Mapper, Result};

use quarry_core::{Command, CommandKind};

use std::{
    any::{type_name, Any},
    time::Duration,
};
use tokio_util::sync::CancellationToken;

/// A command to execute: SQL text plus an optional parameter object.
///
/// ```
/// # use quarry::{DynamicParameters, Statement};
/// let mut params = DynamicParameters::new();
/// params.add("id", 1i64);
///
/// let stmt = Statement::new("select * from users where id = @id").bind(&mut params);
/// assert_eq!(stmt.text(), "select * from users where id = @id");
/// ```
pub struct Statement<'a> {
    pub(crate) text: String,
    pub(crate) kind: CommandKind,
    pub(crate) timeout: Option<Duration>,
    pub(crate) params: Option<BoundParams<'a>>,
    pub(crate) cancel: Option<CancellationToken>,
}

/// A borrowed parameter object together with the functions that bind it.
pub(crate) struct BoundParams<'a> {
    value: &'a mut (dyn Any + Send),
    type_name: &'static str,
    build: fn(&Mapper, &dyn Any, &mut Command) -> Result<()>,
    complete: fn(&Mapper, &mut dyn Any, &Command) -> Result<()>,
}

impl<'a> Statement<'a> {
    pub fn new(text: impl Into<String>) -> Statement<'a> {
        Statement {
            text: text.into(),
            kind: CommandKind::Text,
            timeout: None,
            params: None,
            cancel: None,
        }
    }

    /// Creates a statement that calls a stored procedure.
    pub fn procedure(name: impl Into<String>) -> Statement<'a> {
        Statement {
            kind: CommandKind::StoredProcedure,
            ..Statement::new(name)
        }
    }

    /// Attaches the parameter object.
    ///
    /// It is borrowed mutably so output values can be written back after
    /// execution.
    pub fn bind<P: Send + 'static>(mut self, params: &'a mut P) -> Statement<'a> {
        self.params = Some(BoundParams {
            value: params,
            type_name: type_name::<P>(),
            build: build::<P>,
            complete: complete::<P>,
        });
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cancels execution when `token` fires.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Appends the bound parameters to `command`.
    pub(crate) fn build_parameters(&self, mapper: &Mapper, command: &mut Command) -> Result<()> {
        match &self.params {
            Some(params) => (params.build)(mapper, &*params.value, command),
            None => Ok(()),
        }
    }

    /// Copies output parameters from `command` back into the bound object.
    pub(crate) fn complete(&mut self, mapper: &Mapper, command: &Command) -> Result<()> {
        match &mut self.params {
            Some(params) => (params.complete)(mapper, &mut *params.value, command),
            None => Ok(()),
        }
    }
}

fn build<P: 'static>(mapper: &Mapper, params: &dyn Any, command: &mut Command) -> Result<()> {
    let Some(params) = params.downcast_ref::<P>() else {
        return Err(err!("bound parameters are not a `{}`", type_name::<P>()));
    };
    mapper.parameter_builder::<P>()?.build(params, command)
}

fn complete<P: 'static>(mapper: &Mapper, params: &mut dyn Any, command: &Command) -> Result<()> {
    let Some(params) = params.downcast_mut::<P>() else {
        return Err(err!("bound parameters are not a `{}`", type_name::<P>()));
    };
    mapper.parameter_builder::<P>()?.post_process(params, command)
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("text", &self.text)
            .field("kind", &self.kind)
            .field("timeout", &self.timeout)
            .field("params", &self.params.as_ref().map(|params| params.type_name))
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

impl<'a> From<&str> for Statement<'a> {
    fn from(text: &str) -> Self {
        Statement::new(text)
    }
}

impl<'a> From<String> for Statement<'a> {
    fn from(text: String) -> Self {
        Statement::new(text)
    }
}
