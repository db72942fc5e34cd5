//! Turning parameter objects into command parameters.
//!
//! A [`ParameterBuilder`] is created once per parameter type and cached by
//! the [`Mapper`](crate::Mapper). The strategy is chosen from what the type
//! was registered as, in order: self-describing ([`Parameters`]), map-like,
//! then reflected ([`Mapped`](crate::Mapped)).

mod dynamic;
pub use dynamic::{DynamicParameters, ParamOptions};

mod map;
pub(crate) use map::map_like;

mod object;
pub(crate) use object::reflected;

use crate::{handle::Handles, registry::Registry, Result};

use quarry_core::{Command, Error};

use std::{any::type_name, fmt};

type BuildFn<P> = dyn Fn(&P, &mut Command) -> Result<()> + Send + Sync;
type PostProcessFn<P> = dyn Fn(&mut P, &Command) -> Result<()> + Send + Sync;

/// Writes the parameters of a `P` into a command, and optionally reads
/// output values back after execution.
pub struct ParameterBuilder<P> {
    build: Box<BuildFn<P>>,
    post_process: Option<Box<PostProcessFn<P>>>,
}

impl<P> ParameterBuilder<P> {
    pub fn new(build: impl Fn(&P, &mut Command) -> Result<()> + Send + Sync + 'static) -> Self {
        ParameterBuilder {
            build: Box::new(build),
            post_process: None,
        }
    }

    pub fn with_post_process(
        mut self,
        post_process: impl Fn(&mut P, &Command) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.post_process = Some(Box::new(post_process));
        self
    }

    /// Appends the parameters of `params` to `command`.
    pub fn build(&self, params: &P, command: &mut Command) -> Result<()> {
        (self.build)(params, command)
    }

    pub fn has_post_process(&self) -> bool {
        self.post_process.is_some()
    }

    /// Copies output values from an executed command back into `params`.
    /// Does nothing without a post-process step.
    pub fn post_process(&self, params: &mut P, command: &Command) -> Result<()> {
        match &self.post_process {
            Some(post_process) => post_process(params, command),
            None => Ok(()),
        }
    }
}

impl<P> fmt::Debug for ParameterBuilder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterBuilder")
            .field("type", &type_name::<P>())
            .field("post_process", &self.post_process.is_some())
            .finish()
    }
}

/// A parameter object that writes its own parameters.
///
/// Register custom implementations with
/// [`Builder::register_parameters`](crate::Builder::register_parameters).
/// [`DynamicParameters`] is built in.
pub trait Parameters: Send + 'static {
    /// Whether [`on_completed`](Parameters::on_completed) should run after
    /// execution.
    const CALLBACKS: bool = false;

    fn add_parameters(&self, command: &mut Command) -> Result<()>;

    /// Called with the executed command when `CALLBACKS` is set.
    fn on_completed(&mut self, command: &Command) -> Result<()> {
        let _ = command;
        Ok(())
    }
}

pub(crate) fn self_describing<P: Parameters>(_handles: &Handles) -> Result<ParameterBuilder<P>> {
    let builder = ParameterBuilder::new(|params: &P, command| params.add_parameters(command));

    Ok(if P::CALLBACKS {
        builder.with_post_process(|params: &mut P, command| params.on_completed(command))
    } else {
        builder
    })
}

/// Picks the first applicable strategy for `P`.
pub(crate) fn create<P: 'static>(registry: &Registry, handles: &Handles) -> Result<ParameterBuilder<P>> {
    let strategy = registry.get::<P>().and_then(|registration| {
        registration
            .self_describing
            .or(registration.map_like)
            .or(registration.reflected)
    });

    match strategy {
        Some(strategy) => strategy(handles),
        None => Err(Error::unsupported_parameter_type(type_name::<P>())),
    }
}
