use super::ParameterBuilder;
use crate::{err, handle::{DynHandler, Handles}, Mapped, Property, Result};

use quarry_core::{Command, Error, Parameter, Value, WireType};

use std::{any::type_name, sync::Arc};
use tracing::debug;

struct Bound<M> {
    property: Property<M>,
    wire_type: Option<WireType>,
    handler: Option<Arc<dyn DynHandler>>,
}

/// Builds parameters from the properties of a [`Mapped`] type.
///
/// Every non-skipped property becomes one parameter, in declaration order.
/// A post-process step is only created when some property has an output
/// direction.
pub(crate) fn reflected<M: Mapped>(handles: &Handles) -> Result<ParameterBuilder<M>> {
    let mut bound = vec![];

    for property in M::properties() {
        if property.is_skipped() {
            continue;
        }

        let handle = handles.lookup(property.type_info())?;

        if !handle.can_bind_as_parameter() && property.wire_type_override().is_none() {
            return Err(
                Error::unsupported_parameter_type(property.type_info().name()).context(err!(
                    "property `{}` of `{}`",
                    property.name(),
                    type_name::<M>()
                )),
            );
        }

        bound.push(Bound {
            wire_type: property.wire_type_override().or(handle.wire_type()),
            handler: handle.handler().cloned(),
            property,
        });
    }

    let has_output = bound
        .iter()
        .any(|bound| bound.property.param_direction().is_output());

    debug!(
        ty = type_name::<M>(),
        parameters = bound.len(),
        has_output,
        "built reflected parameter builder"
    );

    let bound = Arc::new(bound);
    let builder = ParameterBuilder::new({
        let bound = bound.clone();
        move |params: &M, command: &mut Command| {
            for bound in bound.iter() {
                command.push(bound.parameter(params)?);
            }
            Ok(())
        }
    });

    if !has_output {
        return Ok(builder);
    }

    Ok(builder.with_post_process(move |params: &mut M, command: &Command| {
        for bound in bound.iter() {
            if bound.property.param_direction().is_output() {
                bound.read_back(params, command)?;
            }
        }
        Ok(())
    }))
}

impl<M> Bound<M> {
    fn parameter(&self, params: &M) -> Result<Parameter> {
        let property = &self.property;
        let mut parameter = Parameter {
            name: property.effective_name().to_string(),
            value: Value::Null,
            wire_type: self.wire_type,
            direction: property.param_direction(),
            size: property.declared_size(),
        };

        if !parameter.direction.is_input() || property.is_null(params) {
            return Ok(parameter);
        }

        match (&self.handler, property.get_any(params)) {
            (Some(handler), Some(value)) => handler.set_value(&mut parameter, value)?,
            _ => parameter.value = property.get_value(params)?,
        }

        Ok(parameter)
    }

    fn read_back(&self, params: &mut M, command: &Command) -> Result<()> {
        let property = &self.property;
        let Some(parameter) = command.parameter(property.effective_name()) else {
            return Ok(());
        };

        if parameter.value.is_null() {
            property.reset(params);
            return Ok(());
        }

        let value = parameter.value.clone();
        let result = match &self.handler {
            Some(handler) => property.set_any(params, handler.parse(value)?),
            None => property.set_value(params, value),
        };

        result.map_err(|err| {
            err.context(err!(
                "output parameter `{}` -> property `{}`",
                parameter.name,
                property.name()
            ))
        })
    }
}
