use super::ParameterBuilder;
use crate::{handle::Handles, Result};

use quarry_core::{Parameter, Value};

/// Builds one input parameter per entry of a string-keyed map.
pub(crate) fn map_like<M>(_handles: &Handles) -> Result<ParameterBuilder<M>>
where
    M: 'static,
    for<'a> &'a M: IntoIterator<Item = (&'a String, &'a Value)>,
{
    Ok(ParameterBuilder::new(|params: &M, command| {
        for (name, value) in params {
            command.push(Parameter::new(name.clone(), value.clone()));
        }
        Ok(())
    }))
}
