use super::Parameters;
use crate::{err, Result};

use quarry_core::{Command, Direction, Field, Parameter, Value, WireType};

use indexmap::IndexMap;

/// A bag of named parameters assembled at runtime.
///
/// Names are stored without a leading `@`, `:` or `$`. Output parameters are
/// read back after execution and can be retrieved with
/// [`get`](DynamicParameters::get).
#[derive(Debug, Default, Clone)]
pub struct DynamicParameters {
    entries: IndexMap<String, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    options: ParamOptions,
}

/// Per-parameter settings for [`DynamicParameters::add_with`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParamOptions {
    pub wire_type: Option<WireType>,
    pub direction: Direction,
    pub size: Option<usize>,
}

impl DynamicParameters {
    pub fn new() -> DynamicParameters {
        DynamicParameters::default()
    }

    /// Adds an input parameter, replacing any parameter with the same name.
    pub fn add(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.add_with(name, value, ParamOptions::default())
    }

    pub fn add_with(&mut self, name: &str, value: impl Into<Value>, options: ParamOptions) -> &mut Self {
        self.entries.insert(
            clean(name).to_string(),
            Entry {
                value: value.into(),
                options,
            },
        );
        self
    }

    /// Adds an output parameter of the given wire type.
    pub fn output(&mut self, name: &str, wire_type: WireType) -> &mut Self {
        self.add_with(
            name,
            Value::Null,
            ParamOptions {
                wire_type: Some(wire_type),
                direction: Direction::Output,
                size: None,
            },
        )
    }

    /// Returns the current value of a parameter, converted to `T`.
    ///
    /// After execution this is the value the database wrote for output
    /// parameters.
    pub fn get<T: Field>(&self, name: &str) -> Result<T> {
        let Some(entry) = self.entries.get(clean(name)) else {
            return Err(err!("no parameter named `{}`", clean(name)));
        };

        T::from_value(entry.value.clone())
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries.get(clean(name)).map(|entry| &entry.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Parameters for DynamicParameters {
    const CALLBACKS: bool = true;

    fn add_parameters(&self, command: &mut Command) -> Result<()> {
        for (name, entry) in &self.entries {
            command.push(Parameter {
                name: name.clone(),
                value: entry.value.clone(),
                wire_type: entry.options.wire_type,
                direction: entry.options.direction,
                size: entry.options.size,
            });
        }
        Ok(())
    }

    fn on_completed(&mut self, command: &Command) -> Result<()> {
        for (name, entry) in &mut self.entries {
            if !entry.options.direction.is_output() {
                continue;
            }

            if let Some(parameter) = command.parameter(name) {
                entry.value = parameter.value.clone();
            }
        }
        Ok(())
    }
}

fn clean(name: &str) -> &str {
    name.strip_prefix(['@', ':', '$']).unwrap_or(name)
}
