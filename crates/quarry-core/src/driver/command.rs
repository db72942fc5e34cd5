use super::Parameter;

use std::time::Duration;

/// How the driver interprets a command's text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    #[default]
    Text,
    StoredProcedure,
}

/// A command ready to hand to a driver.
#[derive(Debug, Default, Clone)]
pub struct Command {
    pub text: String,
    pub kind: CommandKind,
    pub timeout: Option<Duration>,
    pub parameters: Vec<Parameter>,
}

impl Command {
    pub fn new(text: impl Into<String>) -> Command {
        Command {
            text: text.into(),
            ..Command::default()
        }
    }

    /// Appends a parameter, replacing any existing one with the same name.
    pub fn push(&mut self, parameter: Parameter) {
        match self.parameter_mut(&parameter.name) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    /// Finds a parameter by name, ignoring ASCII case.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name.eq_ignore_ascii_case(name))
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters
            .iter_mut()
            .find(|parameter| parameter.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{driver::Direction, Value};

    use pretty_assertions::assert_eq;

    #[test]
    fn push_replaces_same_name() {
        let mut command = Command::new("select 1");
        command.push(Parameter::new("id", 1i64));
        command.push(Parameter::new("ID", 2i64));

        assert_eq!(command.parameters.len(), 1);
        assert_eq!(command.parameter("Id").unwrap().value, Value::I64(2));
    }

    #[test]
    fn parameter_mut_updates_in_place() {
        let mut command = Command::new("update orders set total = @total");
        command.push(Parameter::new("total", 0i64).with_direction(Direction::InputOutput));

        command.parameter_mut("TOTAL").unwrap().value = Value::I64(12);

        assert_eq!(
            command.parameters,
            [Parameter {
                name: "total".into(),
                value: Value::I64(12),
                wire_type: None,
                direction: Direction::InputOutput,
                size: None,
            }]
        );
        assert!(command.parameter_mut("missing").is_none());
    }
}
