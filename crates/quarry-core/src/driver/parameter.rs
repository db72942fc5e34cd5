use crate::{Value, WireType};

/// Parameter direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl Direction {
    /// Whether the value is sent to the database.
    pub fn is_input(self) -> bool {
        matches!(self, Self::Input | Self::InputOutput)
    }

    /// Whether the database writes a value back after execution.
    pub fn is_output(self) -> bool {
        !matches!(self, Self::Input)
    }
}

/// A named parameter attached to a [`Command`](super::Command).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,

    /// Explicit wire type. When `None` the driver infers it from the value.
    pub wire_type: Option<WireType>,

    pub direction: Direction,

    /// Declared size for variable-length types.
    pub size: Option<usize>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Parameter {
        Parameter {
            name: name.into(),
            value: value.into(),
            ..Parameter::default()
        }
    }

    pub fn with_wire_type(mut self, wire_type: WireType) -> Parameter {
        self.wire_type = Some(wire_type);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Parameter {
        self.direction = direction;
        self
    }

    pub fn with_size(mut self, size: usize) -> Parameter {
        self.size = Some(size);
        self
    }
}
