use crate::{handle::{DynHandler, TypeHandle}, Property, Result};

use quarry_core::{Field, Value, WireType};

use std::sync::Arc;

/// How a non-null column value becomes the destination type.
#[derive(Clone)]
pub(crate) enum Parser {
    /// The wire type already matches the destination.
    Direct,

    /// Convert to the destination's wire type first.
    Convert(WireType),

    /// Hand the value to a custom type handler.
    Handler(Arc<dyn DynHandler>),
}

impl Parser {
    pub(crate) fn resolve(handle: &TypeHandle, column: WireType) -> Parser {
        if let Some(handler) = handle.handler() {
            return Parser::Handler(handler.clone());
        }

        // Enums accept both their integer representation and variant names,
        // so they see the raw value.
        match handle.wire_type() {
            Some(target) if target != column && !handle.is_enum() => Parser::Convert(target),
            _ => Parser::Direct,
        }
    }

    pub(crate) fn parse<F: Field>(&self, value: Value) -> Result<F> {
        match self {
            Parser::Direct => F::from_value(value),
            Parser::Convert(target) => F::from_value(value.convert(*target)?),
            Parser::Handler(handler) => F::from_any(handler.parse(value)?),
        }
    }

    pub(crate) fn parse_into<T>(&self, property: &Property<T>, target: &mut T, value: Value) -> Result<()> {
        match self {
            Parser::Direct => property.set_value(target, value),
            Parser::Convert(wire_type) => property.set_value(target, value.convert(*wire_type)?),
            Parser::Handler(handler) => property.set_any(target, handler.parse(value)?),
        }
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parser::Direct => f.write_str("Direct"),
            Parser::Convert(wire_type) => f.debug_tuple("Convert").field(wire_type).finish(),
            Parser::Handler(_) => f.write_str("Handler"),
        }
    }
}
