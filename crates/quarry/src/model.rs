use crate::Result;

use quarry_core::{Direction, Field, TypeInfo, Value, WireType};

use std::{any::Any, fmt, sync::Arc};

/// A type whose instances are built from result rows and can be used as a
/// parameter object.
///
/// Usually implemented with `#[derive(Mapped)]`.
pub trait Mapped: Default + Send + Sync + 'static {
    /// Describes the mapped properties in declaration order.
    fn properties() -> Vec<Property<Self>>;
}

/// A single mapped property of `T`.
pub struct Property<T> {
    name: String,
    column: Option<String>,
    ty: TypeInfo,
    wire_type: Option<WireType>,
    size: Option<usize>,
    direction: Direction,
    skip: bool,
    accessor: Arc<dyn Accessor<T>>,
}

/// Reads and writes one property of a target.
trait Accessor<T>: Send + Sync {
    fn is_null(&self, target: &T) -> bool;

    fn get(&self, target: &T) -> Result<Value>;

    fn get_any<'a>(&self, target: &'a T) -> Option<&'a (dyn Any + Send + Sync)>;

    fn set(&self, target: &mut T, value: Value) -> Result<()>;

    fn set_any(&self, target: &mut T, value: Box<dyn Any + Send>) -> Result<()>;

    fn reset(&self, target: &mut T);
}

struct FieldAccessor<T, P> {
    get: fn(&T) -> &P,
    set: fn(&mut T, P),
}

impl<T, P: Field> Accessor<T> for FieldAccessor<T, P> {
    fn is_null(&self, target: &T) -> bool {
        (self.get)(target).is_null()
    }

    fn get(&self, target: &T) -> Result<Value> {
        (self.get)(target).to_value()
    }

    fn get_any<'a>(&self, target: &'a T) -> Option<&'a (dyn Any + Send + Sync)> {
        (self.get)(target).as_any()
    }

    fn set(&self, target: &mut T, value: Value) -> Result<()> {
        (self.set)(target, P::from_value(value)?);
        Ok(())
    }

    fn set_any(&self, target: &mut T, value: Box<dyn Any + Send>) -> Result<()> {
        (self.set)(target, P::from_any(value)?);
        Ok(())
    }

    fn reset(&self, target: &mut T) {
        (self.set)(target, P::default());
    }
}

impl<T: 'static> Property<T> {
    /// Creates a property named `name` backed by the given field accessors.
    pub fn new<P: Field>(name: impl Into<String>, get: fn(&T) -> &P, set: fn(&mut T, P)) -> Self {
        Property {
            name: name.into(),
            column: None,
            ty: P::type_info(),
            wire_type: None,
            size: None,
            direction: Direction::Input,
            skip: false,
            accessor: Arc::new(FieldAccessor { get, set }),
        }
    }

    /// Maps the property to an explicitly named column / parameter.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Overrides the wire type used when binding the property as a parameter.
    pub fn wire_type(mut self, wire_type: WireType) -> Self {
        self.wire_type = Some(wire_type);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Excludes the property from parameters and result binding.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }
}

impl<T> Property<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column override, if declared.
    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// The column override if declared, otherwise the property name.
    pub fn effective_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    pub fn type_info(&self) -> TypeInfo {
        self.ty
    }

    pub fn wire_type_override(&self) -> Option<WireType> {
        self.wire_type
    }

    pub fn declared_size(&self) -> Option<usize> {
        self.size
    }

    pub fn param_direction(&self) -> Direction {
        self.direction
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub(crate) fn is_null(&self, target: &T) -> bool {
        self.accessor.is_null(target)
    }

    pub(crate) fn get_value(&self, target: &T) -> Result<Value> {
        self.accessor.get(target)
    }

    pub(crate) fn get_any<'a>(&self, target: &'a T) -> Option<&'a (dyn Any + Send + Sync)> {
        self.accessor.get_any(target)
    }

    pub(crate) fn set_value(&self, target: &mut T, value: Value) -> Result<()> {
        self.accessor.set(target, value)
    }

    pub(crate) fn set_any(&self, target: &mut T, value: Box<dyn Any + Send>) -> Result<()> {
        self.accessor.set_any(target, value)
    }

    pub(crate) fn reset(&self, target: &mut T) {
        self.accessor.reset(target)
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Property {
            name: self.name.clone(),
            column: self.column.clone(),
            ty: self.ty,
            wire_type: self.wire_type,
            size: self.size,
            direction: self.direction,
            skip: self.skip,
            accessor: self.accessor.clone(),
        }
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("ty", &self.ty)
            .field("wire_type", &self.wire_type)
            .field("size", &self.size)
            .field("direction", &self.direction)
            .field("skip", &self.skip)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Account {
        id: i64,
        nickname: Option<String>,
    }

    fn properties() -> Vec<Property<Account>> {
        vec![
            Property::new("Id", |a: &Account| &a.id, |a, v| a.id = v),
            Property::new("Nickname", |a: &Account| &a.nickname, |a, v| a.nickname = v)
                .column("nick")
                .size(40),
        ]
    }

    #[test]
    fn effective_name_prefers_column() {
        let properties = properties();
        assert_eq!(properties[0].effective_name(), "Id");
        assert_eq!(properties[1].effective_name(), "nick");
        assert_eq!(properties[1].declared_size(), Some(40));
    }

    #[test]
    fn accessors_read_and_write() {
        let properties = properties();
        let mut account = Account::default();

        properties[0].set_value(&mut account, Value::I32(7)).unwrap();
        properties[1]
            .set_value(&mut account, Value::from("neo"))
            .unwrap();

        assert_eq!(account.id, 7);
        assert_eq!(properties[1].get_value(&account).unwrap(), Value::from("neo"));
        assert!(!properties[1].is_null(&account));

        properties[1].reset(&mut account);
        assert!(properties[1].is_null(&account));
        assert_eq!(properties[1].get_value(&account).unwrap(), Value::Null);
    }

    #[test]
    fn type_info_tracks_nullable() {
        let properties = properties();
        assert!(!properties[0].type_info().is_nullable());
        assert!(properties[1].type_info().is_nullable());
    }
}
