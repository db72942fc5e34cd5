//! Resolution of Rust types to wire types and custom type handlers.

use crate::{cache::TypeCache, err, Result};

use quarry_core::{Parameter, TypeInfo, Value, WireType};

use chrono::{NaiveDate, NaiveDateTime};
use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt,
    marker::PhantomData,
    sync::{Arc, OnceLock},
};
use tracing::trace;
use uuid::Uuid;

/// Converts values of a type the driver does not know natively.
///
/// Register an implementation with [`Builder::type_handler`]. The handler
/// applies to `T` and `Option<T>` properties, parameters, and scalar results.
///
/// [`Builder::type_handler`]: crate::Builder::type_handler
pub trait TypeHandler<T>: Send + Sync + 'static {
    /// Writes `value` into the parameter, setting its value and wire type.
    fn set_value(&self, parameter: &mut Parameter, value: &T) -> Result<()>;

    /// Parses a non-null database value.
    fn parse(&self, value: Value) -> Result<T>;
}

/// A [`TypeHandler`] with its target type erased.
pub(crate) trait DynHandler: Send + Sync {
    fn set_value(&self, parameter: &mut Parameter, value: &(dyn Any + Send + Sync)) -> Result<()>;

    fn parse(&self, value: Value) -> Result<Box<dyn Any + Send>>;
}

struct Erased<T, H> {
    handler: H,
    _p: PhantomData<fn() -> T>,
}

impl<T: Send + 'static, H: TypeHandler<T>> DynHandler for Erased<T, H> {
    fn set_value(&self, parameter: &mut Parameter, value: &(dyn Any + Send + Sync)) -> Result<()> {
        let Some(value) = value.downcast_ref::<T>() else {
            return Err(err!("type handler for `{}` received another type", type_name::<T>()));
        };
        self.handler.set_value(parameter, value)
    }

    fn parse(&self, value: Value) -> Result<Box<dyn Any + Send>> {
        Ok(Box::new(self.handler.parse(value)?))
    }
}

pub(crate) fn erase<T: Send + 'static>(handler: impl TypeHandler<T>) -> Arc<dyn DynHandler> {
    Arc::new(Erased {
        handler,
        _p: PhantomData,
    })
}

/// How values of one Rust type travel to and from the driver.
#[derive(Clone)]
pub struct TypeHandle {
    wire_type: Option<WireType>,
    handler: Option<Arc<dyn DynHandler>>,
    enumeration: bool,
}

impl TypeHandle {
    /// `true` when values of the type can be sent as parameters, either with
    /// a known wire type or through a custom handler.
    pub fn can_bind_as_parameter(&self) -> bool {
        self.wire_type.is_some() || self.handler.is_some()
    }

    pub fn wire_type(&self) -> Option<WireType> {
        self.wire_type
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// `true` for enums, whose wire type is their integer representation.
    pub fn is_enum(&self) -> bool {
        self.enumeration
    }

    pub(crate) fn handler(&self) -> Option<&Arc<dyn DynHandler>> {
        self.handler.as_ref()
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("wire_type", &self.wire_type)
            .field("handler", &self.handler.is_some())
            .field("enumeration", &self.enumeration)
            .finish()
    }
}

/// Resolves and caches [`TypeHandle`]s.
pub struct Handles {
    handlers: HashMap<TypeId, Arc<dyn DynHandler>>,
    cache: TypeCache<Arc<TypeHandle>>,
}

impl Handles {
    pub(crate) fn new(handlers: HashMap<TypeId, Arc<dyn DynHandler>>) -> Handles {
        Handles {
            handlers,
            cache: TypeCache::new(),
        }
    }

    /// Returns the handle for `ty`, resolving it on first use.
    pub fn lookup(&self, ty: TypeInfo) -> Result<Arc<TypeHandle>> {
        if let Some(handle) = self.cache.try_get(ty.id()) {
            return Ok(handle);
        }

        self.cache
            .get_or_create(ty.id(), || Ok(Arc::new(self.resolve(ty))))
    }

    fn resolve(&self, ty: TypeInfo) -> TypeHandle {
        let underlying = ty.underlying();
        let repr = underlying.enum_repr();

        let wire_type = wire_type_of(underlying.id())
            .or_else(|| repr.and_then(|repr| wire_type_of(repr.id())));
        let handler = self.handlers.get(&underlying.id()).cloned();

        trace!(
            ty = ty.name(),
            ?wire_type,
            handler = handler.is_some(),
            "resolved type handle"
        );

        TypeHandle {
            wire_type,
            handler,
            enumeration: repr.is_some(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn clear(&self) {
        self.cache.clear();
    }
}

impl fmt::Debug for Handles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handles")
            .field("handlers", &self.handlers.len())
            .field("cache", &self.cache)
            .finish()
    }
}

fn wire_type_of(ty: TypeId) -> Option<WireType> {
    static TABLE: OnceLock<HashMap<TypeId, WireType>> = OnceLock::new();

    macro_rules! table {
        ( $( $ty:ty => $wire:ident ),+ $(,)? ) => {
            HashMap::from([ $( (TypeId::of::<$ty>(), WireType::$wire), )+ ])
        };
    }

    TABLE
        .get_or_init(|| {
            table! {
                bool => Bool,
                i8 => I8,
                i16 => I16,
                i32 => I32,
                i64 => I64,
                u8 => U8,
                u16 => U16,
                u32 => U32,
                u64 => U64,
                f32 => F32,
                f64 => F64,
                String => String,
                Vec<u8> => Bytes,
                Uuid => Uuid,
                NaiveDate => Date,
                NaiveDateTime => Timestamp,
            }
        })
        .get(&ty)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::Field;

    #[derive(Debug, Default, PartialEq)]
    struct Celsius(f64);

    impl Field for Celsius {}

    struct CelsiusHandler;

    impl TypeHandler<Celsius> for CelsiusHandler {
        fn set_value(&self, parameter: &mut Parameter, value: &Celsius) -> Result<()> {
            parameter.value = Value::String(format!("{}C", value.0));
            parameter.wire_type = Some(WireType::String);
            Ok(())
        }

        fn parse(&self, value: Value) -> Result<Celsius> {
            let text = String::from_value(value)?;
            let degrees = text.trim_end_matches('C').parse::<f64>().map_err(|e| err!("{e}"))?;
            Ok(Celsius(degrees))
        }
    }

    fn handles() -> Handles {
        Handles::new(HashMap::from([(
            TypeId::of::<Celsius>(),
            erase(CelsiusHandler),
        )]))
    }

    #[test]
    fn builtin_types_have_wire_types() {
        let handles = handles();

        let handle = handles.lookup(i32::type_info()).unwrap();
        assert_eq!(handle.wire_type(), Some(WireType::I32));
        assert!(handle.can_bind_as_parameter());
        assert!(!handle.has_handler());
    }

    #[test]
    fn nullable_unwraps() {
        let handles = handles();
        let handle = handles.lookup(Option::<Uuid>::type_info()).unwrap();
        assert_eq!(handle.wire_type(), Some(WireType::Uuid));
    }

    #[test]
    fn custom_handler_makes_type_bindable() {
        let handles = handles();

        let handle = handles.lookup(Celsius::type_info()).unwrap();
        assert_eq!(handle.wire_type(), None);
        assert!(handle.can_bind_as_parameter());

        let nullable = handles.lookup(Option::<Celsius>::type_info()).unwrap();
        assert!(nullable.has_handler());

        let mut parameter = Parameter::default();
        let value = Celsius(21.5);
        handle
            .handler()
            .unwrap()
            .set_value(&mut parameter, &value)
            .unwrap();
        assert_eq!(parameter.value, Value::from("21.5C"));

        let parsed = handle.handler().unwrap().parse(Value::from("3C")).unwrap();
        assert_eq!(Celsius::from_any(parsed).unwrap(), Celsius(3.0));
    }

    #[test]
    fn unknown_type_cannot_bind() {
        #[derive(Default)]
        struct Opaque;
        impl Field for Opaque {}

        let handle = handles().lookup(Opaque::type_info()).unwrap();
        assert!(!handle.can_bind_as_parameter());
    }

    #[test]
    fn handles_are_cached() {
        let handles = handles();
        let a = handles.lookup(String::type_info()).unwrap();
        let b = handles.lookup(String::type_info()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(handles.len(), 1);
    }
}
