use crate::{Error, Result, TypeInfo, Value, WireType};

use chrono::{NaiveDate, NaiveDateTime};
use std::any::{type_name, Any};
use uuid::Uuid;

/// A Rust type that can be stored in a single column or parameter.
///
/// Implemented for the primitive types, `String`, `Vec<u8>`, `Uuid`, the
/// chrono date types, and `Option` of any of these. Field-less enums get an
/// implementation from `#[derive(Field)]`.
///
/// Types with a custom type handler only need the defaults: the handler
/// performs the conversion and the mapper moves the value around through
/// [`as_any`](Field::as_any) and [`from_any`](Field::from_any).
pub trait Field: Default + Send + Sync + 'static {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>()
    }

    /// Converts the field into a wire value.
    fn to_value(&self) -> Result<Value> {
        Err(Error::unsupported_parameter_type(type_name::<Self>()))
    }

    /// Builds the field from a wire value, converting when the wire type
    /// does not match.
    fn from_value(value: Value) -> Result<Self> {
        Err(Error::unsupported_conversion(&value, type_name::<Self>()))
    }

    /// The field as the type a handler operates on, or `None` when null.
    fn as_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        Some(self)
    }

    /// Builds the field from a handler's output.
    fn from_any(value: Box<dyn Any + Send>) -> Result<Self> {
        value
            .downcast::<Self>()
            .map(|value| *value)
            .map_err(|_| {
                crate::err!(
                    "type handler produced a value that is not a `{}`",
                    type_name::<Self>()
                )
            })
    }

    /// Returns `true` if the field currently holds the null value.
    fn is_null(&self) -> bool {
        false
    }
}

macro_rules! impl_field {
    ( $( $ty:ty => $variant:ident ),+ $(,)? ) => {
        $(
            impl Field for $ty {
                fn to_value(&self) -> Result<Value> {
                    Ok(Value::$variant(self.clone()))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value.convert(WireType::$variant)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::unsupported_conversion(&other, type_name::<Self>())),
                    }
                }
            }
        )+
    };
}

impl_field! {
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

impl<T: Field> Field for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::nullable::<Self>(T::type_info)
    }

    fn to_value(&self) -> Result<Value> {
        match self {
            Some(value) => value.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }

    fn as_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.as_ref().and_then(T::as_any)
    }

    fn from_any(value: Box<dyn Any + Send>) -> Result<Self> {
        T::from_any(value).map(Some)
    }

    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, T::is_null)
    }
}

/// Raw values pass through untouched.
impl Field for Value {
    fn to_value(&self) -> Result<Value> {
        Ok(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}
