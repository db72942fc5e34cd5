use std::any::TypeId;
use std::hash::{Hash, Hasher};

/// Runtime description of a Rust type as seen by the mapper.
///
/// Besides the `TypeId`, it records whether the type is a nullable wrapper
/// (`Option<T>`) or a field-less enum with an integer representation, so
/// handle resolution can fall back to the underlying type.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

#[derive(Debug, Clone, Copy)]
pub enum TypeKind {
    /// Any type that is neither nullable nor an enum
    Plain,

    /// `Option<T>`, carrying `T`'s info
    Nullable(fn() -> TypeInfo),

    /// A field-less enum, carrying the info of its integer representation
    Enum(fn() -> TypeInfo),
}

impl TypeInfo {
    pub fn of<T: ?Sized + 'static>() -> TypeInfo {
        TypeInfo {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: TypeKind::Plain,
        }
    }

    /// Info for the nullable type `T` wrapping the type described by `inner`.
    pub fn nullable<T: ?Sized + 'static>(inner: fn() -> TypeInfo) -> TypeInfo {
        TypeInfo {
            kind: TypeKind::Nullable(inner),
            ..TypeInfo::of::<T>()
        }
    }

    /// Info for the enum `T` represented on the wire by `repr`.
    pub fn enumeration<T: ?Sized + 'static>(repr: fn() -> TypeInfo) -> TypeInfo {
        TypeInfo {
            kind: TypeKind::Enum(repr),
            ..TypeInfo::of::<T>()
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, TypeKind::Nullable(_))
    }

    /// The wrapped type for nullable types, otherwise `self`.
    pub fn underlying(&self) -> TypeInfo {
        match self.kind {
            TypeKind::Nullable(inner) => inner(),
            _ => *self,
        }
    }

    /// The integer representation for enums.
    pub fn enum_repr(&self) -> Option<TypeInfo> {
        match self.kind {
            TypeKind::Enum(repr) => Some(repr()),
            _ => None,
        }
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl core::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name)
    }
}
