mod column;
pub(crate) use column::{Column, ColumnType};

mod diagnostics;
pub(crate) use diagnostics::Diagnostics;

mod direction;
pub(crate) use direction::Direction;

mod enumeration;
pub(crate) use enumeration::{Enum, Variant};

mod field;
pub(crate) use field::{Field, FieldAttr};

mod model;
pub(crate) use model::Model;

mod name;
pub(crate) use name::Name;
