pub mod driver;
pub use driver::{Behavior, CloseGuard, Command, CommandKind, Connection, ConnectionState, Direction, Parameter, Reader};

mod error;
pub use error::{Error, IntoError};

mod field;
pub use field::Field;

mod ty;
pub use ty::WireType;

mod type_info;
pub use type_info::{TypeInfo, TypeKind};

mod value;
pub use value::Value;

/// A Result type alias that uses Quarry's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
