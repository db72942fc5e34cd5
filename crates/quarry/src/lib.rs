pub mod bind;
pub use bind::RowBinder;

pub mod blocking;

pub mod cache;

mod connect;
pub use connect::connect;

pub mod exec;
pub use exec::{RowCursor, Statement};

pub mod handle;
pub use handle::{Handles, TypeHandle, TypeHandler};

mod mapper;
pub use mapper::{Builder, Mapper, Settings, Stats};

pub mod model;
pub use model::{Mapped, Property};

pub mod param;
pub use param::{DynamicParameters, ParamOptions, ParameterBuilder, Parameters};

mod registry;

pub mod select;

pub use quarry_core::{
    async_trait, bail,
    driver::{self, Behavior, CloseGuard, Command, CommandKind, Connection, ConnectionState, Direction, Parameter, Reader},
    err, Error, Field, Result, TypeInfo, TypeKind, Value, WireType,
};

pub use quarry_macros::{Field, Mapped};

pub use tokio_util::sync::CancellationToken;

#[doc(hidden)]
pub mod codegen_support {
    pub use crate::{Mapped, Property, Result};
    pub use quarry_core::{Direction, Error, Field, TypeInfo, Value, WireType};
    pub use std::{
        any::type_name,
        default::Default,
        option::Option,
        string::String,
        vec::Vec,
    };
}
