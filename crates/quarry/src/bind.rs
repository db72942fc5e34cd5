//! Building row binders: closures that turn the current reader row into a
//! `T`.
//!
//! Binders are built once per (type, column shape) and cached by the
//! [`Mapper`](crate::Mapper). Strategies are tried in order: scalar (a
//! registered [`Field`](quarry_core::Field)), then object (a registered
//! [`Mapped`](crate::Mapped) type).

mod object;
pub(crate) use object::object;

mod parser;
pub(crate) use parser::Parser;

mod scalar;
pub(crate) use scalar::scalar;

use crate::{cache::Column, handle::Handles, registry::Registry, Result};

use quarry_core::{Error, Reader};

use std::{any::type_name, fmt, sync::Arc};

type BindFn<T> = dyn Fn(&dyn Reader) -> Result<T> + Send + Sync;

/// Produces a `T` from the current row of a reader.
pub struct RowBinder<T> {
    bind: Arc<BindFn<T>>,
}

impl<T> RowBinder<T> {
    pub fn new(bind: impl Fn(&dyn Reader) -> Result<T> + Send + Sync + 'static) -> Self {
        RowBinder {
            bind: Arc::new(bind),
        }
    }

    pub fn bind(&self, reader: &dyn Reader) -> Result<T> {
        (self.bind)(reader)
    }

    /// Returns `true` if both binders are the same cached instance.
    pub fn ptr_eq(&self, other: &RowBinder<T>) -> bool {
        Arc::ptr_eq(&self.bind, &other.bind)
    }
}

impl<T> Clone for RowBinder<T> {
    fn clone(&self) -> Self {
        RowBinder {
            bind: self.bind.clone(),
        }
    }
}

impl<T> fmt::Debug for RowBinder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowBinder")
            .field("type", &type_name::<T>())
            .finish()
    }
}

/// Reads the column shape of a reader's current result set.
pub fn columns(reader: &dyn Reader) -> Vec<Column> {
    (0..reader.field_count())
        .map(|index| Column::new(reader.name(index), reader.field_type(index)))
        .collect()
}

/// Picks the first applicable strategy for `T`.
pub(crate) fn create<T: 'static>(
    registry: &Registry,
    handles: &Handles,
    columns: &[Column],
) -> Result<RowBinder<T>> {
    let strategy = registry
        .get::<T>()
        .and_then(|registration| registration.scalar.or(registration.object));

    match strategy {
        Some(strategy) => strategy(handles, columns),
        None => Err(Error::unsupported_result_type(type_name::<T>())),
    }
}
