//! Per-type strategy table filled in by [`Builder`](crate::Builder).
//!
//! Each registered type gets a `Registration<T>` holding monomorphized
//! function pointers for the strategies that apply to it. The binder and
//! parameter pipelines pick the first applicable pointer.

use crate::{bind::RowBinder, cache::Column, handle::Handles, param::ParameterBuilder, Result};

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

pub(crate) type BinderFn<T> = fn(&Handles, &[Column]) -> Result<RowBinder<T>>;
pub(crate) type ParamFn<T> = fn(&Handles) -> Result<ParameterBuilder<T>>;

pub(crate) struct Registration<T> {
    pub(crate) scalar: Option<BinderFn<T>>,
    pub(crate) object: Option<BinderFn<T>>,
    pub(crate) self_describing: Option<ParamFn<T>>,
    pub(crate) map_like: Option<ParamFn<T>>,
    pub(crate) reflected: Option<ParamFn<T>>,
}

impl<T> Default for Registration<T> {
    fn default() -> Self {
        Registration {
            scalar: None,
            object: None,
            self_describing: None,
            map_like: None,
            reflected: None,
        }
    }
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Registry {
    pub(crate) fn get<T: 'static>(&self) -> Option<&Registration<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref())
    }

    /// Returns the registration for `T`, creating an empty one if needed.
    pub(crate) fn entry<T: 'static>(&mut self) -> &mut Registration<T> {
        let entry = self
            .entries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Registration::<T>::default()));

        match entry.downcast_mut() {
            Some(registration) => registration,
            None => unreachable!("registration stored under the wrong type id"),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.entries.len())
            .finish()
    }
}
