mod builder;
pub use builder::Builder;

mod settings;
pub use settings::Settings;

use crate::{
    bind::{self, RowBinder},
    cache::{shape_hash, Column, ShapeCache, TypeCache},
    handle::Handles,
    param::{self, ParameterBuilder},
    registry::Registry,
    Result,
};

use parking_lot::RwLock;
use std::{
    any::{type_name, Any, TypeId},
    sync::{Arc, OnceLock},
};
use tracing::{debug, trace};

type Erased = Arc<dyn Any + Send + Sync>;

/// Entry point of the mapping layer.
///
/// A `Mapper` owns the type registry and every cache. Cloning is cheap and
/// clones share the caches, so one mapper can serve many tasks at once.
#[derive(Clone)]
pub struct Mapper {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    registry: Registry,
    handles: Handles,
    binders: ShapeCache<Erased>,
    parameters: TypeCache<Erased>,
    pub(crate) settings: Settings,
}

/// Cache sizes reported by [`Mapper::stats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Cached row binders, one per (type, column shape).
    pub binders: usize,

    /// Longest bucket chain in the binder cache.
    pub binder_depth: usize,

    /// Cached parameter builders, one per parameter type.
    pub parameter_builders: usize,

    /// Resolved type handles.
    pub type_handles: usize,
}

static GLOBAL: OnceLock<RwLock<Mapper>> = OnceLock::new();

impl Mapper {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The process-wide mapper.
    ///
    /// Lazily built with only the built-in registrations unless replaced
    /// with [`set_global`](Mapper::set_global).
    pub fn global() -> Mapper {
        Self::global_slot().read().clone()
    }

    /// Replaces the process-wide mapper.
    pub fn set_global(mapper: Mapper) {
        *Self::global_slot().write() = mapper;
    }

    fn global_slot() -> &'static RwLock<Mapper> {
        GLOBAL.get_or_init(|| RwLock::new(Mapper::builder().build()))
    }

    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }

    pub fn handles(&self) -> &Handles {
        &self.shared.handles
    }

    /// Returns the row binder for `T` and the given column shape, building
    /// and caching it on first use.
    pub fn binder<T: 'static>(&self, columns: &[Column]) -> Result<RowBinder<T>> {
        let ty = TypeId::of::<T>();
        let hash = shape_hash(ty, columns);
        let shared = &self.shared;

        if let Some(binder) = shared.binders.try_get(ty, columns, hash) {
            trace!(ty = type_name::<T>(), "row binder cache hit");
            return Ok(downcast_binder(binder));
        }

        let binder = shared.binders.get_or_create(ty, columns, hash, |_, columns| {
            let binder = bind::create::<T>(&shared.registry, &shared.handles, columns)?;
            debug!(
                ty = type_name::<T>(),
                columns = columns.len(),
                "built row binder"
            );
            Ok(Arc::new(binder) as Erased)
        })?;

        Ok(downcast_binder(binder))
    }

    /// Returns the parameter builder for `P`, building and caching it on
    /// first use.
    pub fn parameter_builder<P: 'static>(&self) -> Result<Arc<ParameterBuilder<P>>> {
        let shared = &self.shared;

        let builder = shared
            .parameters
            .get_or_create(TypeId::of::<P>(), || {
                let builder = param::create::<P>(&shared.registry, &shared.handles)?;
                debug!(
                    ty = type_name::<P>(),
                    post_process = builder.has_post_process(),
                    "built parameter builder"
                );
                Ok(Arc::new(builder) as Erased)
            })?;

        match builder.downcast() {
            Ok(builder) => Ok(builder),
            Err(_) => unreachable!("parameter builder cached under the wrong type id"),
        }
    }

    /// Drops every cached binder, parameter builder and type handle.
    ///
    /// Binders already handed out stay usable.
    pub fn purge(&self) {
        self.shared.binders.clear();
        self.shared.parameters.clear();
        self.shared.handles.clear();
        debug!("purged mapper caches");
    }

    pub fn stats(&self) -> Stats {
        Stats {
            binders: self.shared.binders.len(),
            binder_depth: self.shared.binders.depth(),
            parameter_builders: self.shared.parameters.len(),
            type_handles: self.shared.handles.len(),
        }
    }
}

fn downcast_binder<T: 'static>(binder: Erased) -> RowBinder<T> {
    match binder.downcast_ref::<RowBinder<T>>() {
        Some(binder) => binder.clone(),
        None => unreachable!("row binder cached under the wrong type id"),
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("registry", &self.shared.registry)
            .field("settings", &self.shared.settings)
            .field("stats", &self.stats())
            .finish()
    }
}
