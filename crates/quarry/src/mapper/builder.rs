use super::{Mapper, Settings, Shared};
use crate::{
    bind,
    cache::{ShapeCache, TypeCache},
    handle::{self, DynHandler, Handles, TypeHandler},
    param::{self, DynamicParameters, Parameters},
    registry::Registry,
    Mapped,
};

use quarry_core::{Field, Value};

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::{
    any::TypeId,
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};
use uuid::Uuid;

/// Configures a [`Mapper`].
///
/// Scalar fields, string-keyed maps of [`Value`] and [`DynamicParameters`]
/// are registered up front. Mapped types, custom fields and custom parameter
/// types are added here.
pub struct Builder {
    registry: Registry,
    handlers: HashMap<TypeId, Arc<dyn DynHandler>>,
    settings: Settings,
}

impl Default for Builder {
    fn default() -> Self {
        let mut builder = Builder {
            registry: Registry::default(),
            handlers: HashMap::new(),
            settings: Settings::default(),
        };
        builder.register_builtins();
        builder
    }
}

impl Builder {
    /// Registers a mapped type for row binding and as a parameter object.
    pub fn register<M: Mapped>(&mut self) -> &mut Self {
        let registration = self.registry.entry::<M>();
        registration.object = Some(bind::object::<M>);
        registration.reflected = Some(param::reflected::<M>);
        self
    }

    /// Registers a single-column type, along with its `Option`.
    pub fn register_field<F: Field>(&mut self) -> &mut Self {
        self.registry.entry::<F>().scalar = Some(bind::scalar::<F>);
        self.registry.entry::<Option<F>>().scalar = Some(bind::scalar::<Option<F>>);
        self
    }

    /// Registers a self-describing parameter type.
    pub fn register_parameters<P: Parameters>(&mut self) -> &mut Self {
        self.registry.entry::<P>().self_describing = Some(param::self_describing::<P>);
        self
    }

    /// Registers a custom handler for `F`. `F` is registered as a field too.
    pub fn type_handler<F: Field>(&mut self, handler: impl TypeHandler<F>) -> &mut Self {
        self.handlers
            .insert(TypeId::of::<F>(), handle::erase::<F>(handler));
        self.register_field::<F>()
    }

    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = settings;
        self
    }

    /// Sets the default command timeout.
    pub fn command_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.settings.command_timeout = Some(timeout);
        self
    }

    /// Builds the mapper, leaving this builder reset to its defaults.
    pub fn build(&mut self) -> Mapper {
        let Builder {
            registry,
            handlers,
            settings,
        } = std::mem::take(self);

        Mapper {
            shared: Arc::new(Shared {
                registry,
                handles: Handles::new(handlers),
                binders: ShapeCache::new(),
                parameters: TypeCache::new(),
                settings,
            }),
        }
    }

    fn register_map<M>(&mut self) -> &mut Self
    where
        M: Send + Sync + 'static,
        for<'a> &'a M: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        self.registry.entry::<M>().map_like = Some(param::map_like::<M>);
        self
    }

    fn register_builtins(&mut self) {
        self.register_field::<bool>()
            .register_field::<i8>()
            .register_field::<i16>()
            .register_field::<i32>()
            .register_field::<i64>()
            .register_field::<u8>()
            .register_field::<u16>()
            .register_field::<u32>()
            .register_field::<u64>()
            .register_field::<f32>()
            .register_field::<f64>()
            .register_field::<String>()
            .register_field::<Vec<u8>>()
            .register_field::<Uuid>()
            .register_field::<NaiveDate>()
            .register_field::<NaiveDateTime>()
            .register_field::<Value>()
            .register_map::<HashMap<String, Value>>()
            .register_map::<BTreeMap<String, Value>>()
            .register_map::<IndexMap<String, Value>>()
            .register_parameters::<DynamicParameters>();
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("registry", &self.registry)
            .field("handlers", &self.handlers.len())
            .field("settings", &self.settings)
            .finish()
    }
}
