use super::{shape_hash, ShapeCache};
use crate::Result;

use std::any::TypeId;

/// A [`ShapeCache`] keyed by type alone.
pub struct TypeCache<V> {
    inner: ShapeCache<V>,
}

impl<V: Clone> TypeCache<V> {
    pub fn new() -> TypeCache<V> {
        TypeCache {
            inner: ShapeCache::new(),
        }
    }

    pub fn try_get(&self, ty: TypeId) -> Option<V> {
        self.inner.try_get(ty, &[], shape_hash(ty, &[]))
    }

    pub fn get_or_create(&self, ty: TypeId, factory: impl FnOnce() -> Result<V>) -> Result<V> {
        self.inner
            .get_or_create(ty, &[], shape_hash(ty, &[]), |_, _| factory())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        self.inner.clear()
    }
}

impl<V: Clone> Default for TypeCache<V> {
    fn default() -> Self {
        TypeCache::new()
    }
}

impl<V> std::fmt::Debug for TypeCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}
