//! Concurrent cache keyed by target type and result shape.
//!
//! Lookups never take a lock: they load the currently published table from an
//! `ArcSwap` and walk its bucket chains. All mutation goes through a
//! single reentrant lock per cache, so a factory may itself insert into the
//! cache it is being called from.

mod table;
use table::{Entry, Table};

mod type_cache;
pub use type_cache::TypeCache;

use crate::Result;

use quarry_core::WireType;

use arc_swap::ArcSwap;
use parking_lot::ReentrantMutex;
use rustc_hash::FxBuildHasher;
use std::{any::TypeId, cell::RefCell, hash::BuildHasher, sync::Arc};

/// Number of buckets in a fresh table.
const MIN_CAPACITY: usize = 64;

/// A result column as reported by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: String,
    pub ty: WireType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: WireType) -> Column {
        Column {
            name: name.into(),
            ty,
        }
    }
}

/// Hashes a target type together with an ordered column shape.
pub fn shape_hash(ty: TypeId, columns: &[Column]) -> u64 {
    let hasher = FxBuildHasher;
    let mut hash = hasher.hash_one(ty);

    for column in columns {
        let component = hasher.hash_one(column.name.as_str()) ^ hasher.hash_one(column.ty);
        hash = hash.wrapping_mul(31).wrapping_add(component);
    }

    hash
}

pub struct ShapeCache<V> {
    /// The published table. A replaced table is freed once the last reader
    /// holding a snapshot of it is done.
    table: ArcSwap<Table<V>>,

    /// Serializes writers.
    state: ReentrantMutex<RefCell<State>>,
}

#[derive(Debug, Default)]
struct State {
    count: usize,
    depth: usize,
}

impl<V: Clone> ShapeCache<V> {
    pub fn new() -> ShapeCache<V> {
        ShapeCache {
            table: ArcSwap::from_pointee(Table::with_capacity(MIN_CAPACITY)),
            state: ReentrantMutex::new(RefCell::new(State::default())),
        }
    }

    /// Returns the cached value for the key, if any.
    pub fn try_get(&self, ty: TypeId, columns: &[Column], hash: u64) -> Option<V> {
        self.table
            .load()
            .find(ty, columns, hash)
            .map(|entry| entry.value.clone())
    }

    /// Returns the cached value for the key, running `factory` to create it
    /// when absent.
    ///
    /// The factory runs at most once per distinct key. It receives an owned
    /// copy of the shape, which is what the entry keeps. If it fails, the
    /// error is returned and nothing is inserted.
    pub fn get_or_create<F>(
        &self,
        ty: TypeId,
        columns: &[Column],
        hash: u64,
        factory: F,
    ) -> Result<V>
    where
        F: FnOnce(TypeId, &[Column]) -> Result<V>,
    {
        if let Some(value) = self.try_get(ty, columns, hash) {
            return Ok(value);
        }

        let guard = self.state.lock();

        // Another thread may have inserted while we waited on the lock.
        if let Some(value) = self.try_get(ty, columns, hash) {
            return Ok(value);
        }

        let columns: Box<[Column]> = columns.into();
        let value = factory(ty, &columns)?;

        // The factory may have inserted this key reentrantly.
        if let Some(value) = self.try_get(ty, &columns, hash) {
            return Ok(value);
        }

        let entry = Arc::new(Entry {
            ty,
            columns,
            hash,
            value: value.clone(),
        });

        let mut state = guard.borrow_mut();
        let current = self.table.load_full();
        let requested = usize::max(MIN_CAPACITY, (state.count + 1) * 3);

        if requested > current.len() {
            let table = Table::with_capacity(requested.next_power_of_two());
            let mut depth = 0;

            for existing in current.entries() {
                depth = depth.max(table.insert(existing.clone()));
            }
            depth = depth.max(table.insert(entry));

            self.table.store(Arc::new(table));
            state.depth = depth;
        } else {
            let depth = current.insert(entry);
            state.depth = state.depth.max(depth);
        }

        state.count += 1;
        Ok(value)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.state.lock().borrow().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Longest bucket chain in the current table.
    pub fn depth(&self) -> usize {
        self.state.lock().borrow().depth
    }

    /// Number of buckets in the current table.
    pub fn capacity(&self) -> usize {
        self.table.load().len()
    }

    /// Drops every entry by publishing a fresh, empty table.
    ///
    /// Values already handed out stay valid.
    pub fn clear(&self) {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();

        self.table
            .store(Arc::new(Table::with_capacity(MIN_CAPACITY)));
        *state = State::default();
    }
}

impl<V: Clone> Default for ShapeCache<V> {
    fn default() -> Self {
        ShapeCache::new()
    }
}

impl<V> std::fmt::Debug for ShapeCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.state.lock();
        let state = guard.borrow();
        f.debug_struct("ShapeCache")
            .field("count", &state.count)
            .field("depth", &state.depth)
            .field("capacity", &self.table.load().len())
            .finish()
    }
}
