use super::Column;

use std::{
    any::TypeId,
    sync::{Arc, OnceLock},
};

/// A published, append-only bucket array.
///
/// Links are per table: on resize every entry is relinked into fresh nodes of
/// the new table, so a reader still walking the old one is unaffected.
pub(super) struct Table<V> {
    buckets: Box<[Link<V>]>,
}

type Link<V> = OnceLock<Box<Node<V>>>;

struct Node<V> {
    entry: Arc<Entry<V>>,
    next: Link<V>,
}

pub(super) struct Entry<V> {
    pub(super) ty: TypeId,
    pub(super) columns: Box<[Column]>,
    pub(super) hash: u64,
    pub(super) value: V,
}

impl<V> Entry<V> {
    fn matches(&self, ty: TypeId, columns: &[Column], hash: u64) -> bool {
        self.hash == hash
            && self.ty == ty
            && self.columns.len() == columns.len()
            && self.columns.iter().zip(columns).all(|(a, b)| a == b)
    }
}

impl<V> Table<V> {
    pub(super) fn with_capacity(capacity: usize) -> Table<V> {
        debug_assert!(capacity.is_power_of_two());

        Table {
            buckets: (0..capacity).map(|_| OnceLock::new()).collect(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.buckets.len()
    }

    pub(super) fn find(&self, ty: TypeId, columns: &[Column], hash: u64) -> Option<&Entry<V>> {
        let mut link = &self.buckets[self.index(hash)];

        while let Some(node) = link.get() {
            if node.entry.matches(ty, columns, hash) {
                return Some(&*node.entry);
            }
            link = &node.next;
        }

        None
    }

    /// Appends an entry to the end of its bucket chain, returning the chain
    /// length after the append.
    ///
    /// Callers must hold the cache's write lock.
    pub(super) fn insert(&self, entry: Arc<Entry<V>>) -> usize {
        let mut link = &self.buckets[self.index(entry.hash)];
        let mut depth = 1;

        while let Some(node) = link.get() {
            link = &node.next;
            depth += 1;
        }

        let inserted = link
            .set(Box::new(Node {
                entry,
                next: OnceLock::new(),
            }))
            .is_ok();
        debug_assert!(inserted, "concurrent insert into shape cache table");

        depth
    }

    pub(super) fn entries(&self) -> impl Iterator<Item = &Arc<Entry<V>>> {
        self.buckets.iter().flat_map(|bucket| {
            let mut link = bucket;
            std::iter::from_fn(move || {
                let node = link.get()?;
                link = &node.next;
                Some(&node.entry)
            })
        })
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & (self.buckets.len() - 1)
    }
}
