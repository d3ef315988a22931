// ── Generic reactive entity collection ──
//
// Ordered, copy-on-write storage with O(1) keyed lookups and push-based
// change notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::error::CoreError;

/// Extracts the primary key of a stored entity.
pub(crate) type KeyFn<T> = fn(&T) -> &str;

/// A reactive collection for a single entity type.
///
/// The snapshot is an `Arc<Vec<Arc<T>>>` in backend order. Replacing the
/// collection publishes a new snapshot wholesale; patching one entity
/// clones the outer `Vec` (cheap `Arc` clones) and that entity only, so
/// every untouched entity keeps its identity across the change.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    /// Key -> position in the current snapshot. Empty for unkeyed
    /// collections.
    by_key: DashMap<String, usize>,

    key_of: Option<KeyFn<T>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    /// A collection without keyed lookup (whole-collection replace only).
    pub(crate) fn new() -> Self {
        Self::with_key_fn(None)
    }

    /// A collection indexed by `key_of`.
    pub(crate) fn keyed(key_of: KeyFn<T>) -> Self {
        Self::with_key_fn(Some(key_of))
    }

    fn with_key_fn(key_of: Option<KeyFn<T>>) -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_key: DashMap::new(),
            key_of,
            version,
            snapshot,
        }
    }

    /// Replace the whole collection. The first entry with a given key owns
    /// the index slot; later duplicates stay in the snapshot unindexed.
    pub(crate) fn replace(&self, items: Vec<T>) {
        let values: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();

        self.by_key.clear();
        if let Some(key_of) = self.key_of {
            for (pos, item) in values.iter().enumerate() {
                self.by_key.entry(key_of(item).to_owned()).or_insert(pos);
            }
        }

        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(values));
        self.bump_version();
    }

    /// Copy-on-write update of the entity stored under `key`.
    ///
    /// `apply` works on a private clone; if it fails, nothing is published
    /// and the error is returned unchanged.
    pub(crate) fn patch<F>(&self, key: &str, apply: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut T) -> Result<(), CoreError>,
    {
        let pos = self
            .by_key
            .get(key)
            .map(|r| *r.value())
            .ok_or_else(|| CoreError::key_not_found(&[key]))?;
        let key_of = self.key_of;

        let mut result = Err(CoreError::key_not_found(&[key]));
        self.snapshot.send_if_modified(|snap| {
            let Some(current) = snap.get(pos) else {
                return false;
            };
            if key_of.is_some_and(|k| k(current) != key) {
                return false;
            }

            let mut target = T::clone(current);
            if let Err(e) = apply(&mut target) {
                result = Err(e);
                return false;
            }

            let mut next = Vec::clone(snap);
            if let Some(slot) = next.get_mut(pos) {
                *slot = Arc::new(target);
            }
            *snap = Arc::new(next);
            result = Ok(());
            true
        });

        if result.is_ok() {
            self.bump_version();
        }
        result
    }

    /// Look up an entity by its key.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        let pos = *self.by_key.get(key)?.value();
        self.snapshot.borrow().get(pos).cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
