//! Namespace-scoped view over the shared table.

use dashmap::mapref::entry::Entry;

use super::table::{IntoQualifiedKey, Namespace, SharedTable};
use crate::value::ConfigValue;

/// A view of the [`SharedTable`] restricted to one [`Namespace`].
///
/// Every operation qualifies its key with the container's namespace
/// before touching the table, so containers with different namespaces
/// never observe or remove each other's entries.
///
/// Entries are write-once: [`set`](Self::set) never replaces an existing
/// value. The only ways to drop entries are [`delete`](Self::delete) and
/// [`fuzzy_delete`](Self::fuzzy_delete).
///
/// # Example
///
/// ```rust
/// use yamlcache::{ConfigValue, Namespace, SharedTable};
///
/// let table = SharedTable::new();
/// let app = table.container(Namespace::new("app"));
/// let db = table.container(Namespace::new("db"));
///
/// assert!(app.set("port", ConfigValue::Int64(8080)));
/// assert!(!app.set("port", ConfigValue::Int64(9090)));
/// assert_eq!(app.get("port"), Some(ConfigValue::Int64(8080)));
/// assert_eq!(db.get("port"), None);
///
/// app.fuzzy_delete();
/// assert_eq!(app.get("port"), None);
/// ```
#[derive(Clone, Debug)]
pub struct CacheContainer {
    namespace: Namespace,
    table: SharedTable,
}

impl CacheContainer {
    pub(crate) const fn new(namespace: Namespace, table: SharedTable) -> Self {
        Self { namespace, table }
    }

    /// The namespace this container is scoped to.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The table this container reads and writes.
    #[must_use]
    pub const fn table(&self) -> &SharedTable {
        &self.table
    }

    /// Stores `value` under `key` unless the key is already present.
    ///
    /// Returns `true` when the value was stored. An existing entry is left
    /// untouched, an info-level event is logged and `false` is returned.
    pub fn set(&self, key: impl IntoQualifiedKey, value: ConfigValue) -> bool {
        let key = key.into_qualified(&self.namespace);

        match self.table.map().entry(key) {
            Entry::Occupied(existing) => {
                tracing::info!(
                    namespace = %self.namespace,
                    key = existing.key().key(),
                    "key to set already exists"
                );
                false
            }

            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// The value stored under `key`, or `None`.
    #[must_use]
    pub fn get(&self, key: impl IntoQualifiedKey) -> Option<ConfigValue> {
        self.key_exists(key)
    }

    /// Looks up `key` with a single table read, returning the value when
    /// present.
    #[must_use]
    pub fn key_exists(&self, key: impl IntoQualifiedKey) -> Option<ConfigValue> {
        let key = key.into_qualified(&self.namespace);
        self.table.map().get(&key).map(|entry| entry.value().clone())
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: impl IntoQualifiedKey) -> bool {
        let key = key.into_qualified(&self.namespace);
        self.table.map().contains_key(&key)
    }

    /// Removes `key`; absent keys are ignored.
    pub fn delete(&self, key: impl IntoQualifiedKey) {
        let key = key.into_qualified(&self.namespace);
        self.table.map().remove(&key);
    }

    /// Removes every entry in this namespace and returns how many went.
    ///
    /// Each shard of the table is locked in turn, so entries of other
    /// namespaces are never disturbed. Entries inserted into this
    /// namespace while the sweep runs may or may not survive it.
    pub fn fuzzy_delete(&self) -> usize {
        let mut removed = 0;

        self.table.map().retain(|key, _| {
            let keep = key.namespace() != &self.namespace;
            if !keep {
                removed += 1;
            }
            keep
        });

        tracing::debug!(namespace = %self.namespace, removed, "cleared namespace");
        removed
    }

    /// Number of entries in this namespace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table
            .map()
            .iter()
            .filter(|entry| entry.key().namespace() == &self.namespace)
            .count()
    }

    /// `true` when this namespace holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self
            .table
            .map()
            .iter()
            .any(|entry| entry.key().namespace() == &self.namespace)
    }
}
