//! The shared table and its key types.

use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

use super::container::CacheContainer;
use crate::defaults;
use crate::value::ConfigValue;

/// A logical partition of the shared table, one per configuration instance.
///
/// Namespaces are compared as whole values: `app` and `app_v2` are
/// unrelated even though one is a string prefix of the other.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(Arc<str>);

impl Namespace {
    /// Create a namespace with an explicit name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The namespace for a configuration file name; an empty name maps to
    /// the default namespace.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.is_empty() {
            Self::new(defaults::FILE_NAME)
        } else {
            Self::new(file_name)
        }
    }

    /// The namespace name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scope a bare key to this namespace.
    #[must_use]
    pub fn qualify(&self, key: &str) -> QualifiedKey {
        QualifiedKey {
            namespace: self.clone(),
            key: Box::from(key),
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `(namespace, key)` pair, the key type of the shared table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedKey {
    namespace: Namespace,
    key: Box<str>,
}

impl QualifiedKey {
    /// The owning namespace.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The key within the namespace.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Display for QualifiedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.key)
    }
}

/// Anything a [`CacheContainer`] accepts as a key.
///
/// Bare keys are scoped to the container's namespace. A [`QualifiedKey`]
/// already in that namespace is used as is, so qualifying twice is a no-op;
/// one from another namespace has its bare key re-scoped.
pub trait IntoQualifiedKey {
    /// Scope `self` to `namespace`.
    fn into_qualified(self, namespace: &Namespace) -> QualifiedKey;
}

impl IntoQualifiedKey for &str {
    fn into_qualified(self, namespace: &Namespace) -> QualifiedKey {
        namespace.qualify(self)
    }
}

impl IntoQualifiedKey for &String {
    fn into_qualified(self, namespace: &Namespace) -> QualifiedKey {
        namespace.qualify(self)
    }
}

impl IntoQualifiedKey for String {
    fn into_qualified(self, namespace: &Namespace) -> QualifiedKey {
        QualifiedKey {
            namespace: namespace.clone(),
            key: self.into_boxed_str(),
        }
    }
}

impl IntoQualifiedKey for QualifiedKey {
    fn into_qualified(self, namespace: &Namespace) -> QualifiedKey {
        if self.namespace == *namespace {
            self
        } else {
            QualifiedKey {
                namespace: namespace.clone(),
                key: self.key,
            }
        }
    }
}

impl IntoQualifiedKey for &QualifiedKey {
    fn into_qualified(self, namespace: &Namespace) -> QualifiedKey {
        self.clone().into_qualified(namespace)
    }
}

static GLOBAL: LazyLock<SharedTable> = LazyLock::new(SharedTable::new);

/// One concurrent map backing any number of namespaces.
///
/// Cloning is cheap and yields a handle to the same map. Individual
/// inserts, loads and removals are atomic; sequences of them are not.
#[derive(Clone, Default)]
pub struct SharedTable {
    inner: Arc<DashMap<QualifiedKey, ConfigValue>>,
}

impl SharedTable {
    /// A new, empty, independent table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide table, created on first use and never torn down.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// A container scoped to `namespace` on this table.
    #[must_use]
    pub fn container(&self, namespace: Namespace) -> CacheContainer {
        CacheContainer::new(namespace, self.clone())
    }

    /// Total entries across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` when no namespace holds any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether two handles point at the same map.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn map(&self) -> &DashMap<QualifiedKey, ConfigValue> {
        &self.inner
    }
}

impl fmt::Debug for SharedTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTable")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
