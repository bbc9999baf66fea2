//! The cached, hot-reloadable configuration accessor.
//!
//! A [`YamlConfig`] pairs a [`RawSource`] with a [`CacheContainer`]. Reads
//! go to the cache first and fall back to the source; once
//! [`config_file_change_listen`](YamlConfig::config_file_change_listen) is
//! called, every accepted write to the file empties the container so the
//! next reads see the new content.
//!
//! ```text
//! get_int("port")
//!      │
//!      ▼
//! ┌────────────────┐  hit   ┌───────────────┐
//! │ CacheContainer │───────▶│  ConfigValue  │──▶ i64 / TypeMismatch
//! └───────┬────────┘        └───────────────┘
//!         │ miss
//!         ▼
//! ┌────────────────┐  set   ┌───────────────┐
//! │   RawSource    │───────▶│ CacheContainer│──▶ i64
//! └────────────────┘        └───────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::builder::YamlConfigBuilder;
use crate::cache::{CacheContainer, Namespace};
use crate::debounce::Debouncer;
use crate::provider::{RawSource, YamlSource};
use crate::value::CacheValue;
use crate::watch::ChangeEvent;
use crate::{Error, Result};

/// Cached accessor over a raw configuration source.
///
/// Values are cached per key the first time they are read and stay cached
/// until the file changes, so repeated reads never touch the source.
/// Each key should be read through one typed getter: once cached, reading
/// it with another getter returns [`Error::TypeMismatch`].
///
/// # Example
///
/// ```rust,ignore
/// use yamlcache::YamlConfig;
///
/// let config = YamlConfig::from_factory("./conf", "app", None)?;
/// config.config_file_change_listen()?;
///
/// let port = config.get_int("server.port")?;
/// let hosts = config.get_string_slice("server.hosts")?;
/// ```
pub struct YamlConfig<S: RawSource = YamlSource> {
    source: S,
    container: CacheContainer,
    populate: Mutex<()>,
    debouncer: Arc<Debouncer>,
    listening: AtomicBool,
}

impl YamlConfig<YamlSource> {
    /// Build a configuration the way most applications need it.
    ///
    /// The file `file_name` (default `config` when empty) is looked up in
    /// `relative_path` under the base directory, which is the working
    /// directory or its nearest ancestor named `anchor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BasePath`] if the working directory cannot be read,
    /// or [`Error::File`] if the file is missing or not valid YAML.
    pub fn from_factory(relative_path: &str, file_name: &str, anchor: Option<&str>) -> Result<Self> {
        let mut builder = YamlConfigBuilder::new()
            .relative_path(relative_path)
            .file_name(file_name);

        if let Some(anchor) = anchor {
            builder = builder.anchor(anchor);
        }

        builder.build()
    }

    /// Start configuring a new instance.
    #[must_use]
    pub fn builder() -> YamlConfigBuilder {
        YamlConfigBuilder::new()
    }
}

impl<S: RawSource> YamlConfig<S> {
    /// Assemble a configuration from an already loaded source.
    ///
    /// Nothing is read here; [`YamlConfigBuilder::build_with_source`] loads
    /// the source first.
    #[must_use]
    pub fn from_parts(source: S, container: CacheContainer, debouncer: Arc<Debouncer>) -> Self {
        Self {
            source,
            container,
            populate: Mutex::new(()),
            debouncer,
            listening: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // Typed getters
    // ========================================================================

    /// The raw document node under `key`, or `Null` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached by a typed getter.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.get_typed(key, |source, key| source.get_raw(key).unwrap_or(Value::Null))
    }

    /// The value under `key` as a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_typed(key, S::get_string)
    }

    /// The value under `key` as a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get_typed(key, S::get_bool)
    }

    /// The value under `key` as a platform integer.
    ///
    /// Shares its cache entry with [`get_int64`](Self::get_int64).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.get_typed(key, S::get_int)
    }

    /// The value under `key` as a 32-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_int32(&self, key: &str) -> Result<i32> {
        self.get_typed(key, S::get_int32)
    }

    /// The value under `key` as a 64-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_int64(&self, key: &str) -> Result<i64> {
        self.get_typed(key, S::get_int64)
    }

    /// The value under `key` as a float.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_float64(&self, key: &str) -> Result<f64> {
        self.get_typed(key, S::get_float64)
    }

    /// The value under `key` as a duration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_duration(&self, key: &str) -> Result<Duration> {
        self.get_typed(key, S::get_duration)
    }

    /// The value under `key` as a list of strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `key` was cached as another type.
    pub fn get_string_slice(&self, key: &str) -> Result<Vec<String>> {
        self.get_typed(key, S::get_string_slice)
    }

    fn get_typed<T, F>(&self, key: &str, fetch: F) -> Result<T>
    where
        T: CacheValue + Clone,
        F: FnOnce(&S, &str) -> T,
    {
        if let Some(cached) = self.container.key_exists(key) {
            return T::from_value(cached).map_err(|found| {
                Error::type_mismatch(self.container.namespace().as_str(), key, T::KIND, found)
            });
        }

        let value = fetch(&self.source, key);
        self.cache(key, &value);
        Ok(value)
    }

    /// Store a freshly fetched value unless a racing reader got there first.
    fn cache<T: CacheValue + Clone>(&self, key: &str, value: &T) {
        let _guard = self.populate.lock();

        if self.container.contains(key) {
            return;
        }

        self.container.set(key, value.clone().into_value());
        tracing::debug!(namespace = %self.container.namespace(), key, kind = %T::KIND, "cached value");
    }

    // ========================================================================
    // Reload
    // ========================================================================

    /// Clear this configuration's cache whenever its file is written.
    ///
    /// Registers a change handler on the source and starts the source's
    /// watcher. Writes arriving within the debounce threshold of the last
    /// accepted one are treated as duplicates; other change kinds are
    /// ignored. Calling this again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Watch`] if the watcher cannot be started. A later
    /// call retries starting it.
    pub fn config_file_change_listen(&self) -> Result<()> {
        if !self.listening.swap(true, Ordering::AcqRel) {
            let container = self.container.clone();
            let debouncer = Arc::clone(&self.debouncer);

            self.source.on_change(Arc::new(move |event| {
                handle_change(&container, &debouncer, event);
            }));
        }

        self.source.start_watching()?;
        Ok(())
    }

    /// Whether [`config_file_change_listen`](Self::config_file_change_listen)
    /// has been called.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    /// A configuration for another file in the same search directories.
    ///
    /// The clone gets its own source, a namespace named after `file_name`
    /// on the same shared table and a fresh debouncer with the same
    /// threshold. It is not listening for changes until asked to.
    ///
    /// Cloning onto the file this configuration already reads yields the
    /// namespace `<file_name>_`, so the clone never shares entries with
    /// its origin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] if the file is missing or not valid YAML.
    pub fn clone_with_file(&self, file_name: &str) -> Result<Self> {
        let source = self.source.with_file_name(file_name);
        source.read_from_disk()?;

        let mut namespace = Namespace::from_file_name(file_name);
        if &namespace == self.namespace() {
            namespace = Namespace::new(format!("{namespace}_"));
        }

        let container = self.container.table().container(namespace);
        let debouncer = Arc::new(Debouncer::new(self.debouncer.threshold()));

        Ok(Self::from_parts(source, container, debouncer))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The cache namespace of this configuration.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        self.container.namespace()
    }

    /// The cache container backing this configuration.
    #[must_use]
    pub const fn container(&self) -> &CacheContainer {
        &self.container
    }

    /// The debouncer filtering change notifications.
    #[must_use]
    pub const fn debouncer(&self) -> &Arc<Debouncer> {
        &self.debouncer
    }

    /// The raw source behind the cache.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

impl<S: RawSource> std::fmt::Debug for YamlConfig<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YamlConfig")
            .field("namespace", self.container.namespace())
            .field("debounce", &self.debouncer.threshold())
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

/// Apply one change notification to a container. Returns `true` when the
/// namespace was purged.
pub(crate) fn handle_change(
    container: &CacheContainer,
    debouncer: &Debouncer,
    event: &ChangeEvent,
) -> bool {
    if !event.is_write() {
        tracing::debug!(
            namespace = %container.namespace(),
            kind = %event.kind,
            "ignoring non-write change"
        );
        return false;
    }

    if !debouncer.try_accept() {
        tracing::debug!(
            namespace = %container.namespace(),
            path = %event.path.display(),
            "ignoring duplicate change notification"
        );
        return false;
    }

    let removed = container.fuzzy_delete();
    tracing::warn!(
        namespace = %container.namespace(),
        path = %event.path.display(),
        removed,
        "config file changed, reload"
    );
    true
}
