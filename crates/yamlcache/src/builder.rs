//! Builder for [`YamlConfig`] instances.
//!
//! The [`YamlConfigBuilder`] provides a fluent API for choosing where the
//! file lives, which cache table and namespace it uses and how change
//! notifications are debounced.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::cache::{Namespace, SharedTable};
use crate::config::YamlConfig;
use crate::debounce::Debouncer;
use crate::defaults;
use crate::file::SearchPath;
use crate::paths::{join_relative, resolve_base_dir};
use crate::provider::{RawSource, YamlSource};

/// Builder for configuring a [`YamlConfig`].
///
/// Default settings:
/// - Base directory: the current working directory
/// - Relative path: none
/// - File name: `config`
/// - Namespace: the file name
/// - Table: the process-wide [`SharedTable::global`]
/// - Debounce: 10ms, with a debouncer of its own
///
/// # Example
///
/// ```ignore
/// let config = YamlConfigBuilder::new()
///     .anchor("my-project")
///     .relative_path("conf")
///     .file_name("app")
///     .debounce(Duration::from_millis(50))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct YamlConfigBuilder {
    /// Directory under the base directory holding the file.
    relative_path: String,

    /// Configuration name, searched as `<name>.yaml`, `<name>.yml`, `<name>`.
    file_name: String,

    /// Ancestor directory name the base directory is resolved to.
    anchor: Option<String>,

    /// Explicit base directory, skipping working directory detection.
    base_dir: Option<PathBuf>,

    /// Namespace override.
    namespace: Option<Namespace>,

    /// Threshold for a debouncer created by the builder.
    debounce: Duration,

    /// Debouncer shared with other configurations.
    debouncer: Option<Arc<Debouncer>>,

    /// Table the cache lives in.
    table: Option<SharedTable>,
}

impl YamlConfigBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            relative_path: String::new(),
            file_name: defaults::FILE_NAME.to_string(),
            anchor: None,
            base_dir: None,
            namespace: None,
            debounce: defaults::DEBOUNCE,
            debouncer: None,
            table: None,
        }
    }

    /// Directory, relative to the base directory, holding the file.
    ///
    /// `""`, `"."` and `"./"` all mean the base directory itself.
    #[must_use]
    pub fn relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = path.into();
        self
    }

    /// Name of the configuration file. An empty name keeps the default.
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.file_name = name;
        }
        self
    }

    /// Resolve the base directory to the nearest ancestor of the working
    /// directory with this name.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // Running from my-project/crates/app/ still finds my-project/conf/
    /// YamlConfigBuilder::new()
    ///     .anchor("my-project")
    ///     .relative_path("conf")
    /// ```
    #[must_use]
    pub fn anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Use `dir` as the base directory instead of the working directory.
    #[must_use]
    pub fn base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Cache under `namespace` instead of the file name.
    ///
    /// Two configurations on one table must not share a namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl AsRef<str>) -> Self {
        self.namespace = Some(Namespace::new(namespace));
        self
    }

    /// Set the debounce threshold.
    ///
    /// Ignored when a shared [`debouncer`](Self::debouncer) is supplied.
    #[must_use]
    pub const fn debounce(mut self, threshold: Duration) -> Self {
        self.debounce = threshold;
        self
    }

    /// Share a debouncer with other configurations, so one accepted write
    /// suppresses near-simultaneous notifications for all of them.
    #[must_use]
    pub fn debouncer(mut self, debouncer: Arc<Debouncer>) -> Self {
        self.debouncer = Some(debouncer);
        self
    }

    /// Cache in `table` instead of the process-wide table.
    #[must_use]
    pub fn table(mut self, table: SharedTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Where the file will be searched for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BasePath`](crate::Error::BasePath) if no base
    /// directory was given and the working directory cannot be read.
    pub fn search_path(&self) -> Result<SearchPath> {
        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => resolve_base_dir(self.anchor.as_deref())?,
        };

        Ok(SearchPath::new(
            join_relative(&base, &self.relative_path),
            self.file_name.as_str(),
        ))
    }

    /// Build a configuration backed by the YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BasePath`](crate::Error::BasePath) if the base
    /// directory cannot be determined, or [`Error::File`](crate::Error::File)
    /// if the file is missing or not valid YAML.
    pub fn build(self) -> Result<YamlConfig<YamlSource>> {
        let source = YamlSource::new(self.search_path()?);
        self.build_with_source(source)
    }

    /// Build a configuration over a caller-supplied source.
    ///
    /// The source is read from disk before the configuration is returned.
    /// Location settings of the builder are not applied to it.
    ///
    /// # Errors
    ///
    /// Returns whatever [`RawSource::read_from_disk`] returns.
    pub fn build_with_source<S: RawSource>(self, source: S) -> Result<YamlConfig<S>> {
        source.read_from_disk()?;

        let namespace = self
            .namespace
            .unwrap_or_else(|| Namespace::from_file_name(&self.file_name));
        let table = self.table.unwrap_or_else(SharedTable::global);
        let debouncer = self
            .debouncer
            .unwrap_or_else(|| Arc::new(Debouncer::new(self.debounce)));

        tracing::debug!(%namespace, debounce = ?debouncer.threshold(), "built configuration");

        Ok(YamlConfig::from_parts(
            source,
            table.container(namespace),
            debouncer,
        ))
    }
}

impl Default for YamlConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
