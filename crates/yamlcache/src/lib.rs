//! # yamlcache
//!
//! Typed, cached accessors over a hot-reloadable YAML configuration file.
//!
//! `yamlcache` reads a YAML file once, hands out typed values through
//! getters like [`YamlConfig::get_int`], and remembers every value it hands
//! out. When the file is written, the remembered values of that file are
//! dropped and the next reads see the new content.
//!
//! ## Features
//!
//! - **Read-through cache** - Repeated reads never touch the file or parser
//! - **Hot reload** - File writes clear the cache via the `notify` crate
//! - **Debounced notifications** - Duplicate events from a single save are dropped
//! - **Namespaces** - Many configurations share one table without collisions
//! - **Lenient typing** - `"8080"`, `8080` and `8080.0` all read as an integer
//! - **Rich diagnostics** - YAML errors point at the offending line via [`miette`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use yamlcache::YamlConfig;
//!
//! fn main() -> miette::Result<()> {
//!     // Looks for ./conf/app.yaml, ./conf/app.yml, then ./conf/app
//!     let config = YamlConfig::from_factory("conf", "app", None)?;
//!     config.config_file_change_listen()?;
//!
//!     let port = config.get_int("server.port")?;
//!     let timeout = config.get_duration("server.timeout")?;
//!     println!("listening on {port}, timeout {timeout:?}");
//!
//!     // Same directory, another file, its own namespace
//!     let features = config.clone_with_file("features")?;
//!     let beta = features.get_bool("beta")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Keys
//!
//! Keys are dotted paths into the document (`server.port`, `hosts.0`),
//! matched case-insensitively. A key is cached under the getter that first
//! read it; reading it through a different getter returns
//! [`Error::TypeMismatch`]. Absent keys read as the type's zero value.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  miss  ┌──────────────┐  watch  ┌─────────────┐
//! │  YamlConfig  │───────▶│  YamlSource  │◀────────│ FileWatcher │
//! └──────┬───────┘        └──────┬───────┘         └─────────────┘
//!        │ hit                   │ on write
//!        ▼                       ▼
//! ┌──────────────┐        ┌──────────────┐
//! │CacheContainer│◀───────│  Debouncer   │  fuzzy_delete()
//! └──────┬───────┘        └──────────────┘
//!        ▼
//! ┌──────────────┐
//! │ SharedTable  │  DashMap<(namespace, key), ConfigValue>
//! └──────────────┘
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber:
//!
//! | Level | Event |
//! |-------|-------|
//! | `warn` | A file change cleared a namespace |
//! | `error` | A changed file could not be re-read; old values stay |
//! | `info` | A cache entry was set twice |
//! | `debug` | Dropped notifications, cache population, loads |

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// FileError is intentionally large to provide rich miette diagnostics with source spans
#![allow(clippy::result_large_err)]

// ============================================================================
// Core Modules
// ============================================================================

mod builder;
mod config;
mod debounce;
mod error;
mod paths;

pub mod cache;
pub mod defaults;
pub mod file;
pub mod provider;
pub mod value;
pub mod watch;

pub use builder::YamlConfigBuilder;
pub use cache::{CacheContainer, IntoQualifiedKey, Namespace, QualifiedKey, SharedTable};
pub use config::YamlConfig;
pub use debounce::Debouncer;
pub use error::Error;
pub use file::{FileError, SearchPath};
pub use paths::{find_anchor, join_relative, resolve_base_dir};
pub use provider::{ChangeHandler, RawSource, YamlSource};
pub use value::{CacheValue, ConfigValue, ValueKind};
pub use watch::{ChangeEvent, ChangeKind, WatchError};

/// Result type used throughout the crate.
///
/// Errors convert into [`miette::Report`] for fancy formatting:
///
/// ```rust,ignore
/// fn main() -> miette::Result<()> {
///     let config = yamlcache::YamlConfig::from_factory("", "", None)?;
///     Ok(())
/// }
/// ```
pub type Result<T, E = Error> = std::result::Result<T, E>;
