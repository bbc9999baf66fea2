//! Error types for configuration access.
//!
//! This module contains the [`Error`] enum returned by every fallible
//! operation of the crate, with rich diagnostics via [`miette`].
//!
//! # Error Variants
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::File`] | The configuration file is missing, unreadable or invalid YAML |
//! | [`Error::Watch`] | The file watcher could not be started |
//! | [`Error::TypeMismatch`] | A cached entry holds a different type than requested |
//! | [`Error::BasePath`] | The working directory could not be determined |
//!
//! # Example
//!
//! ```rust,ignore
//! match config.get_int("port") {
//!     Ok(port) => { /* use port */ }
//!     Err(Error::TypeMismatch { key, found, .. }) => {
//!         eprintln!("{key} was first read as {found}");
//!     }
//!     Err(e) => eprintln!("{:?}", miette::Report::from(e)),
//! }
//! ```

use std::io;

use miette::Diagnostic;
use thiserror::Error as ThisError;

use crate::file::FileError;
use crate::value::ValueKind;
use crate::watch::WatchError;

/// Errors that can occur while loading, watching or reading configuration.
///
/// # Diagnostic Codes
///
/// | Code | Meaning |
/// |------|---------|
/// | `yamlcache::file::*` | See [`FileError`] |
/// | `yamlcache::watch::*` | See [`WatchError`] |
/// | `yamlcache::type_mismatch` | Cached entry has another type |
/// | `yamlcache::base_path` | Working directory unavailable |
#[derive(Debug, ThisError, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// An error occurred while locating, reading or parsing the file.
    ///
    /// Diagnostics are transparent, so miette shows the source snippet
    /// carried by the underlying [`FileError`].
    #[error(transparent)]
    #[diagnostic(transparent)]
    File(#[from] FileError),

    /// The file watcher could not be started.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Watch(#[from] WatchError),

    /// A key was cached as one type and requested as another.
    #[error("key '{key}' in '{namespace}' is cached as {found}, not {expected}")]
    #[diagnostic(
        code(yamlcache::type_mismatch),
        help("read each key through a single typed getter, or clear the cache first")
    )]
    TypeMismatch {
        /// Namespace of the cache entry.
        namespace: String,
        /// The requested key.
        key: String,
        /// The type the caller asked for.
        expected: ValueKind,
        /// The type stored in the cache.
        found: ValueKind,
    },

    /// The working directory could not be determined.
    #[error("failed to determine the base directory")]
    #[diagnostic(code(yamlcache::base_path))]
    BasePath {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create a new `TypeMismatch` error.
    pub fn type_mismatch(
        namespace: impl Into<String>,
        key: impl Into<String>,
        expected: ValueKind,
        found: ValueKind,
    ) -> Self {
        Self::TypeMismatch {
            namespace: namespace.into(),
            key: key.into(),
            expected,
            found,
        }
    }

    /// Returns `true` if the configuration file could not be found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::File(FileError::NotFound { .. }))
    }
}
