//! Raw configuration sources.
//!
//! This module defines the [`RawSource`] trait, the uncached layer a
//! [`YamlConfig`](crate::YamlConfig) reads from on a cache miss and
//! listens to for change notifications.
//!
//! # Built-in Sources
//!
//! - [`YamlSource`] - Loads a YAML file and watches it with `notify`
//!
//! # Custom Sources
//!
//! Only [`read_from_disk`](RawSource::read_from_disk),
//! [`get_raw`](RawSource::get_raw), the change hooks and
//! [`with_file_name`](RawSource::with_file_name) are required. The typed
//! getters default to coercing the raw value:
//!
//! ```rust,ignore
//! use yamlcache::{ChangeHandler, RawSource, Result, WatchError};
//! use serde_json::{Value, json};
//!
//! struct Fixed(Value);
//!
//! impl RawSource for Fixed {
//!     fn read_from_disk(&self) -> Result<()> { Ok(()) }
//!
//!     fn get_raw(&self, key: &str) -> Option<Value> {
//!         self.0.get(key).cloned()
//!     }
//!
//!     fn on_change(&self, _handler: ChangeHandler) {}
//!
//!     fn start_watching(&self) -> Result<(), WatchError> { Ok(()) }
//!
//!     fn with_file_name(&self, _file_name: &str) -> Self {
//!         Fixed(json!({}))
//!     }
//! }
//! ```

mod yaml;

pub use yaml::YamlSource;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::Result;
use crate::file::coerce;
use crate::watch::{ChangeEvent, WatchError};

/// Callback invoked for every change to a watched source.
///
/// Handlers run on the source's watcher thread and must not block for long.
pub type ChangeHandler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// An uncached configuration source.
///
/// The typed getters return the type's zero value (`""`, `false`, `0`,
/// [`Duration::ZERO`], an empty vector) when the key is absent or its value
/// cannot be converted. Callers that need to tell absence apart use
/// [`get_raw`](Self::get_raw).
pub trait RawSource: Send + Sync + 'static {
    /// Loads (or reloads) the source from its backing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`](crate::Error::File) if the file cannot be
    /// found, read or parsed. The previously loaded values stay in place.
    fn read_from_disk(&self) -> Result<()>;

    /// The value under `key`, if present.
    fn get_raw(&self, key: &str) -> Option<Value>;

    /// The value under `key` as a string.
    fn get_string(&self, key: &str) -> String {
        self.get_raw(key)
            .as_ref()
            .and_then(coerce::to_string)
            .unwrap_or_default()
    }

    /// The value under `key` as a boolean.
    fn get_bool(&self, key: &str) -> bool {
        self.get_raw(key)
            .as_ref()
            .and_then(coerce::to_bool)
            .unwrap_or_default()
    }

    /// The value under `key` as a platform integer.
    fn get_int(&self, key: &str) -> i64 {
        self.get_int64(key)
    }

    /// The value under `key` as a 32-bit integer.
    fn get_int32(&self, key: &str) -> i32 {
        self.get_raw(key)
            .as_ref()
            .and_then(coerce::to_i32)
            .unwrap_or_default()
    }

    /// The value under `key` as a 64-bit integer.
    fn get_int64(&self, key: &str) -> i64 {
        self.get_raw(key)
            .as_ref()
            .and_then(coerce::to_i64)
            .unwrap_or_default()
    }

    /// The value under `key` as a float.
    fn get_float64(&self, key: &str) -> f64 {
        self.get_raw(key)
            .as_ref()
            .and_then(coerce::to_f64)
            .unwrap_or_default()
    }

    /// The value under `key` as a duration.
    fn get_duration(&self, key: &str) -> Duration {
        self.get_raw(key)
            .as_ref()
            .and_then(coerce::to_duration)
            .unwrap_or_default()
    }

    /// The value under `key` as a list of strings.
    fn get_string_slice(&self, key: &str) -> Vec<String> {
        self.get_raw(key)
            .as_ref()
            .and_then(coerce::to_string_slice)
            .unwrap_or_default()
    }

    /// Registers a handler for change notifications.
    fn on_change(&self, handler: ChangeHandler);

    /// Starts delivering change notifications to the registered handlers.
    ///
    /// Calling it again once watching is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`WatchError`] if the platform watcher cannot be set up.
    fn start_watching(&self) -> Result<(), WatchError>;

    /// A new, unloaded source for `file_name` with the same search
    /// directories.
    #[must_use]
    fn with_file_name(&self, file_name: &str) -> Self
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Value);

    impl RawSource for Fixed {
        fn read_from_disk(&self) -> Result<()> {
            Ok(())
        }

        fn get_raw(&self, key: &str) -> Option<Value> {
            self.0.get(key).cloned()
        }

        fn on_change(&self, _handler: ChangeHandler) {}

        fn start_watching(&self) -> Result<(), WatchError> {
            Ok(())
        }

        fn with_file_name(&self, _file_name: &str) -> Self {
            Self(json!({}))
        }
    }

    #[test]
    fn test_typed_defaults_coerce() {
        let src = Fixed(json!({
            "name": "svc",
            "port": "8080",
            "ratio": 1,
            "debug": "t",
            "timeout": "1m30s",
            "hosts": ["a", "b"],
        }));

        assert_eq!(src.get_string("name"), "svc");
        assert_eq!(src.get_int("port"), 8080);
        assert_eq!(src.get_int32("port"), 8080);
        assert!((src.get_float64("ratio") - 1.0).abs() < f64::EPSILON);
        assert!(src.get_bool("debug"));
        assert_eq!(src.get_duration("timeout"), Duration::from_secs(90));
        assert_eq!(src.get_string_slice("hosts"), vec!["a", "b"]);
    }

    #[test]
    fn test_typed_defaults_zero_on_absent() {
        let src = Fixed(json!({ "nested": { "a": 1 } }));

        assert_eq!(src.get_string("missing"), "");
        assert!(!src.get_bool("missing"));
        assert_eq!(src.get_int64("missing"), 0);
        assert_eq!(src.get_duration("missing"), Duration::ZERO);
        assert!(src.get_string_slice("missing").is_empty());
        assert_eq!(src.get_int("nested"), 0);
    }
}
