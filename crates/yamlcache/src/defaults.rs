//! Built-in defaults used when a builder option is left unset.

use std::time::Duration;

/// Configuration name used when none is given, and the namespace of
/// configurations built with an empty file name.
pub const FILE_NAME: &str = "config";

/// Minimum spacing between two accepted change notifications.
pub const DEBOUNCE: Duration = Duration::from_millis(10);

/// Extensions tried, in order, when locating a configuration file. A file
/// named exactly after the configuration is tried last.
pub const EXTENSIONS: &[&str] = &["yaml", "yml"];
