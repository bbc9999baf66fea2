//! YAML file support for the raw configuration source.
//!
//! This module locates a configuration file by name inside one or more
//! search directories, parses it into a [`serde_json::Value`] tree and
//! converts values to the scalar types the typed getters hand out.
//!
//! # Search Order
//!
//! For a name `config` and directory `dir` the candidates are:
//!
//! 1. `dir/config.yaml`
//! 2. `dir/config.yml`
//! 3. `dir/config` (so `test.yaml` can be named directly)
//!
//! # Error Handling
//!
//! Parse errors include source location information when the YAML parser
//! reports one, enabling rich diagnostic output via [`miette`]:
//!
//! ```text
//! Error: YAML parse error in config.yaml
//!    ╭─[config.yaml:2:7]
//!    │
//!  2 │ port: [8080
//!    │       ^^^^^ did not find expected ',' or ']'
//!    ╰────
//!   help: check indentation and ensure proper YAML syntax
//! ```

// FileError is intentionally large to provide rich miette diagnostics with source spans
#![allow(clippy::result_large_err)]

pub mod coerce;
mod duration;
mod error;
mod search;
mod utils;

pub use duration::parse_duration;
pub use error::FileError;
pub use search::SearchPath;
pub use utils::FileUtils;
