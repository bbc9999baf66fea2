//! File error types with rich diagnostics.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Error type for locating, reading and parsing a configuration file.
///
/// Integrates with [`miette`] so parse failures render with a snippet of
/// the offending YAML document:
///
/// ```text
/// Error: YAML parse error in config.yaml
///    ╭─[config.yaml:3:8]
///    │
///  3 │ port: [8080
///    │       ^^^^^ did not find expected ',' or ']'
///    ╰────
///   help: check indentation and ensure proper YAML syntax
/// ```
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum FileError {
    /// No candidate file exists in any search directory.
    #[error("configuration file `{name}` not found (searched {searched:?})")]
    #[diagnostic(
        code(yamlcache::file::not_found),
        help("create the file or point the factory at the directory that holds it")
    )]
    NotFound {
        /// The configuration name that was searched for.
        name: String,

        /// Every path that was tried.
        searched: Vec<PathBuf>,
    },

    /// Failed to read file
    #[error("failed to read configuration file: {}", path.display())]
    #[diagnostic(
        code(yamlcache::file::read_error),
        help("check file permissions and ensure it's readable")
    )]
    ReadError {
        /// Path to the file
        path: PathBuf,

        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Parse error with source location
    #[error("YAML parse error in {path}")]
    #[diagnostic(code(yamlcache::file::parse_error))]
    Parse {
        /// Path to the file
        path: String,

        /// The source file content for display
        #[source_code]
        src: NamedSource<String>,

        /// The location of the error
        #[label("{message}")]
        span: SourceSpan,

        /// Description of what went wrong
        message: String,

        /// Suggestion for how to fix
        #[help]
        help: String,
    },

    /// Parse error without source location (fallback)
    #[error("YAML parse error in {path}: {message}")]
    #[diagnostic(code(yamlcache::file::parse_error))]
    ParseNoSpan {
        /// Path to the file
        path: String,

        /// Description of what went wrong
        message: String,

        /// Suggestion for how to fix
        #[help]
        help: String,
    },
}
