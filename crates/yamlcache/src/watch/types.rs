//! Core types for file watching.
//!
//! - [`WatchError`] - Errors specific to file watching
//! - [`ChangeEvent`] - A change to a watched configuration file
//! - [`ChangeKind`] - What kind of file-system operation happened

use std::path::PathBuf;
use std::time::Instant;

use miette::Diagnostic;
use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};
use thiserror::Error;

/// Error type for watch operations.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum WatchError {
    /// Failed to initialize the file watcher.
    #[error("failed to initialize file watcher: {message}")]
    #[diagnostic(
        code(yamlcache::watch::init_failed),
        help("Check that the file paths exist and are accessible")
    )]
    InitFailed {
        /// Human-readable error message.
        message: String,
        /// The underlying notify error, if available.
        #[source]
        source: Option<notify::Error>,
    },

    /// Failed to watch a specific path.
    #[error("failed to watch path '{}': {message}", path.display())]
    #[diagnostic(
        code(yamlcache::watch::path_error),
        help("Ensure the path exists and you have read permissions")
    )]
    PathError {
        /// The path that could not be watched.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },

    /// The source has no resolved file to watch yet.
    #[error("nothing to watch: the configuration file has not been read")]
    #[diagnostic(
        code(yamlcache::watch::not_loaded),
        help("call read_from_disk() successfully before start_watching()")
    )]
    NotLoaded,
}

impl WatchError {
    /// Create a new `InitFailed` error.
    pub fn init_failed(message: impl Into<String>, source: Option<notify::Error>) -> Self {
        Self::InitFailed {
            message: message.into(),
            source,
        }
    }

    /// Create a new `PathError`.
    pub fn path_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::PathError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The file-system operation behind a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// File content was written.
    Write,
    /// The file was created (including being renamed into place).
    Create,
    /// The file was removed.
    Remove,
    /// The file was renamed.
    Rename,
    /// Only metadata (permissions, timestamps) changed.
    Metadata,
    /// Anything the platform watcher could not classify.
    Other,
}

impl ChangeKind {
    /// Maps a notify event kind. Access events are not changes.
    #[must_use]
    pub const fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Create),

            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => Some(Self::Write),

            EventKind::Modify(ModifyKind::Metadata(_)) => Some(Self::Metadata),

            // Another file was renamed onto the watched path.
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(Self::Create),

            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),

            EventKind::Remove(_) => Some(Self::Remove),

            EventKind::Access(_) => None,

            EventKind::Modify(ModifyKind::Other) | EventKind::Any | EventKind::Other => {
                Some(Self::Other)
            }
        }
    }

    /// Whether the file's content may now differ from what was read.
    #[must_use]
    pub const fn changes_content(self) -> bool {
        matches!(self, Self::Write | Self::Create)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Write => "write",
            Self::Create => "create",
            Self::Remove => "remove",
            Self::Rename => "rename",
            Self::Metadata => "metadata",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A change to a watched configuration file.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// The file that changed.
    pub path: PathBuf,

    /// What happened to it.
    pub kind: ChangeKind,

    /// When the change was observed.
    pub timestamp: Instant,
}

impl ChangeEvent {
    /// Create an event observed now.
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            timestamp: Instant::now(),
        }
    }

    /// Shorthand for a [`ChangeKind::Write`] event.
    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Write)
    }

    /// Returns `true` for content writes.
    #[must_use]
    pub fn is_write(&self) -> bool {
        self.kind == ChangeKind::Write
    }
}
