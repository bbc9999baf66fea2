//! Base directory resolution for factory-built configurations.
//!
//! Tests and binaries often run from different directories of the same
//! project. Naming an anchor directory (usually the project root) makes the
//! base directory independent of where inside the project the process was
//! started.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The directory configuration paths are resolved against.
///
/// Without an anchor this is the current working directory. With one, it is
/// the nearest directory, starting at the working directory and walking up,
/// whose final component equals `anchor`; when no such directory exists the
/// working directory is used.
///
/// # Errors
///
/// Returns [`Error::BasePath`] if the working directory cannot be read.
pub fn resolve_base_dir(anchor: Option<&str>) -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|source| Error::BasePath { source })?;

    let Some(anchor) = anchor.filter(|a| !a.is_empty()) else {
        return Ok(cwd);
    };

    Ok(find_anchor(&cwd, anchor).unwrap_or(cwd))
}

/// The nearest of `start` and its ancestors named `anchor`.
///
/// Only whole path components match, and the innermost one wins: under
/// `/x/proj/y/proj/z` the anchor `proj` resolves to `/x/proj/y/proj`, not
/// `/x/proj`, and `pro` matches nothing.
#[must_use]
pub fn find_anchor(start: &Path, anchor: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.file_name() == Some(OsStr::new(anchor)))
        .map(Path::to_path_buf)
}

/// Append a caller-supplied relative path to `base`.
///
/// `""`, `"."` and `"./"` all mean `base` itself, and a leading `./` is
/// ignored.
#[must_use]
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let trimmed = relative.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);

    match trimmed {
        "" | "." => base.to_path_buf(),
        rel => base.join(rel),
    }
}
