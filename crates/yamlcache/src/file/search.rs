//! Locating a configuration file by name inside search directories.

use std::path::{Path, PathBuf};

use super::error::FileError;
use crate::defaults;

/// Where to look for a configuration file and under which name.
///
/// The name is a base name such as `config`. For every directory the
/// candidates `<dir>/<name>.yaml` and `<dir>/<name>.yml` are tried first,
/// then `<dir>/<name>` itself, so a name that already carries an extension
/// (`test.yaml`) resolves to that exact file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
    name: String,
}

impl SearchPath {
    /// Search `dir` for `name`.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dirs: vec![dir.into()],
            name: name.into(),
        }
    }

    /// Add another directory, searched after the existing ones.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    /// Same directories, different file name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            dirs: self.dirs.clone(),
            name: name.into(),
        }
    }

    /// The configuration name being searched for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directories being searched, in order.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Every path that [`locate`](Self::locate) would try, in order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.dirs
            .iter()
            .flat_map(|dir| Self::candidates_in(dir, &self.name))
            .collect()
    }

    fn candidates_in(dir: &Path, name: &str) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = defaults::EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .collect();
        paths.push(dir.join(name));
        paths
    }

    /// Returns the first candidate that exists as a regular file.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::NotFound`] listing every searched path when no
    /// candidate exists.
    pub fn locate(&self) -> Result<PathBuf, FileError> {
        let candidates = self.candidates();

        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| FileError::NotFound {
                name: self.name.clone(),
                searched: candidates,
            })
    }
}
