//! YAML file source with change watching.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use super::{ChangeHandler, RawSource};
use crate::Result;
use crate::file::{FileUtils, SearchPath};
use crate::watch::{ChangeEvent, FileWatcher, WatchError};

/// A [`RawSource`] backed by a YAML file.
///
/// The file is located through a [`SearchPath`] and parsed into a
/// [`serde_json::Value`] tree. Once [`start_watching`](RawSource::start_watching)
/// is called, writes to the file re-read it before any registered handler
/// runs, so handlers always observe the new content. A write that leaves
/// the file unparsable is logged and the previous document is kept.
///
/// Cloning yields another handle to the same document and watcher.
///
/// # Example
///
/// ```rust,ignore
/// use yamlcache::{RawSource, YamlSource};
/// use yamlcache::file::SearchPath;
///
/// let source = YamlSource::open(SearchPath::new("./conf", "app"))?;
/// let port = source.get_int("server.port");
/// ```
#[derive(Clone)]
pub struct YamlSource {
    inner: Arc<Inner>,
}

struct Inner {
    search: SearchPath,
    document: RwLock<Arc<Value>>,
    path: RwLock<Option<PathBuf>>,
    handlers: Mutex<Vec<ChangeHandler>>,
    watcher: Mutex<Option<FileWatcher>>,
}

impl YamlSource {
    /// Create an unloaded source. Every key is absent until
    /// [`read_from_disk`](RawSource::read_from_disk) succeeds.
    #[must_use]
    pub fn new(search: SearchPath) -> Self {
        Self {
            inner: Arc::new(Inner {
                search,
                document: RwLock::new(Arc::new(Value::Object(Map::new()))),
                path: RwLock::new(None),
                handlers: Mutex::new(Vec::new()),
                watcher: Mutex::new(None),
            }),
        }
    }

    /// Create a source and load it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`](crate::Error::File) if the file cannot be
    /// found, read or parsed.
    pub fn open(search: SearchPath) -> Result<Self> {
        let source = Self::new(search);
        source.read_from_disk()?;
        Ok(source)
    }

    /// Where this source looks for its file.
    #[must_use]
    pub fn search_path(&self) -> &SearchPath {
        &self.inner.search
    }

    /// The file the last successful load read, if any.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.inner.path.read().clone()
    }

    /// A snapshot of the current document.
    #[must_use]
    pub fn document(&self) -> Arc<Value> {
        self.inner.document.read().clone()
    }

    /// Whether a watcher is running for this source.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.inner.watcher.lock().is_some()
    }
}

impl Inner {
    fn load(&self) -> Result<PathBuf> {
        let path = self.search.locate()?;
        let document = FileUtils::parse_file(&path)?;

        *self.document.write() = Arc::new(document);
        *self.path.write() = Some(path.clone());

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(path)
    }

    fn dispatch(&self, event: &ChangeEvent) {
        if event.kind.changes_content()
            && let Err(e) = self.load()
        {
            tracing::error!(
                path = %event.path.display(),
                error = %e,
                "failed to re-read configuration file, keeping previous values"
            );
        }

        // Handlers may register further handlers; don't hold the lock.
        let handlers = self.handlers.lock().clone();
        for handler in &handlers {
            handler(event);
        }
    }
}

impl RawSource for YamlSource {
    fn read_from_disk(&self) -> Result<()> {
        self.inner.load().map(|_| ())
    }

    fn get_raw(&self, key: &str) -> Option<Value> {
        let document = self.document();
        FileUtils::lookup(&document, key).cloned()
    }

    fn on_change(&self, handler: ChangeHandler) {
        self.inner.handlers.lock().push(handler);
    }

    fn start_watching(&self) -> Result<(), WatchError> {
        let mut slot = self.inner.watcher.lock();
        if slot.is_some() {
            return Ok(());
        }

        let path = self.path().ok_or(WatchError::NotLoaded)?;
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        let watcher = FileWatcher::start(&path, move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(&event);
            }
        })?;

        *slot = Some(watcher);
        Ok(())
    }

    fn with_file_name(&self, file_name: &str) -> Self {
        Self::new(self.inner.search.with_name(file_name))
    }
}

impl std::fmt::Debug for YamlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YamlSource")
            .field("search", &self.inner.search)
            .field("path", &self.path())
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}

/// Convenience for sources rooted in a single directory.
impl From<(&Path, &str)> for YamlSource {
    fn from((dir, name): (&Path, &str)) -> Self {
        Self::new(SearchPath::new(dir, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::file::FileError;
    use crate::watch::ChangeKind;
    use serde_json::json;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn test_open_and_lookup() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "hello: word\nfoo: 1.0\nServer:\n  Port: 8080\n",
        )
        .unwrap();

        let source = YamlSource::open(SearchPath::new(dir.path(), "config")).unwrap();

        assert_eq!(source.get_string("hello"), "word");
        assert!((source.get_float64("foo") - 1.0).abs() < f64::EPSILON);
        assert_eq!(source.get_int("server.port"), 8080);
        assert_eq!(source.get_raw("missing"), None);
        assert_eq!(source.path(), Some(dir.path().join("config.yaml")));
    }

    #[test]
    fn test_unloaded_source_is_empty() {
        let dir = tempdir().unwrap();
        let source = YamlSource::from((dir.path(), "config"));

        assert_eq!(source.get_raw("anything"), None);
        assert!(source.path().is_none());
        assert!(matches!(source.start_watching(), Err(WatchError::NotLoaded)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = YamlSource::open(SearchPath::new(dir.path(), "absent"));

        assert!(matches!(
            result,
            Err(Error::File(FileError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_failed_reload_keeps_document() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "a: 1\n").unwrap();

        let source = YamlSource::open(SearchPath::new(dir.path(), "config")).unwrap();
        fs::write(&file, "a: [1\n").unwrap();

        assert!(source.read_from_disk().is_err());
        assert_eq!(source.get_raw("a"), Some(json!(1)));
    }

    #[test]
    fn test_with_file_name_shares_search_dirs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "foo: 1.0\nhello: word\n").unwrap();
        fs::write(dir.path().join("test.yml"), "foo: 2.0\n").unwrap();

        let source = YamlSource::open(SearchPath::new(dir.path(), "config")).unwrap();
        let other = source.with_file_name("test");

        assert_eq!(other.get_raw("foo"), None);
        other.read_from_disk().unwrap();
        assert!((other.get_float64("foo") - 2.0).abs() < f64::EPSILON);
        assert_eq!(other.get_string("hello"), "");
        assert!((source.get_float64("foo") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dispatch_reloads_before_handlers() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "n: 1\n").unwrap();

        let source = YamlSource::open(SearchPath::new(dir.path(), "config")).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));

        let probe = source.clone();
        let counter = seen.clone();
        source.on_change(Arc::new(move |_event| {
            let n = probe.get_int("n");
            counter.store(usize::try_from(n).unwrap(), Ordering::SeqCst);
        }));

        fs::write(&file, "n: 2\n").unwrap();
        source.inner.dispatch(&ChangeEvent::write(&file));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        // Metadata events reach handlers without a re-read.
        fs::write(&file, "n: 3\n").unwrap();
        source
            .inner
            .dispatch(&ChangeEvent::new(&file, ChangeKind::Metadata));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_start_watching_is_idempotent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "a: 1\n").unwrap();

        let source = YamlSource::open(SearchPath::new(dir.path(), "config")).unwrap();
        source.start_watching().unwrap();
        source.start_watching().unwrap();
        assert!(source.is_watching());
    }
}
