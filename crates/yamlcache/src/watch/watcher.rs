//! Internal file watcher implementation.
//!
//! This module contains the [`FileWatcher`] which receives file system
//! events from the `notify` crate on a dedicated thread and forwards the
//! ones that concern a single configuration file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, select};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::types::{ChangeEvent, ChangeKind, WatchError};

/// Commands sent to the watcher thread.
#[derive(Debug, Clone, Copy)]
enum WatchCommand {
    Stop,
}

/// How long the loop waits before re-checking its channels.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Name given to the background thread.
const THREAD_NAME: &str = "yamlcache-watcher";

/// Watches one file and hands every relevant change to a callback.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by writing a temporary file and renaming it over the original
/// are still observed. The callback runs on the watcher thread.
pub(crate) struct FileWatcher {
    path: PathBuf,
    command_tx: Sender<WatchCommand>,
    thread_handle: Option<JoinHandle<()>>,
}

impl FileWatcher {
    /// Start watching `path`.
    pub fn start<F>(path: &Path, on_event: F) -> Result<Self, WatchError>
    where
        F: Fn(ChangeEvent) + Send + 'static,
    {
        let (command_tx, command_rx) = bounded::<WatchCommand>(4);
        let (notify_tx, notify_rx) = bounded::<notify::Result<Event>>(100);

        let mut watcher = create_notify_watcher(notify_tx)?;
        watch_parent(&mut watcher, path)?;

        let watched_paths = watched_set(path);

        let thread_handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                watcher_loop(&command_rx, &notify_rx, &watched_paths, &on_event, watcher);
            })
            .map_err(|e| {
                WatchError::init_failed(format!("failed to spawn watcher thread: {e}"), None)
            })?;

        tracing::debug!(path = %path.display(), "started watching configuration file");

        Ok(Self {
            path: path.to_path_buf(),
            command_tx,
            thread_handle: Some(thread_handle),
        })
    }

    /// The file being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        let _ = self.command_tx.try_send(WatchCommand::Stop);

        if let Some(handle) = self.thread_handle.take() {
            // Dropped from inside a callback; the loop exits on its own.
            if handle.thread().id() == thread::current().id() {
                return;
            }
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

/// Create a notify watcher with the given event sender.
fn create_notify_watcher(
    tx: Sender<notify::Result<Event>>,
) -> Result<RecommendedWatcher, WatchError> {
    notify::recommended_watcher(move |res| {
        if tx.try_send(res).is_err() {
            tracing::debug!("file event dropped, watcher queue full or closed");
        }
    })
    .map_err(|e| WatchError::init_failed(format!("failed to create file watcher: {e}"), Some(e)))
}

/// Watch the directory containing `path`.
fn watch_parent(watcher: &mut RecommendedWatcher, path: &Path) -> Result<(), WatchError> {
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return Err(WatchError::path_error(path, "invalid path")),
    };

    if !parent.is_dir() {
        return Err(WatchError::path_error(path, "parent directory does not exist"));
    }

    watcher
        .watch(parent, RecursiveMode::NonRecursive)
        .map_err(|e| WatchError::path_error(path, format!("failed to watch: {e}")))
}

/// The path as given plus its canonical form, when that differs.
fn watched_set(path: &Path) -> HashSet<PathBuf> {
    let mut paths = HashSet::from([path.to_path_buf()]);
    if let Ok(canonical) = path.canonicalize() {
        paths.insert(canonical);
    }
    paths
}

/// Main watcher loop running in a separate thread.
fn watcher_loop<F>(
    command_rx: &Receiver<WatchCommand>,
    notify_rx: &Receiver<notify::Result<Event>>,
    watched_paths: &HashSet<PathBuf>,
    on_event: &F,
    _watcher: RecommendedWatcher, // Keep watcher alive
) where
    F: Fn(ChangeEvent),
{
    loop {
        select! {
            recv(command_rx) -> cmd => {
                match cmd {
                    Ok(WatchCommand::Stop) | Err(_) => break,
                }
            }

            recv(notify_rx) -> event_result => {
                match event_result {
                    Ok(Ok(event)) => {
                        if let Some(change) = process_notify_event(&event, watched_paths) {
                            on_event(change);
                        }
                    }
                    Ok(Err(e)) => tracing::warn!(error = %e, "file watcher reported an error"),
                    Err(_) => break,
                }
            }

            default(POLL_INTERVAL) => {}
        }
    }

    tracing::debug!("watcher thread stopped");
}

/// Turn a notify event into a [`ChangeEvent`] if it touches the watched file.
///
/// A two-path rename reports `[from, to]`; when the watched file is the
/// destination it has been replaced, which counts as a create.
fn process_notify_event(event: &Event, watched_paths: &HashSet<PathBuf>) -> Option<ChangeEvent> {
    let kind = ChangeKind::from_notify(&event.kind)?;

    let (index, path) = event.paths.iter().enumerate().find(|(_, path)| {
        watched_paths.contains(*path)
            || path.canonicalize().is_ok_and(|c| watched_paths.contains(&c))
    })?;

    let kind = match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if index == 1 => ChangeKind::Create,
        _ => kind,
    };

    Some(ChangeEvent::new(path.clone(), kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, DataChange};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_watched_set_includes_canonical() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "a: 1").unwrap();

        let set = watched_set(&file);
        assert!(set.contains(&file));
        assert!(set.contains(&file.canonicalize().unwrap()));
    }

    #[test]
    fn test_process_event_filters_other_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        let other = dir.path().join("other.yaml");
        let set = watched_set(&file);

        let event = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(other);
        assert!(process_notify_event(&event, &set).is_none());

        let event = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(file.clone());
        let change = process_notify_event(&event, &set).unwrap();
        assert_eq!(change.kind, ChangeKind::Write);
        assert_eq!(change.path, file);
    }

    #[test]
    fn test_rename_onto_watched_file_is_create() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        let temp = dir.path().join(".config.yaml.tmp");
        let set = watched_set(&file);

        let replaced = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(temp.clone())
            .add_path(file.clone());
        assert_eq!(process_notify_event(&replaced, &set).unwrap().kind, ChangeKind::Create);

        let moved_away = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(file.clone())
            .add_path(temp);
        assert_eq!(process_notify_event(&moved_away, &set).unwrap().kind, ChangeKind::Rename);

        let arrived = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To))).add_path(file);
        assert_eq!(process_notify_event(&arrived, &set).unwrap().kind, ChangeKind::Create);
    }

    #[test]
    fn test_process_event_skips_access() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        let set = watched_set(&file);

        let event = Event::new(EventKind::Access(AccessKind::Any)).add_path(file);
        assert!(process_notify_event(&event, &set).is_none());
    }

    #[test]
    fn test_missing_parent_is_rejected() {
        let result = FileWatcher::start(Path::new("/definitely/not/here/config.yaml"), |_| {});
        assert!(matches!(result, Err(WatchError::PathError { .. })));
    }

    #[test]
    fn test_start_and_drop() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "a: 1").unwrap();

        let watcher = FileWatcher::start(&file, |_| {}).unwrap();
        assert_eq!(watcher.path(), file);
        drop(watcher);
    }
}
