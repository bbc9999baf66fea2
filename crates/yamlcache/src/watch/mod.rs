//! Change notifications for configuration files.
//!
//! A [`YamlSource`](crate::YamlSource) starts a background watcher on the
//! directory holding its file. Every change that touches the file becomes a
//! [`ChangeEvent`] and is passed to the handlers registered with
//! [`RawSource::on_change`](crate::RawSource::on_change).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌───────────────┐
//! │   notify    │────▶│ FileWatcher │────▶│  YamlSource   │
//! │  (events)   │     │  (thread)   │     │ (re-read doc) │
//! └─────────────┘     └─────────────┘     └───────┬───────┘
//!                                                 │
//!                                                 ▼
//!                                         ┌───────────────┐
//!                                         │ ChangeHandler │
//!                                         │ (YamlConfig)  │
//!                                         └───────────────┘
//! ```
//!
//! No debouncing happens here; duplicates are filtered by the receiving
//! [`Debouncer`](crate::Debouncer).

mod types;
mod watcher;

pub use types::{ChangeEvent, ChangeKind, WatchError};

pub(crate) use watcher::FileWatcher;
