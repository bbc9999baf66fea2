//! Namespaced, concurrent cache storage.
//!
//! ```text
//! ┌────────────────┐   ┌────────────────┐
//! │ CacheContainer │   │ CacheContainer │
//! │  ns = "config" │   │  ns = "test"   │
//! └───────┬────────┘   └───────┬────────┘
//!         │                    │
//!         ▼                    ▼
//! ┌──────────────────────────────────────────────┐
//! │ SharedTable: DashMap<(ns, key), ConfigValue> │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Keys are `(namespace, key)` pairs rather than concatenated strings, so
//! clearing one namespace can never remove another namespace's entries,
//! whatever their names look like.

mod container;
mod table;

pub use container::CacheContainer;
pub use table::{IntoQualifiedKey, Namespace, QualifiedKey, SharedTable};
