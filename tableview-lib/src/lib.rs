//! Table view state library
//!
//! Reconciles a static column catalog with persisted, possibly stale user
//! preferences, drives a race-safe paginated query against a remote list,
//! and tracks row selection independently of pagination. Rendering,
//! transport and storage internals are left to collaborators.

pub mod columns;
pub mod error;
pub mod model;
pub mod prefs;
pub mod query;
pub mod selection;
pub mod view;

pub use error::Error;
pub use view::ViewController;
