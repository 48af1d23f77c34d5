//! Paginated, race-safe querying of a remote list.

mod config;
mod controller;
mod page;
mod remote;

pub use config::*;
pub use controller::*;
pub use page::*;
pub use remote::*;
