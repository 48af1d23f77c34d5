//! Turning a catalog and preferences into render-ready columns.

mod chooser;
mod materialize;

pub use chooser::*;
pub use materialize::*;
