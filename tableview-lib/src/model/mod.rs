//! Column, row and cell models

mod catalog;
mod column;
mod render;
mod row;
mod value;

pub use catalog::*;
pub use column::*;
pub use render::*;
pub use row::*;
pub use value::*;
