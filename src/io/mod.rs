//! Geometry export.

mod obj;

pub use obj::{write_layout_obj, write_obj};
