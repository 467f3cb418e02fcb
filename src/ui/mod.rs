//! Presentation helpers: banner rendering and interactive selection.

pub mod banner;
pub mod select;
