// src/archive/mod.rs

//! Input and output archive formats
//!
//! - `.BillfishPack`: zip, read by [`extract_pack`]
//! - `.lqpack`: gzip-compressed tar, written by [`package_tree`]

mod extract;
mod package;

pub use extract::{ExtractionSummary, extract_pack};
pub use package::package_tree;
