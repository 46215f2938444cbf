//! Output helpers: writing the snapshot document to disk.

pub mod write;

pub use write::*;
