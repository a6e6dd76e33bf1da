//! Graph Explorer Library
//!
//! Loads object graphs from JSON documents and drives the explorer engine
//! from the command line.

pub mod headless;
pub mod loader;

// Re-export main entry points
pub use headless::runner::{run_dump, run_find, DumpRequest, FindRequest};
pub use loader::{load_path, LoadedRoot};
