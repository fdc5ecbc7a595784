//! Test helpers shared across tour guide crates.

pub mod backend;
pub mod storage;

pub use backend::{FailingBackend, FixedBackend, RecordingBackend};
pub use storage::{DroppingStore, FailingStore};
