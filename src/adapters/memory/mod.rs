//! In-memory adapters for development and tests.

mod in_memory_snapshot_reader;

pub use in_memory_snapshot_reader::InMemoryCaseSnapshotReader;
