//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CaseSnapshotReader` - Read-only access to persisted case signals

mod case_snapshot_reader;

pub use case_snapshot_reader::{CaseSnapshotReader, SnapshotReadError};
