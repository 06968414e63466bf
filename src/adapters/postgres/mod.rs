//! PostgreSQL adapters - Database implementations for reader ports.
//!
//! - `PostgresCaseSnapshotReader` - Assembles case snapshots from request,
//!   audit, opinion, clarification and review tables

mod case_snapshot_reader;

pub use case_snapshot_reader::PostgresCaseSnapshotReader;
