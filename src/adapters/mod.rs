//! Adapters - Implementations of port interfaces.
//!
//! - `http` - REST endpoints (axum)
//! - `memory` - In-memory snapshot store for development and tests
//! - `postgres` - Snapshot reader over the marketplace database

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::InMemoryCaseSnapshotReader;
pub use postgres::PostgresCaseSnapshotReader;
