//! # parcela-store
//!
//! Read-only SQLite snapshot layer. One snapshot database per ETL
//! generation; [`engine::SnapshotEngine`] swaps generations atomically
//! while in-flight requests keep serving from the handle they grabbed.

pub mod adjacency;
pub mod engine;
pub mod pool;
pub mod queries;
pub mod schema;

pub use engine::{Snapshot, SnapshotEngine};

use parcela_core::errors::{ParcelaError, StoreError};

/// Map a low-level SQLite failure into the store error taxonomy.
pub(crate) fn to_store_err(message: impl Into<String>) -> ParcelaError {
    ParcelaError::Store(StoreError::Sqlite {
        message: message.into(),
    })
}
