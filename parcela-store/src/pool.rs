//! Round-robin pool of read-only SQLite connections.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::Connection;

use parcela_core::errors::ParcelaResult;

use crate::to_store_err;

/// Default number of read connections per snapshot.
const DEFAULT_POOL_SIZE: usize = 4;

/// Maximum number of read connections.
const MAX_POOL_SIZE: usize = 8;

/// A pool of read-only connections to one snapshot database.
///
/// Snapshots are immutable per generation, so there is no writer and no
/// WAL coordination — every connection is equal.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open a pool of read-only connections to a snapshot file.
    pub fn open_file(path: &Path, pool_size: usize) -> ParcelaResult<Self> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| to_store_err(e.to_string()))?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Wrap a single pre-seeded connection (in-memory snapshots in tests).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            connections: vec![Mutex::new(conn)],
            next: AtomicUsize::new(0),
        }
    }

    /// Execute a closure with a connection from the pool (round-robin).
    pub fn with_conn<F, T>(&self, f: F) -> ParcelaResult<T>
    where
        F: FnOnce(&Connection) -> ParcelaResult<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|e| to_store_err(format!("pool lock poisoned: {e}")))?;
        f(&guard)
    }

    /// Number of connections in the pool.
    pub fn size(&self) -> usize {
        self.connections.len()
    }

    /// Default pool size.
    pub fn default_size() -> usize {
        DEFAULT_POOL_SIZE
    }
}
