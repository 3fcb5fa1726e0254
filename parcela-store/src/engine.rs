//! Snapshot and generation handling.
//!
//! A [`Snapshot`] is one generation's read-only database plus the
//! in-memory adjacency index. [`SnapshotEngine`] owns the current
//! generation behind `RwLock<Arc<_>>`: `reload` builds the next handle
//! completely, then swaps the Arc, so requests holding the prior handle
//! keep serving from it until they drop it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use parcela_core::config::VectorConfig;
use parcela_core::errors::{ParcelaError, ParcelaResult, StoreError};
use parcela_core::models::{
    CanonicalFilters, GenerationId, GraphMatch, SnapshotInfo,
};
use parcela_core::parcel::{
    AdjacencyEdge, LocationId, LocationNode, Parcel, ParcelId, Poi, PoiType, ProximityEdge,
};
use parcela_core::traits::{
    GraphStore, ProximityStore, SnapshotHandle, SnapshotProvider, VectorIndexFactory,
};

use crate::adjacency::AdjacencyIndex;
use crate::pool::ReadPool;
use crate::queries;

/// One loaded generation.
pub struct Snapshot {
    info: SnapshotInfo,
    pool: ReadPool,
    adjacency: AdjacencyIndex,
}

impl Snapshot {
    /// Open a snapshot file read-only.
    pub fn open_file(path: &Path, generation: GenerationId) -> ParcelaResult<Self> {
        let pool = ReadPool::open_file(path, ReadPool::default_size())?;
        Self::finish_load(pool, generation)
    }

    /// Wrap an already-seeded connection (in-memory snapshots in tests).
    pub fn from_seeded(conn: Connection, generation: GenerationId) -> ParcelaResult<Self> {
        Self::finish_load(ReadPool::from_connection(conn), generation)
    }

    fn finish_load(pool: ReadPool, generation: GenerationId) -> ParcelaResult<Self> {
        let (adjacency, parcel_count) = pool.with_conn(|conn| {
            let adjacency = AdjacencyIndex::load(conn)?;
            let parcel_count = queries::parcel_fetch::count_parcels(conn)?;
            Ok((adjacency, parcel_count))
        })?;
        info!(
            generation = %generation,
            parcels = parcel_count,
            adjacency_edges = adjacency.edge_count(),
            "snapshot loaded"
        );
        Ok(Self {
            info: SnapshotInfo {
                generation,
                loaded_at: Utc::now(),
                parcel_count,
            },
            pool,
            adjacency,
        })
    }

    pub fn info(&self) -> &SnapshotInfo {
        &self.info
    }

    /// Load every embedding pair of this generation.
    pub fn load_embeddings(&self) -> ParcelaResult<queries::embedding_ops::EmbeddingBatch> {
        self.pool
            .with_conn(queries::embedding_ops::load_embeddings)
    }
}

#[async_trait]
impl GraphStore for Snapshot {
    async fn filter_parcels(&self, filters: &CanonicalFilters) -> ParcelaResult<GraphMatch> {
        self.pool
            .with_conn(|conn| queries::parcel_filter::filter_parcels(conn, filters))
    }

    async fn count_matching(&self, filters: &CanonicalFilters) -> ParcelaResult<usize> {
        self.pool
            .with_conn(|conn| queries::parcel_filter::count_matching(conn, filters))
    }

    async fn resolve_location(&self, description: &str) -> ParcelaResult<Vec<LocationNode>> {
        self.pool
            .with_conn(|conn| queries::location_ops::resolve_location(conn, description))
    }

    async fn get_location(&self, id: LocationId) -> ParcelaResult<Option<LocationNode>> {
        self.pool
            .with_conn(|conn| queries::location_ops::get_location(conn, id))
    }

    async fn get_parcel(&self, id: ParcelId) -> ParcelaResult<Option<Parcel>> {
        self.pool
            .with_conn(|conn| queries::parcel_fetch::get_parcel(conn, id))
    }

    async fn get_parcels(&self, ids: &[ParcelId]) -> ParcelaResult<Vec<Parcel>> {
        self.pool
            .with_conn(|conn| queries::parcel_fetch::get_parcels(conn, ids))
    }
}

impl ProximityStore for Snapshot {
    fn edges_within_threshold(
        &self,
        ids: &BTreeSet<ParcelId>,
        poi_type: PoiType,
    ) -> ParcelaResult<Vec<ProximityEdge>> {
        self.pool
            .with_conn(|conn| queries::proximity_ops::edges_within_threshold(conn, ids, poi_type))
    }

    fn find_poi(&self, name: &str) -> ParcelaResult<Vec<Poi>> {
        self.pool
            .with_conn(|conn| queries::proximity_ops::find_poi(conn, name))
    }

    fn adjacent_to(&self, id: ParcelId) -> ParcelaResult<Vec<AdjacencyEdge>> {
        Ok(self.adjacency.neighbors(id))
    }
}

/// Owns the current generation and the atomic swap.
pub struct SnapshotEngine {
    /// Directory of snapshot files, `<generation>.db` each. Absent for
    /// engines wrapping a seeded in-memory snapshot.
    base_dir: Option<PathBuf>,
    factory: Arc<dyn VectorIndexFactory>,
    vector_config: VectorConfig,
    current: RwLock<Arc<SnapshotHandle>>,
}

impl SnapshotEngine {
    /// Open the engine on a snapshot directory, loading `generation`.
    pub fn open(
        base_dir: impl Into<PathBuf>,
        generation: GenerationId,
        factory: Arc<dyn VectorIndexFactory>,
        vector_config: VectorConfig,
    ) -> ParcelaResult<Self> {
        let base_dir = base_dir.into();
        let snapshot = open_generation(&base_dir, &generation)?;
        let handle = build_handle(snapshot, factory.as_ref(), &vector_config)?;
        Ok(Self {
            base_dir: Some(base_dir),
            factory,
            vector_config,
            current: RwLock::new(handle),
        })
    }

    /// Wrap a pre-seeded snapshot (tests, embedded fixtures). `reload`
    /// is unavailable without a base directory.
    pub fn from_snapshot(
        snapshot: Snapshot,
        factory: Arc<dyn VectorIndexFactory>,
        vector_config: VectorConfig,
    ) -> ParcelaResult<Self> {
        let handle = build_handle(snapshot, factory.as_ref(), &vector_config)?;
        Ok(Self {
            base_dir: None,
            factory,
            vector_config,
            current: RwLock::new(handle),
        })
    }

    /// Atomically switch to a new generation. The next `current()` call
    /// sees the new handle; requests holding the prior Arc drain on it.
    pub fn reload(&self, generation: GenerationId) -> ParcelaResult<()> {
        let base_dir = self
            .base_dir
            .as_ref()
            .ok_or_else(|| ParcelaError::Store(StoreError::UnknownGeneration(generation.clone())))?;
        let snapshot = open_generation(base_dir, &generation)?;
        let handle = build_handle(snapshot, self.factory.as_ref(), &self.vector_config)?;

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let prior = current.generation.clone();
        *current = handle;
        info!(from = %prior, to = %generation, "generation swapped");
        Ok(())
    }

    pub fn current_generation(&self) -> GenerationId {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .generation
            .clone()
    }
}

impl SnapshotProvider for SnapshotEngine {
    fn current(&self) -> Arc<SnapshotHandle> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

fn open_generation(base_dir: &Path, generation: &GenerationId) -> ParcelaResult<Snapshot> {
    let path = base_dir.join(format!("{generation}.db"));
    if !path.exists() {
        return Err(ParcelaError::Store(StoreError::UnknownGeneration(
            generation.clone(),
        )));
    }
    Snapshot::open_file(&path, generation.clone())
}

fn build_handle(
    snapshot: Snapshot,
    factory: &dyn VectorIndexFactory,
    vector_config: &VectorConfig,
) -> ParcelaResult<Arc<SnapshotHandle>> {
    let generation = snapshot.info().generation.clone();
    let embeddings = snapshot.load_embeddings()?;
    let semantic = factory.build(vector_config.semantic_dims, embeddings.semantic)?;
    let structural = factory.build(vector_config.structural_dims, embeddings.structural)?;

    let snapshot = Arc::new(snapshot);
    Ok(Arc::new(SnapshotHandle {
        generation,
        graph: snapshot.clone(),
        proximity: snapshot,
        semantic,
        structural,
    }))
}
