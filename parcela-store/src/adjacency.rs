//! In-memory adjacency index built once per snapshot load.

use petgraph::graphmap::UnGraphMap;
use rusqlite::Connection;

use parcela_core::errors::{ParcelaError, ParcelaResult, StoreError};
use parcela_core::parcel::{AdjacencyEdge, ParcelId};

use crate::to_store_err;

/// Undirected parcel↔parcel border graph with shared border lengths as
/// edge weights.
pub struct AdjacencyIndex {
    graph: UnGraphMap<u64, f64>,
}

impl AdjacencyIndex {
    /// Load every adjacency edge from the snapshot. The snapshot stores
    /// each unordered pair once with `parcel_a < parcel_b`; anything else
    /// means a corrupt batch.
    pub fn load(conn: &Connection) -> ParcelaResult<Self> {
        let mut stmt = conn
            .prepare("SELECT parcel_a, parcel_b, shared_border_m FROM adjacency_edges")
            .map_err(|e| to_store_err(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)? as u64,
                    row.get::<_, i64>(1)? as u64,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(|e| to_store_err(e.to_string()))?;

        let mut graph = UnGraphMap::new();
        for row in rows {
            let (a, b, border) = row.map_err(|e| to_store_err(e.to_string()))?;
            if a >= b {
                return Err(ParcelaError::Store(StoreError::Corrupt {
                    reason: format!("adjacency edge not normalized: ({a}, {b})"),
                }));
            }
            if graph.add_edge(a, b, border).is_some() {
                return Err(ParcelaError::Store(StoreError::Corrupt {
                    reason: format!("duplicate adjacency edge: ({a}, {b})"),
                }));
            }
        }
        Ok(Self { graph })
    }

    /// Edges touching `id`, ordered by neighbor id.
    pub fn neighbors(&self, id: ParcelId) -> Vec<AdjacencyEdge> {
        if !self.graph.contains_node(id.0) {
            return Vec::new();
        }
        let mut edges: Vec<AdjacencyEdge> = self
            .graph
            .edges(id.0)
            .map(|(a, b, border)| {
                let other = if a == id.0 { b } else { a };
                AdjacencyEdge {
                    a: ParcelId(id.0.min(other)),
                    b: ParcelId(id.0.max(other)),
                    shared_border_m: *border,
                }
            })
            .collect();
        edges.sort_by_key(|edge| match edge.other(id) {
            Some(other) => other,
            None => edge.a,
        });
        edges
    }

    /// Number of edges in the index.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
