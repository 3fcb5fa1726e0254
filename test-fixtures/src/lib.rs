//! Fixture loader and snapshot seeding for golden datasets.
//!
//! Provides typed deserialization of the fixture JSON files and a helper
//! that seeds an SQLite snapshot from one, shared by tests across crates.

use std::path::PathBuf;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use parcela_core::errors::ParcelaResult;
use parcela_store::queries::embedding_ops::encode_f32;
use parcela_store::schema;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

// ---------------------------------------------------------------------------
// Snapshot fixture shape
// ---------------------------------------------------------------------------

/// One complete snapshot generation in JSON form.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotFixture {
    pub generation: String,
    pub locations: Vec<LocationRow>,
    #[serde(default)]
    pub zoning_zones: Vec<ZoningRow>,
    pub parcels: Vec<ParcelRow>,
    #[serde(default)]
    pub pois: Vec<PoiRow>,
    #[serde(default)]
    pub proximity_edges: Vec<ProximityRow>,
    #[serde(default)]
    pub adjacency_edges: Vec<AdjacencyRow>,
    #[serde(default)]
    pub embeddings: Vec<EmbeddingRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationRow {
    pub id: u32,
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub parent_id: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoningRow {
    pub code: String,
    pub residential_eligible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParcelRow {
    pub id: u64,
    pub area_m2: f64,
    pub lat: f64,
    pub lon: f64,
    pub ownership: String,
    pub build_status: String,
    pub size_class: String,
    #[serde(default)]
    pub zoning_code: Option<String>,
    pub district_id: u32,
    #[serde(default)]
    pub quietness: f64,
    #[serde(default)]
    pub nature: f64,
    #[serde(default)]
    pub accessibility: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoiRow {
    pub id: u64,
    pub name: String,
    pub poi_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProximityRow {
    pub parcel_id: u64,
    pub poi_id: u64,
    pub poi_type: String,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjacencyRow {
    pub parcel_a: u64,
    pub parcel_b: u64,
    pub shared_border_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingRow {
    pub parcel_id: u64,
    pub semantic: Vec<f32>,
    pub structural: Vec<f32>,
}

/// Seed a connection with the fixture's snapshot data.
pub fn seed_snapshot(conn: &Connection, fixture: &SnapshotFixture) -> ParcelaResult<()> {
    schema::create_schema(conn)?;
    let err = |e: rusqlite::Error| parcela_core::errors::ParcelaError::Store(
        parcela_core::errors::StoreError::Sqlite {
            message: e.to_string(),
        },
    );

    for row in &fixture.locations {
        conn.execute(
            "INSERT INTO locations (id, name, level, parent_id) VALUES (?1, ?2, ?3, ?4)",
            params![row.id, row.name, row.level, row.parent_id],
        )
        .map_err(err)?;
    }
    for row in &fixture.zoning_zones {
        conn.execute(
            "INSERT INTO zoning_zones (code, residential_eligible) VALUES (?1, ?2)",
            params![row.code, row.residential_eligible as i64],
        )
        .map_err(err)?;
    }
    for row in &fixture.parcels {
        conn.execute(
            "INSERT INTO parcels (id, area_m2, lat, lon, ownership, build_status, size_class, \
             zoning_code, district_id, quietness, nature, accessibility) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                row.id as i64,
                row.area_m2,
                row.lat,
                row.lon,
                row.ownership,
                row.build_status,
                row.size_class,
                row.zoning_code,
                row.district_id,
                row.quietness,
                row.nature,
                row.accessibility
            ],
        )
        .map_err(err)?;
    }
    for row in &fixture.pois {
        conn.execute(
            "INSERT INTO pois (id, name, poi_type) VALUES (?1, ?2, ?3)",
            params![row.id as i64, row.name, row.poi_type],
        )
        .map_err(err)?;
    }
    for row in &fixture.proximity_edges {
        conn.execute(
            "INSERT INTO proximity_edges (parcel_id, poi_id, poi_type, distance_m) \
             VALUES (?1, ?2, ?3, ?4)",
            params![row.parcel_id as i64, row.poi_id as i64, row.poi_type, row.distance_m],
        )
        .map_err(err)?;
    }
    for row in &fixture.adjacency_edges {
        conn.execute(
            "INSERT INTO adjacency_edges (parcel_a, parcel_b, shared_border_m) \
             VALUES (?1, ?2, ?3)",
            params![row.parcel_a as i64, row.parcel_b as i64, row.shared_border_m],
        )
        .map_err(err)?;
    }
    for row in &fixture.embeddings {
        conn.execute(
            "INSERT INTO parcel_embeddings (parcel_id, semantic, structural) VALUES (?1, ?2, ?3)",
            params![
                row.parcel_id as i64,
                encode_f32(&row.semantic),
                encode_f32(&row.structural)
            ],
        )
        .map_err(err)?;
    }
    Ok(())
}
