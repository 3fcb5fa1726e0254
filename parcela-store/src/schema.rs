//! Snapshot database layout.
//!
//! The schema mirrors what the ETL collaborator emits per generation.
//! Production snapshots arrive pre-built and are opened read-only; this
//! DDL exists so tests and tooling can seed snapshot files.

use rusqlite::Connection;

use parcela_core::errors::ParcelaResult;

use crate::to_store_err;

pub const SNAPSHOT_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS locations (
    id        INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    level     TEXT NOT NULL CHECK (level IN ('city', 'district')),
    parent_id INTEGER REFERENCES locations(id)
);

CREATE TABLE IF NOT EXISTS zoning_zones (
    code                 TEXT PRIMARY KEY,
    residential_eligible INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS parcels (
    id            INTEGER PRIMARY KEY,
    area_m2       REAL NOT NULL,
    lat           REAL NOT NULL,
    lon           REAL NOT NULL,
    ownership     TEXT NOT NULL,
    build_status  TEXT NOT NULL,
    size_class    TEXT NOT NULL,
    zoning_code   TEXT REFERENCES zoning_zones(code),
    district_id   INTEGER NOT NULL REFERENCES locations(id),
    quietness     REAL NOT NULL DEFAULT 0,
    nature        REAL NOT NULL DEFAULT 0,
    accessibility REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_parcels_district ON parcels(district_id);

CREATE TABLE IF NOT EXISTS pois (
    id       INTEGER PRIMARY KEY,
    name     TEXT NOT NULL,
    poi_type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS proximity_edges (
    parcel_id  INTEGER NOT NULL REFERENCES parcels(id),
    poi_id     INTEGER NOT NULL REFERENCES pois(id),
    poi_type   TEXT NOT NULL,
    distance_m REAL NOT NULL,
    PRIMARY KEY (parcel_id, poi_id)
);

CREATE INDEX IF NOT EXISTS idx_proximity_type ON proximity_edges(poi_type, parcel_id);

CREATE TABLE IF NOT EXISTS adjacency_edges (
    parcel_a        INTEGER NOT NULL REFERENCES parcels(id),
    parcel_b        INTEGER NOT NULL REFERENCES parcels(id),
    shared_border_m REAL NOT NULL,
    PRIMARY KEY (parcel_a, parcel_b),
    CHECK (parcel_a < parcel_b)
);

CREATE TABLE IF NOT EXISTS parcel_embeddings (
    parcel_id  INTEGER PRIMARY KEY REFERENCES parcels(id),
    semantic   BLOB NOT NULL,
    structural BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS snapshot_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// Create the snapshot tables on a fresh connection.
pub fn create_schema(conn: &Connection) -> ParcelaResult<()> {
    conn.execute_batch(SNAPSHOT_SCHEMA)
        .map_err(|e| to_store_err(format!("create schema: {e}")))
}
