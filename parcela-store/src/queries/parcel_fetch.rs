//! Parcel row fetch and row→entity mapping.

use rusqlite::{params, Connection, Row};

use parcela_core::errors::{ParcelaError, ParcelaResult, StoreError};
use parcela_core::parcel::{
    BuildStatus, Centroid, CompositeScores, LocationId, OwnershipType, Parcel, ParcelId,
    SizeClass, ZoningInfo,
};

use crate::to_store_err;

pub const PARCEL_COLUMNS: &str = "p.id, p.area_m2, p.lat, p.lon, p.ownership, p.build_status, \
     p.size_class, p.zoning_code, z.residential_eligible, p.district_id, \
     p.quietness, p.nature, p.accessibility";

/// Map one joined parcel row. Unknown category labels mean the snapshot
/// batch is corrupt, not that the query was bad.
pub fn parcel_from_row(row: &Row<'_>) -> rusqlite::Result<RawParcelRow> {
    Ok(RawParcelRow {
        id: row.get::<_, i64>(0)? as u64,
        area_m2: row.get(1)?,
        lat: row.get(2)?,
        lon: row.get(3)?,
        ownership: row.get(4)?,
        build_status: row.get(5)?,
        size_class: row.get(6)?,
        zoning_code: row.get(7)?,
        residential_eligible: row.get::<_, Option<i64>>(8)?.map(|v| v != 0),
        district_id: row.get::<_, i64>(9)? as u32,
        quietness: row.get(10)?,
        nature: row.get(11)?,
        accessibility: row.get(12)?,
    })
}

/// Raw column values before category validation.
pub struct RawParcelRow {
    pub id: u64,
    pub area_m2: f64,
    pub lat: f64,
    pub lon: f64,
    pub ownership: String,
    pub build_status: String,
    pub size_class: String,
    pub zoning_code: Option<String>,
    pub residential_eligible: Option<bool>,
    pub district_id: u32,
    pub quietness: f64,
    pub nature: f64,
    pub accessibility: f64,
}

impl TryFrom<RawParcelRow> for Parcel {
    type Error = ParcelaError;

    fn try_from(raw: RawParcelRow) -> ParcelaResult<Parcel> {
        let corrupt = |axis: &str, value: &str| {
            ParcelaError::Store(StoreError::Corrupt {
                reason: format!("parcel {}: unknown {axis} {value:?}", raw.id),
            })
        };
        let ownership = OwnershipType::parse(&raw.ownership)
            .ok_or_else(|| corrupt("ownership", &raw.ownership))?;
        let build_status = BuildStatus::parse(&raw.build_status)
            .ok_or_else(|| corrupt("build_status", &raw.build_status))?;
        let size_class = SizeClass::parse(&raw.size_class)
            .ok_or_else(|| corrupt("size_class", &raw.size_class))?;
        let zoning = raw.zoning_code.map(|zone_code| ZoningInfo {
            zone_code,
            residential_eligible: raw.residential_eligible.unwrap_or(false),
        });

        Ok(Parcel {
            id: ParcelId(raw.id),
            area_m2: raw.area_m2,
            centroid: Centroid {
                lat: raw.lat,
                lon: raw.lon,
            },
            ownership,
            build_status,
            size_class,
            zoning,
            district: LocationId(raw.district_id),
            scores: CompositeScores {
                quietness: raw.quietness as f32,
                nature: raw.nature as f32,
                accessibility: raw.accessibility as f32,
            },
        })
    }
}

pub fn get_parcel(conn: &Connection, id: ParcelId) -> ParcelaResult<Option<Parcel>> {
    let sql = format!(
        "SELECT {PARCEL_COLUMNS} FROM parcels p \
         LEFT JOIN zoning_zones z ON z.code = p.zoning_code \
         WHERE p.id = ?1"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_store_err(e.to_string()))?;
    let mut rows = stmt
        .query_map(params![id.0 as i64], parcel_from_row)
        .map_err(|e| to_store_err(e.to_string()))?;

    match rows.next() {
        Some(row) => {
            let raw = row.map_err(|e| to_store_err(e.to_string()))?;
            Ok(Some(raw.try_into()?))
        }
        None => Ok(None),
    }
}

/// Bulk fetch; unknown ids are skipped. Output is ordered by parcel id.
pub fn get_parcels(conn: &Connection, ids: &[ParcelId]) -> ParcelaResult<Vec<Parcel>> {
    let mut parcels = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(512) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT {PARCEL_COLUMNS} FROM parcels p \
             LEFT JOIN zoning_zones z ON z.code = p.zoning_code \
             WHERE p.id IN ({placeholders}) ORDER BY p.id"
        );
        let mut stmt = conn.prepare(&sql).map_err(|e| to_store_err(e.to_string()))?;
        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(chunk.iter().map(|id| id.0 as i64)),
                parcel_from_row,
            )
            .map_err(|e| to_store_err(e.to_string()))?;
        for row in rows {
            let raw = row.map_err(|e| to_store_err(e.to_string()))?;
            parcels.push(raw.try_into()?);
        }
    }
    parcels.sort_by_key(|parcel: &Parcel| parcel.id);
    Ok(parcels)
}

pub fn count_parcels(conn: &Connection) -> ParcelaResult<usize> {
    conn.query_row("SELECT COUNT(*) FROM parcels", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(|e| to_store_err(e.to_string()))
}
