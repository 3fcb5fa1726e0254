//! Multi-predicate parcel filtering with sibling-scope diagnostics.

use std::collections::BTreeSet;

use rusqlite::types::Value;
use rusqlite::Connection;

use parcela_core::errors::ParcelaResult;
use parcela_core::models::{CanonicalFilters, GraphMatch};
use parcela_core::parcel::ParcelId;

use crate::to_store_err;

/// Apply the canonical filters and return the matching ids plus the
/// per-district diagnostic counts across the parent city.
pub fn filter_parcels(
    conn: &Connection,
    filters: &CanonicalFilters,
) -> ParcelaResult<GraphMatch> {
    let (predicates, params) = build_predicates(filters, true);
    let sql = format!(
        "SELECT p.id FROM parcels p \
         LEFT JOIN zoning_zones z ON z.code = p.zoning_code \
         WHERE {predicates}"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_store_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), |row| {
            Ok(ParcelId(row.get::<_, i64>(0)? as u64))
        })
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut ids = BTreeSet::new();
    for row in rows {
        ids.insert(row.map_err(|e| to_store_err(e.to_string()))?);
    }

    let by_sibling_scope = sibling_scope_counts(conn, filters)?;
    Ok(GraphMatch {
        ids,
        by_sibling_scope,
    })
}

/// Count-only mode: same predicates, no row materialization.
pub fn count_matching(conn: &Connection, filters: &CanonicalFilters) -> ParcelaResult<usize> {
    let (predicates, params) = build_predicates(filters, true);
    let sql = format!(
        "SELECT COUNT(*) FROM parcels p \
         LEFT JOIN zoning_zones z ON z.code = p.zoning_code \
         WHERE {predicates}"
    );
    conn.query_row(&sql, rusqlite::params_from_iter(params), |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(|e| to_store_err(e.to_string()))
}

/// Diagnostic counts at the next-coarser location level: for every
/// district of the scope's parent city, how many parcels match the
/// non-location predicates. Drives "too narrow / too broad" feedback.
fn sibling_scope_counts(
    conn: &Connection,
    filters: &CanonicalFilters,
) -> ParcelaResult<Vec<(String, usize)>> {
    // A district's parent is its city; a city is its own parent scope.
    let city_id: i64 = conn
        .query_row(
            "SELECT COALESCE(parent_id, id) FROM locations WHERE id = ?1",
            [filters.scope.0 as i64],
            |row| row.get(0),
        )
        .map_err(|e| to_store_err(e.to_string()))?;

    let (predicates, mut params) = build_predicates(filters, false);
    let sql = format!(
        "SELECT l.name, \
                (SELECT COUNT(*) FROM parcels p \
                  LEFT JOIN zoning_zones z ON z.code = p.zoning_code \
                  WHERE p.district_id = l.id AND {predicates}) AS matching \
         FROM locations l WHERE l.parent_id = ? ORDER BY l.name"
    );
    params.push(Value::Integer(city_id));

    let mut stmt = conn.prepare(&sql).map_err(|e| to_store_err(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row.map_err(|e| to_store_err(e.to_string()))?);
    }
    Ok(counts)
}

/// Build the WHERE clause for the canonical filters. With
/// `include_location` the scope clause accepts a city id (all its
/// districts) or a single district id.
fn build_predicates(
    filters: &CanonicalFilters,
    include_location: bool,
) -> (String, Vec<Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if include_location {
        clauses.push(
            "p.district_id IN (SELECT id FROM locations WHERE id = ? OR parent_id = ?)"
                .to_string(),
        );
        params.push(Value::Integer(filters.scope.0 as i64));
        params.push(Value::Integer(filters.scope.0 as i64));
    }

    clauses.push("p.area_m2 >= ? AND p.area_m2 <= ?".to_string());
    params.push(Value::Real(filters.area_m2.0));
    params.push(Value::Real(filters.area_m2.1));

    if let Some(ownership) = filters.ownership {
        clauses.push("p.ownership = ?".to_string());
        params.push(Value::Text(ownership.label().to_string()));
    }
    if let Some(build_status) = filters.build_status {
        clauses.push("p.build_status = ?".to_string());
        params.push(Value::Text(build_status.label().to_string()));
    }
    if let Some(size_class) = filters.size_class {
        clauses.push("p.size_class = ?".to_string());
        params.push(Value::Text(size_class.label().to_string()));
    }
    if filters.require_residential {
        clauses.push("z.residential_eligible = 1".to_string());
    }

    (clauses.join(" AND "), params)
}
