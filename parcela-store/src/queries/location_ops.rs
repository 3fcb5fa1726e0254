//! Location hierarchy resolution.

use rusqlite::{params, Connection, Row};

use parcela_core::errors::{ParcelaError, ParcelaResult, StoreError};
use parcela_core::parcel::{LocationId, LocationLevel, LocationNode};

use crate::to_store_err;

fn location_from_row(row: &Row<'_>) -> rusqlite::Result<(u32, String, String, Option<u32>)> {
    Ok((
        row.get::<_, i64>(0)? as u32,
        row.get(1)?,
        row.get(2)?,
        row.get::<_, Option<i64>>(3)?.map(|v| v as u32),
    ))
}

fn into_node(raw: (u32, String, String, Option<u32>)) -> ParcelaResult<LocationNode> {
    let (id, name, level, parent) = raw;
    let level = LocationLevel::parse(&level).ok_or_else(|| {
        ParcelaError::Store(StoreError::Corrupt {
            reason: format!("location {id}: unknown level {level:?}"),
        })
    })?;
    Ok(LocationNode {
        id: LocationId(id),
        name,
        level,
        parent: parent.map(LocationId),
    })
}

/// Resolve a free-form description. Exact (case-insensitive) name matches
/// win; only when there is none does prefix matching apply. Zero or many
/// results are returned as-is — the normalizer decides what to do.
pub fn resolve_location(conn: &Connection, description: &str) -> ParcelaResult<Vec<LocationNode>> {
    let needle = description.trim();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let exact = query_locations(
        conn,
        "SELECT id, name, level, parent_id FROM locations \
         WHERE lower(name) = lower(?1) ORDER BY id",
        needle,
    )?;
    if !exact.is_empty() {
        return Ok(exact);
    }

    query_locations(
        conn,
        "SELECT id, name, level, parent_id FROM locations \
         WHERE lower(name) LIKE lower(?1) || '%' ORDER BY id",
        needle,
    )
}

pub fn get_location(conn: &Connection, id: LocationId) -> ParcelaResult<Option<LocationNode>> {
    let mut stmt = conn
        .prepare("SELECT id, name, level, parent_id FROM locations WHERE id = ?1")
        .map_err(|e| to_store_err(e.to_string()))?;
    let mut rows = stmt
        .query_map(params![id.0 as i64], location_from_row)
        .map_err(|e| to_store_err(e.to_string()))?;

    match rows.next() {
        Some(row) => {
            let raw = row.map_err(|e| to_store_err(e.to_string()))?;
            Ok(Some(into_node(raw)?))
        }
        None => Ok(None),
    }
}

fn query_locations(
    conn: &Connection,
    sql: &str,
    needle: &str,
) -> ParcelaResult<Vec<LocationNode>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_store_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![needle], location_from_row)
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut nodes = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_store_err(e.to_string()))?;
        nodes.push(into_node(raw)?);
    }
    Ok(nodes)
}
