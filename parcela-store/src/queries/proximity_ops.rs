//! Proximity edge lookup and fuzzy named-POI search.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use rusqlite::types::Value;
use rusqlite::Connection;

use parcela_core::errors::{ParcelaError, ParcelaResult, StoreError};
use parcela_core::parcel::{ParcelId, Poi, PoiType, ProximityEdge};

use crate::to_store_err;

/// In-threshold edges of one POI type for the given parcels. Parcels
/// without an edge of that type simply do not appear in the output.
pub fn edges_within_threshold(
    conn: &Connection,
    ids: &BTreeSet<ParcelId>,
    poi_type: PoiType,
) -> ParcelaResult<Vec<ProximityEdge>> {
    let id_list: Vec<ParcelId> = ids.iter().copied().collect();
    let mut edges = Vec::new();

    for chunk in id_list.chunks(512) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT parcel_id, poi_id, distance_m FROM proximity_edges \
             WHERE poi_type = ? AND parcel_id IN ({placeholders})"
        );
        let mut params: Vec<Value> = Vec::with_capacity(chunk.len() + 1);
        params.push(Value::Text(poi_type.label().to_string()));
        params.extend(chunk.iter().map(|id| Value::Integer(id.0 as i64)));

        let mut stmt = conn.prepare(&sql).map_err(|e| to_store_err(e.to_string()))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), |row| {
                Ok(ProximityEdge {
                    parcel: ParcelId(row.get::<_, i64>(0)? as u64),
                    poi: row.get::<_, i64>(1)? as u64,
                    poi_type,
                    distance_m: row.get(2)?,
                })
            })
            .map_err(|e| to_store_err(e.to_string()))?;
        for row in rows {
            edges.push(row.map_err(|e| to_store_err(e.to_string()))?);
        }
    }

    Ok(edges)
}

/// Fuzzy named-POI lookup: case- and diacritic-insensitive substring
/// match, ranked by how close the name length is to the query, then by
/// name for determinism.
pub fn find_poi(conn: &Connection, name: &str) -> ParcelaResult<Vec<Poi>> {
    let needle = normalize_name(name);
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare("SELECT id, name, poi_type FROM pois")
        .map_err(|e| to_store_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)? as u64,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut matches: Vec<Poi> = Vec::new();
    for row in rows {
        let (id, poi_name, type_label) = row.map_err(|e| to_store_err(e.to_string()))?;
        if !normalize_name(&poi_name).contains(&needle) {
            continue;
        }
        let poi_type = PoiType::parse(&type_label).ok_or_else(|| {
            ParcelaError::Store(StoreError::Corrupt {
                reason: format!("poi {id}: unknown type {type_label:?}"),
            })
        })?;
        matches.push(Poi {
            id,
            name: poi_name,
            poi_type,
        });
    }

    matches.sort_by(|a, b| {
        let closeness_a = a.name.len().abs_diff(name.len());
        let closeness_b = b.name.len().abs_diff(name.len());
        closeness_a
            .cmp(&closeness_b)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(matches)
}

/// Lowercase, fold Polish diacritics, strip punctuation, collapse
/// whitespace.
fn normalize_name(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            _ => c,
        })
        .collect();
    static STRIP: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| Regex::new(r"[^a-z0-9 ]").expect("static pattern"));
    let stripped = strip.replace_all(&folded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
