//! Embedding blob loading and the f32 byte codec.

use rusqlite::Connection;

use parcela_core::constants::{SEMANTIC_DIMS, STRUCTURAL_DIMS};
use parcela_core::errors::{ParcelaError, ParcelaResult, StoreError};
use parcela_core::parcel::ParcelId;

use crate::to_store_err;

/// Both embedding families of one generation, keyed by parcel id.
#[derive(Debug)]
pub struct EmbeddingBatch {
    pub semantic: Vec<(ParcelId, Vec<f32>)>,
    pub structural: Vec<(ParcelId, Vec<f32>)>,
}

/// Load every embedding pair. The schema keeps both blobs in one row, so
/// pairing is structural; an empty blob on either side still counts as
/// unpaired and fails the load.
pub fn load_embeddings(conn: &Connection) -> ParcelaResult<EmbeddingBatch> {
    let mut stmt = conn
        .prepare("SELECT parcel_id, semantic, structural FROM parcel_embeddings ORDER BY parcel_id")
        .map_err(|e| to_store_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)? as u64,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut semantic = Vec::new();
    let mut structural = Vec::new();
    for row in rows {
        let (id, semantic_blob, structural_blob) =
            row.map_err(|e| to_store_err(e.to_string()))?;
        let id = ParcelId(id);
        if semantic_blob.is_empty() != structural_blob.is_empty() {
            return Err(ParcelaError::Store(StoreError::UnpairedEmbedding(id)));
        }
        if semantic_blob.is_empty() {
            continue;
        }
        semantic.push((id, decode_f32(&semantic_blob, SEMANTIC_DIMS, id)?));
        structural.push((id, decode_f32(&structural_blob, STRUCTURAL_DIMS, id)?));
    }

    Ok(EmbeddingBatch {
        semantic,
        structural,
    })
}

/// Decode a little-endian f32 blob, validating the expected dimension.
pub fn decode_f32(bytes: &[u8], expected_dims: usize, id: ParcelId) -> ParcelaResult<Vec<f32>> {
    if bytes.len() != expected_dims * 4 {
        return Err(ParcelaError::Store(StoreError::Corrupt {
            reason: format!(
                "parcel {id}: embedding blob is {} bytes, expected {}",
                bytes.len(),
                expected_dims * 4
            ),
        }));
    }
    let mut vector = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        vector.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(vector)
}

/// Encode a vector as a little-endian f32 blob (used by snapshot seeding).
pub fn encode_f32(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_round_trips() {
        let vector = vec![0.5_f32, -1.25, 3.0];
        let bytes = encode_f32(&vector);
        assert_eq!(decode_f32(&bytes, 3, ParcelId(1)).unwrap(), vector);
    }

    #[test]
    fn wrong_dimension_is_corrupt() {
        let bytes = encode_f32(&[1.0, 2.0]);
        assert!(decode_f32(&bytes, 3, ParcelId(1)).is_err());
    }
}
