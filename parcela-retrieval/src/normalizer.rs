//! Preference validation and canonicalization.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use parcela_core::config::ParcelaConfig;
use parcela_core::errors::{ParcelaResult, PreferenceError};
use parcela_core::models::{
    CallerId, CanonicalFilters, PreferenceQuery, ProximityWeights, RawPreference,
};
use parcela_core::parcel::{BuildStatus, OwnershipType, ParcelId, PoiType, SizeClass};
use parcela_core::traits::{EmbeddingProvider, GraphStore};

/// Validates a loose preference into a canonical query. No persistent
/// side effects; disambiguation is surfaced as an error, never guessed.
pub struct PreferenceNormalizer<'a> {
    graph: Arc<dyn GraphStore>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    config: &'a ParcelaConfig,
}

impl<'a> PreferenceNormalizer<'a> {
    pub fn new(
        graph: Arc<dyn GraphStore>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        config: &'a ParcelaConfig,
    ) -> Self {
        Self {
            graph,
            embedder,
            config,
        }
    }

    pub async fn normalize(&self, raw: &RawPreference) -> ParcelaResult<PreferenceQuery> {
        let [min, max] = raw.area_m2;
        // `!(min <= max)` also rejects NaN bounds.
        if !(min <= max) {
            return Err(PreferenceError::InvertedRange { min, max }.into());
        }

        let ownership = parse_axis(raw.ownership_type.as_deref(), "ownership", OwnershipType::parse)?;
        let build_status =
            parse_axis(raw.build_status.as_deref(), "build_status", BuildStatus::parse)?;
        let size_class =
            parse_axis(raw.size_category.as_deref(), "size_category", SizeClass::parse)?;

        let weights = self.normalize_weights(&raw.proximity_weights)?;
        let scope = self.resolve_scope(&raw.location).await?;
        let seed_parcel = self.validate_seed(raw.similar_to_parcel_id).await?;
        let text_vector = self.embed_free_text(raw.free_text.as_deref()).await;

        Ok(PreferenceQuery {
            request_id: Uuid::new_v4(),
            caller: CallerId(raw.caller_id.clone()),
            filters: CanonicalFilters {
                scope,
                area_m2: (min, max),
                ownership,
                build_status,
                size_class,
                require_residential: raw.pog_residential.unwrap_or(false),
            },
            weights,
            text_vector,
            seed_parcel,
        })
    }

    fn normalize_weights(
        &self,
        raw: &BTreeMap<String, f32>,
    ) -> ParcelaResult<ProximityWeights> {
        if raw.is_empty() {
            return Ok(ProximityWeights::default_table());
        }
        let mut explicit = BTreeMap::new();
        for (name, weight) in raw {
            let poi = PoiType::parse(name).ok_or_else(|| PreferenceError::UnknownPoiType {
                poi: name.clone(),
            })?;
            if !(0.0..=1.0).contains(weight) {
                return Err(PreferenceError::WeightOutOfRange {
                    poi: name.clone(),
                    value: *weight,
                }
                .into());
            }
            explicit.insert(poi, *weight);
        }
        Ok(ProximityWeights::from_explicit(explicit))
    }

    async fn resolve_scope(
        &self,
        description: &str,
    ) -> ParcelaResult<parcela_core::parcel::LocationId> {
        let matches = self.graph.resolve_location(description).await?;
        match matches.len() {
            0 => Err(PreferenceError::LocationNotFound {
                query: description.to_string(),
            }
            .into()),
            1 => Ok(matches[0].id),
            _ => Err(PreferenceError::AmbiguousLocation {
                query: description.to_string(),
                candidates: matches.into_iter().map(|node| node.name).collect(),
            }
            .into()),
        }
    }

    async fn validate_seed(&self, seed: Option<u64>) -> ParcelaResult<Option<ParcelId>> {
        let Some(raw_id) = seed else {
            return Ok(None);
        };
        let id = ParcelId(raw_id);
        match self.graph.get_parcel(id).await? {
            Some(_) => Ok(Some(id)),
            None => Err(PreferenceError::UnknownSeedParcel(id).into()),
        }
    }

    /// Embed the free text when a provider is available. Failure here
    /// degrades to "no text vector"; it never fails normalization.
    async fn embed_free_text(&self, free_text: Option<&str>) -> Option<Vec<f32>> {
        let text = free_text?.trim();
        if text.is_empty() {
            return None;
        }
        let Some(embedder) = &self.embedder else {
            debug!("free text supplied but no embedding provider configured");
            return None;
        };

        let timeout = Duration::from_millis(self.config.retrieval.branch_timeout_ms);
        match tokio::time::timeout(timeout, embedder.embed(text)).await {
            Ok(Ok(vector)) if vector.len() == self.config.vector.semantic_dims => Some(vector),
            Ok(Ok(vector)) => {
                warn!(
                    got = vector.len(),
                    expected = self.config.vector.semantic_dims,
                    "embedding dimension mismatch, dropping text vector"
                );
                None
            }
            Ok(Err(error)) => {
                warn!(%error, "embedding call failed, dropping text vector");
                None
            }
            Err(_) => {
                warn!("embedding call timed out, dropping text vector");
                None
            }
        }
    }
}

fn parse_axis<T>(
    raw: Option<&str>,
    axis: &'static str,
    parse: fn(&str) -> Option<T>,
) -> ParcelaResult<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| {
                PreferenceError::UnknownCategory {
                    axis,
                    value: value.to_string(),
                }
                .into()
            }),
    }
}
