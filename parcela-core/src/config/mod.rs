//! Configuration for every subsystem, deserializable from TOML.
//!
//! All fields have documented defaults; a missing section or field falls
//! back to its default via `#[serde(default)]`.

pub mod defaults;

mod disclosure_config;
mod proximity_config;
mod retrieval_config;
mod vector_config;

pub use disclosure_config::DisclosureConfig;
pub use proximity_config::ProximityConfig;
pub use retrieval_config::RetrievalConfig;
pub use vector_config::VectorConfig;

use serde::{Deserialize, Serialize};

/// Aggregated workspace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParcelaConfig {
    pub retrieval: RetrievalConfig,
    pub proximity: ProximityConfig,
    pub vector: VectorConfig,
    pub disclosure: DisclosureConfig,
}

impl ParcelaConfig {
    /// Parse a TOML document, filling anything missing with defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parcel::PoiType;

    #[test]
    fn defaults_match_documented_values() {
        let config = ParcelaConfig::default();
        assert_eq!(config.retrieval.rrf_k, 60);
        assert_eq!(config.retrieval.branch_timeout_ms, 2_000);
        assert_eq!(config.vector.overfetch_factor, 4);
        assert_eq!(config.vector.min_similarity, 0.0);
        assert_eq!(config.retrieval.min_salience, 0.05);
        assert_eq!(config.proximity.threshold_m(PoiType::Forest), 2_000.0);
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let config = ParcelaConfig::from_toml_str(
            r#"
            [retrieval]
            rrf_k = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.rrf_k, 30);
        assert_eq!(config.retrieval.branch_timeout_ms, 2_000);
        assert_eq!(config.vector.overfetch_factor, 4);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = ParcelaConfig::from_toml_str("").unwrap();
        assert_eq!(config.retrieval.vector_k, 50);
        assert_eq!(config.disclosure.suggested_topup, 10);
    }
}
