//! Highlight derivation from the per-source contribution breakdown.
//!
//! Pure and deterministic: the same (parcel, breakdown, weights) triple
//! always yields the same strings.

use parcela_core::constants::MAX_HIGHLIGHTS;
use parcela_core::models::{ProximityWeights, SourceBreakdown};
use parcela_core::parcel::Parcel;

/// Composite-score level above which a parcel attribute earns a
/// supplementary highlight.
const ATTRIBUTE_FLOOR: f32 = 0.7;

/// The strings derived for one result.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// At most four, ordered by contribution salience.
    pub highlights: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Source {
    Proximity,
    Semantic,
    Structural,
}

impl Source {
    fn summary_label(&self) -> &'static str {
        match self {
            Self::Proximity => "proximity fit",
            Self::Semantic => "description match",
            Self::Structural => "similarity to your reference parcel",
        }
    }
}

/// Derives highlights from contribution magnitudes, suppressing sources
/// whose share of the fused score falls below the salience threshold.
pub struct ExplanationBuilder {
    min_salience: f64,
}

impl ExplanationBuilder {
    pub fn new(min_salience: f64) -> Self {
        Self { min_salience }
    }

    pub fn build(
        &self,
        parcel: &Parcel,
        breakdown: &SourceBreakdown,
        weights: &ProximityWeights,
    ) -> Explanation {
        let total = breakdown.total();
        if total <= 0.0 {
            return Explanation {
                highlights: vec!["matches every requested filter".to_string()],
                summary: "Matched on your filters alone".to_string(),
            };
        }

        let mut sources = [
            (Source::Proximity, breakdown.proximity / total),
            (Source::Semantic, breakdown.semantic / total),
            (Source::Structural, breakdown.structural / total),
        ];
        // Salience descending; the array order settles exact ties.
        sources.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut highlights: Vec<String> = sources
            .iter()
            .filter(|(_, share)| *share >= self.min_salience)
            .map(|(source, _)| self.source_highlight(*source, breakdown, weights))
            .collect();

        for extra in attribute_highlights(parcel) {
            if highlights.len() >= MAX_HIGHLIGHTS {
                break;
            }
            highlights.push(extra);
        }
        highlights.truncate(MAX_HIGHLIGHTS);

        let summary = format!("Ranked mainly by {}", sources[0].0.summary_label());
        Explanation {
            highlights,
            summary,
        }
    }

    fn source_highlight(
        &self,
        source: Source,
        breakdown: &SourceBreakdown,
        weights: &ProximityWeights,
    ) -> String {
        match source {
            Source::Proximity => match weights.dominant() {
                Some(poi) if !weights.is_uniform() => format!(
                    "close to {} (proximity score {:.2})",
                    poi.label().replace('_', " "),
                    breakdown.proximity
                ),
                _ => format!(
                    "good overall proximity profile (score {:.2})",
                    breakdown.proximity
                ),
            },
            Source::Semantic => "closely matches your description".to_string(),
            Source::Structural => "similar in character to your reference parcel".to_string(),
        }
    }
}

fn attribute_highlights(parcel: &Parcel) -> Vec<String> {
    let mut extras = Vec::new();
    if parcel.scores.quietness > ATTRIBUTE_FLOOR {
        extras.push("quiet surroundings".to_string());
    }
    if parcel.scores.nature > ATTRIBUTE_FLOOR {
        extras.push("green, natural setting".to_string());
    }
    if parcel.scores.accessibility > ATTRIBUTE_FLOOR {
        extras.push("well connected".to_string());
    }
    extras
}
