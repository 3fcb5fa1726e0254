//! # parcela-core
//!
//! Foundation crate for the Parcela parcel-matching core.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod parcel;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ParcelaConfig;
pub use errors::{ParcelaError, ParcelaResult};
pub use models::{PreferenceQuery, RankedResult, SearchResponse, SourceBreakdown};
pub use parcel::{Parcel, ParcelId, PoiType};
