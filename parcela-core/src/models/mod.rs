//! Request- and response-scoped models. Everything here lives for one
//! request and is discarded with the response; durable data is the
//! snapshot's business.

pub mod disclosure;
pub mod query;
pub mod results;
pub mod snapshot;

pub use disclosure::{PaymentPrompt, RevealedParcel};
pub use query::{
    CallerId, CanonicalFilters, PreferenceQuery, ProximityWeights, RawPreference, SessionId,
};
pub use results::{
    Branch, CandidateDetail, GraphMatch, RankedOutcome, RankedResult, SearchResponse,
    SourceBreakdown, TeaserEntry,
};
pub use snapshot::{GenerationId, SnapshotInfo};
