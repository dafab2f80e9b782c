// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, CandidateQuery, Gender, GeoPoint, MatchRecord, MatchStatus, Preferences,
    RankedCandidate, Recommendation, ScoreBreakdown, UserProfile,
};
pub use requests::{FilterMatchesRequest, PotentialMatchesRequest, RecordMatchRequest, UserQuery};
pub use responses::{
    CompatibilityResponse, ErrorResponse, HealthResponse, RankedMatchesResponse,
    RecommendationsResponse, RecordMatchResponse, StatisticsResponse,
};
