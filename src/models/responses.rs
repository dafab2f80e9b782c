use serde::{Deserialize, Serialize};
use crate::core::statistics::MatchStatistics;
use crate::models::domain::{RankedCandidate, Recommendation, ScoreBreakdown};

/// Response for the ranking endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatchesResponse<'a> {
    pub matches: Vec<RankedCandidate<'a>>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "eligibleCandidates")]
    pub eligible_candidates: usize,
}

/// Response for the recommendation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsResponse<'a> {
    pub recommendations: Vec<Recommendation<'a>>,
}

/// Pairwise compatibility explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "targetUserId")]
    pub target_user_id: String,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
    pub scores: ScoreBreakdown,
}

/// Match statistics for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(flatten)]
    pub statistics: MatchStatistics,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Record match response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMatchResponse {
    pub success: bool,
    #[serde(rename = "requestId")]
    pub request_id: String,
}
