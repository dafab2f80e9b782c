use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for preference-driven potential matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PotentialMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
    #[serde(default)]
    #[serde(alias = "exclude_user_ids", rename = "excludeUserIds")]
    pub exclude_user_ids: Vec<String>,
    #[validate(range(exclusive_min = 0.0))]
    #[serde(alias = "max_distance_km", rename = "maxDistanceKm")]
    pub max_distance_km: Option<f64>,
}

/// Request for ranking with caller-supplied filter options
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_age_range"))]
pub struct FilterMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 18, max = 120))]
    #[serde(rename = "minAge")]
    pub min_age: Option<u8>,
    #[validate(range(min = 18, max = 120))]
    #[serde(rename = "maxAge")]
    pub max_age: Option<u8>,
    #[validate(range(exclusive_min = 0.0))]
    #[serde(rename = "maxDistanceKm")]
    pub max_distance_km: Option<f64>,
    #[serde(rename = "requireCommonInterest", default)]
    pub require_common_interest: bool,
    #[serde(rename = "onlineOnly", default)]
    pub online_only: bool,
    #[serde(rename = "verifiedOnly", default)]
    pub verified_only: bool,
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

fn validate_age_range(req: &FilterMatchesRequest) -> Result<(), validator::ValidationError> {
    match (req.min_age, req.max_age) {
        (Some(min), Some(max)) if min > max => {
            Err(validator::ValidationError::new("min_age_above_max_age"))
        }
        _ => Ok(()),
    }
}

/// Request to record or update a match between two users
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    pub status: String,
}

/// `?userId=` query used by the read-only endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}
