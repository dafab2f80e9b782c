use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Gender as stored on the profile document.
///
/// The set is open: values outside the known ones are kept verbatim in
/// [`Gender::Other`], so they compare, serialize and query exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonBinary => "non_binary",
            Gender::Other(value) => value,
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        match value.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            "non_binary" => Gender::NonBinary,
            _ => Gender::Other(value),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GeoJSON point as stored on user documents: `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_kind")]
    pub kind: PointKind,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Point,
}

fn point_kind() -> PointKind {
    PointKind::Point
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: PointKind::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// As a `geo` point (x = longitude, y = latitude)
    pub fn point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude(), self.latitude())
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

/// User profile with demographic, activity and location data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(rename = "lastActive", default)]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    #[serde(rename = "isOnline", default)]
    pub is_online: bool,
    #[serde(default)]
    pub preferences: Preferences,
}

impl UserProfile {
    /// Interests shared with another profile, in tag order
    pub fn shared_interests(&self, other: &UserProfile) -> Vec<String> {
        self.interests
            .intersection(&other.interests)
            .cloned()
            .collect()
    }

    pub fn shares_interest_with(&self, other: &UserProfile) -> bool {
        self.interests.intersection(&other.interests).next().is_some()
    }
}

/// Matching preferences of the requesting user.
///
/// Every field falls back to its default when missing from the stored
/// document; preferences are never rejected for being incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "minAge", default = "default_min_age")]
    pub min_age: u8,
    #[serde(rename = "maxAge", default = "default_max_age")]
    pub max_age: u8,
    #[serde(rename = "genderPreference", alias = "gender", default = "default_genders")]
    pub gender_preference: BTreeSet<Gender>,
    #[serde(rename = "maxDistanceKm", alias = "maxDistance", default = "default_max_distance_km")]
    pub max_distance_km: f64,
}

pub const DEFAULT_MIN_AGE: u8 = 18;
pub const DEFAULT_MAX_AGE: u8 = 100;
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

fn default_min_age() -> u8 { DEFAULT_MIN_AGE }
fn default_max_age() -> u8 { DEFAULT_MAX_AGE }
fn default_max_distance_km() -> f64 { DEFAULT_MAX_DISTANCE_KM }
fn default_genders() -> BTreeSet<Gender> {
    BTreeSet::from([Gender::Male, Gender::Female])
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            max_age: default_max_age(),
            gender_preference: default_genders(),
            max_distance_km: default_max_distance_km(),
        }
    }
}

impl Preferences {
    #[inline]
    pub fn accepts_age(&self, age: u8) -> bool {
        age >= self.min_age && age <= self.max_age
    }

    #[inline]
    pub fn accepts_gender(&self, gender: &Gender) -> bool {
        self.gender_preference.contains(gender)
    }
}

/// Per-component compatibility breakdown for a single pair of users
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub interests: f64,
    pub age: f64,
    pub location: f64,
    pub activity: f64,
    pub verification: f64,
    pub total: f64,
}

/// Candidate with its aggregate compatibility score
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate<'a> {
    #[serde(flatten)]
    pub profile: &'a UserProfile,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: f64,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
}

/// Candidate picked by the history-based recommendation strategy
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    #[serde(flatten)]
    pub profile: &'a UserProfile,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
}

/// Lifecycle of a match between two users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Matched,
    Rejected,
}

impl std::str::FromStr for MatchStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pending" => Ok(MatchStatus::Pending),
            "matched" => Ok(MatchStatus::Matched),
            "rejected" => Ok(MatchStatus::Rejected),
            other => Err(format!(
                "unknown match status '{}', expected one of: pending, matched, rejected",
                other
            )),
        }
    }
}

/// Stored match between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "targetUserId")]
    pub target_user_id: String,
    pub status: MatchStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// The other party of this record, if `user_id` is one of its users
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.user_id == user_id {
            Some(&self.target_user_id)
        } else if self.target_user_id == user_id {
            Some(&self.user_id)
        } else {
            None
        }
    }

    /// The two users in a fixed order, identical for both directions
    pub fn pair(&self) -> (&str, &str) {
        if self.user_id <= self.target_user_id {
            (&self.user_id, &self.target_user_id)
        } else {
            (&self.target_user_id, &self.user_id)
        }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Storage-side narrowing of the candidate pool
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub bounding_box: Option<BoundingBox>,
    pub genders: BTreeSet<Gender>,
    /// Candidates must carry at least one of these tags
    pub interests: Option<Vec<String>>,
    pub min_age: u8,
    pub max_age: u8,
    pub online_only: bool,
    pub verified_only: bool,
    pub active_since: Option<DateTime<Utc>>,
    pub exclude_user_ids: Vec<String>,
    pub limit: usize,
}
