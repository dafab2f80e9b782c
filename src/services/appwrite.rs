use crate::models::{CandidateQuery, Gender, UserProfile};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client for the profile document store
///
/// Handles all profile reads the matching service needs:
/// - Fetching a single user's profile (preferences are embedded)
/// - Fetching a batch of profiles by id
/// - Querying candidate pools pre-narrowed by attributes and a bounding box
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub user_profiles: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
        timeout: Duration,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.user_profiles
        )
    }

    /// Run a list-documents request and parse every document as a profile
    ///
    /// Documents that fail to parse are skipped and logged.
    async fn list_profiles(&self, queries: &[String]) -> Result<Vec<UserProfile>, AppwriteError> {
        let queries_json = serde_json::to_string(queries)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode queries: {}", e)))?;
        let url = format!("{}?query={}", self.documents_url(), urlencoding::encode(&queries_json));

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Profile query failed: {} - {}", status, body);
            return Err(AppwriteError::ApiError(format!("Failed to query profiles: {}", status)));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        let profiles = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                match serde_json::from_value::<UserProfile>(data.clone()) {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        tracing::warn!("Skipping malformed profile document: {}", e);
                        None
                    }
                }
            })
            .collect();

        Ok(profiles)
    }

    /// Get a single profile by user ID
    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, AppwriteError> {
        tracing::debug!("Fetching profile for user: {}", user_id);

        let queries = vec![format!("equal(\"userId\", \"{}\")", user_id), "limit(1)".to_string()];

        self.list_profiles(&queries)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppwriteError::NotFound(format!("Profile not found for user {}", user_id)))
    }

    /// Get several profiles by user ID; unknown ids are silently absent
    pub async fn get_profiles(&self, user_ids: &[String]) -> Result<Vec<UserProfile>, AppwriteError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = user_ids
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(",");
        let queries = vec![
            format!("equal(\"userId\", [{}])", ids),
            format!("limit({})", user_ids.len()),
        ];

        self.list_profiles(&queries).await
    }

    /// Query candidate profiles for a requester
    pub async fn query_candidates(
        &self,
        requester_id: &str,
        query: &CandidateQuery,
    ) -> Result<Vec<UserProfile>, AppwriteError> {
        let queries = render_candidate_queries(requester_id, query);
        let profiles = self.list_profiles(&queries).await?;

        tracing::debug!("Queried {} candidates for {}", profiles.len(), requester_id);

        Ok(profiles)
    }
}

/// Translate a candidate query into Appwrite query strings
///
/// Profile documents mirror their coordinates into flat `latitude` and
/// `longitude` attributes so the bounding box can use indexed range queries.
pub fn render_candidate_queries(requester_id: &str, query: &CandidateQuery) -> Vec<String> {
    let mut queries = vec![format!("notEqual(\"userId\", \"{}\")", requester_id)];

    if !query.genders.is_empty() {
        let genders: Vec<&str> = query.genders.iter().map(Gender::as_str).collect();
        queries.push(format!("equal(\"gender\", {})", string_list(&genders)));
    }

    if let Some(interests) = query.interests.as_deref().filter(|tags| !tags.is_empty()) {
        queries.push(format!("contains(\"interests\", {})", string_list(interests)));
    }

    queries.push(format!("greaterThanEqual(\"age\", {})", query.min_age));
    queries.push(format!("lessThanEqual(\"age\", {})", query.max_age));

    if let Some(bbox) = &query.bounding_box {
        queries.push(format!("between(\"latitude\", {}, {})", bbox.min_lat, bbox.max_lat));
        queries.push(format!("between(\"longitude\", {}, {})", bbox.min_lon, bbox.max_lon));
    }

    if query.online_only {
        queries.push("equal(\"isOnline\", true)".to_string());
    }
    if query.verified_only {
        queries.push("equal(\"isVerified\", true)".to_string());
    }
    if let Some(since) = query.active_since {
        queries.push(format!("greaterThanEqual(\"lastActive\", \"{}\")", since.to_rfc3339()));
    }

    for id in &query.exclude_user_ids {
        queries.push(format!("notEqual(\"userId\", \"{}\")", id));
    }

    queries.push(format!("limit({})", query.limit));
    queries
}

/// JSON array of quoted strings, so tags containing quotes stay well formed
fn string_list<S: AsRef<str>>(values: &[S]) -> String {
    let values: Vec<&str> = values.iter().map(|v| v.as_ref()).collect();
    serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string())
}
