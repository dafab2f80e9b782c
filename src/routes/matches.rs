use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;
use crate::core::{
    bounding_box, counterpart_ids, daily_suggestions, detailed_score, start_of_utc_day, storage_query,
    FilterOptions, MatchRanker, MatchStatistics, RecommendationProfile, RecommendationStrategy,
};
use crate::models::{
    CandidateQuery, CompatibilityResponse, FilterMatchesRequest, HealthResponse, MatchStatus,
    PotentialMatchesRequest, RankedMatchesResponse, RecommendationsResponse, RecordMatchRequest,
    RecordMatchResponse, StatisticsResponse, UserProfile, UserQuery,
};
use crate::routes::error::ApiError;
use crate::services::{AppwriteClient, CacheKey, CacheManager, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub ranker: MatchRanker,
    pub recommendations: RecommendationStrategy,
    pub daily_suggestions: usize,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/potential", web::post().to(potential_matches))
        .route("/matches/filter", web::post().to(filter_matches))
        .route("/matches/compatibility/{targetUserId}", web::get().to(compatibility))
        .route("/matches/recommendations", web::get().to(recommendations))
        .route("/matches/daily-suggestions", web::get().to(daily))
        .route("/matches/statistics", web::get().to(statistics))
        .route("/matches/event", web::post().to(record_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Load a profile, going through the cache first
async fn load_profile(state: &AppState, user_id: &str) -> Result<UserProfile, ApiError> {
    let key = CacheKey::profile(user_id);
    if let Some(profile) = state.cache.get_or_bypass::<UserProfile>(&key).await {
        return Ok(profile);
    }

    let profile = state.appwrite.get_profile(user_id).await?;

    if let Err(e) = state.cache.set(&key, &profile).await {
        tracing::warn!("Failed to cache profile for {}: {}", user_id, e);
    }

    Ok(profile)
}

/// Users the requester must not be shown: every match counterpart, both
/// directions of any block, plus whatever the client asked to skip
async fn load_exclusions(
    state: &AppState,
    user_id: &str,
    extra: &[String],
) -> Result<HashSet<String>, ApiError> {
    let records = state.postgres.list_matches(user_id).await?;
    let mut exclude_ids = counterpart_ids(&records, user_id);

    exclude_ids.extend(state.postgres.get_blocked_ids(user_id).await?);
    exclude_ids.extend(extra.iter().cloned());

    tracing::debug!("Excluding {} users for {}", exclude_ids.len(), user_id);

    Ok(exclude_ids)
}

/// Potential matches endpoint
///
/// POST /api/v1/matches/potential
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20,
///   "excludeUserIds": ["string"],
///   "maxDistanceKm": 25.0
/// }
/// ```
async fn potential_matches(
    state: web::Data<AppState>,
    req: web::Json<PotentialMatchesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let user_id = &req.user_id;
    let policy = state.ranker.policy();
    let limit = policy.resolve_limit(req.limit);

    tracing::info!("Finding potential matches for user: {}, limit: {}", user_id, limit);

    let requester = load_profile(&state, user_id).await?;
    let exclude_ids = load_exclusions(&state, user_id, &req.exclude_user_ids).await?;

    let preferences = requester.preferences.clone();
    let options = FilterOptions::discovery(&preferences, req.max_distance_km);

    let query = storage_query(&requester, &preferences, &exclude_ids, &options, policy.pool_cap);
    let pool = state.appwrite.query_candidates(user_id, &query).await?;

    let result = state
        .ranker
        .rank(&pool, &requester, &preferences, &exclude_ids, &options, limit);

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        result.candidates.len(),
        user_id,
        result.total_candidates
    );

    Ok(HttpResponse::Ok().json(RankedMatchesResponse {
        matches: result.candidates,
        total_candidates: result.total_candidates,
        eligible_candidates: result.eligible_candidates,
    }))
}

/// Filtered matches endpoint
///
/// POST /api/v1/matches/filter
///
/// Age bounds in the body replace the stored preferences; the remaining
/// switches are off unless set.
async fn filter_matches(
    state: web::Data<AppState>,
    req: web::Json<FilterMatchesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let user_id = &req.user_id;
    let policy = state.ranker.policy();
    let limit = policy.resolve_limit(req.limit);

    tracing::info!("Filtering matches for user: {}, limit: {}", user_id, limit);

    let requester = load_profile(&state, user_id).await?;
    let exclude_ids = load_exclusions(&state, user_id, &[]).await?;

    let mut preferences = requester.preferences.clone();
    if let Some(min_age) = req.min_age {
        preferences.min_age = min_age;
    }
    if let Some(max_age) = req.max_age {
        preferences.max_age = max_age;
    }
    if preferences.min_age > preferences.max_age {
        return Err(ApiError::Validation(format!(
            "age range {}..={} is empty",
            preferences.min_age, preferences.max_age
        )));
    }

    let options = FilterOptions {
        require_common_interest: req.require_common_interest,
        max_distance_km: req.max_distance_km,
        online_only: req.online_only,
        verified_only: req.verified_only,
    };

    let query = storage_query(&requester, &preferences, &exclude_ids, &options, policy.pool_cap);
    let pool = state.appwrite.query_candidates(user_id, &query).await?;

    let result = state
        .ranker
        .rank(&pool, &requester, &preferences, &exclude_ids, &options, limit);

    Ok(HttpResponse::Ok().json(RankedMatchesResponse {
        matches: result.candidates,
        total_candidates: result.total_candidates,
        eligible_candidates: result.eligible_candidates,
    }))
}

/// Pairwise compatibility endpoint
///
/// GET /api/v1/matches/compatibility/{targetUserId}?userId=...
async fn compatibility(
    state: web::Data<AppState>,
    target: web::Path<String>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let target_user_id = target.into_inner();
    if target_user_id == query.user_id {
        return Err(ApiError::Validation(
            "compatibility requires two different users".to_string(),
        ));
    }

    let user = load_profile(&state, &query.user_id).await?;
    let target = load_profile(&state, &target_user_id).await?;

    let scores = detailed_score(&user, &target);

    tracing::debug!(
        "Compatibility {} -> {}: {:.1}",
        user.id,
        target.id,
        scores.total
    );

    Ok(HttpResponse::Ok().json(CompatibilityResponse {
        user_id: user.id.clone(),
        target_user_id: target.id.clone(),
        shared_interests: user.shared_interests(&target),
        scores,
    }))
}

/// History-based recommendations endpoint
///
/// GET /api/v1/matches/recommendations?userId=...
///
/// Users without any successful match get an empty list.
async fn recommendations(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;
    let user_id = &query.user_id;

    let requester = load_profile(&state, user_id).await?;
    let records = state.postgres.list_matches(user_id).await?;

    let history_ids: Vec<String> = records
        .iter()
        .filter(|r| r.status == MatchStatus::Matched)
        .filter_map(|r| r.counterpart(user_id))
        .map(str::to_string)
        .collect();
    let history = state.appwrite.get_profiles(&history_ids).await?;
    let tallies = RecommendationProfile::from_history(&history);

    let Some(anchor) = tallies.anchor_age() else {
        return Ok(HttpResponse::Ok().json(RecommendationsResponse {
            recommendations: Vec::new(),
        }));
    };

    let exclude_ids = load_exclusions(&state, user_id, &[]).await?;
    let strategy = &state.recommendations;

    let mut exclude_user_ids: Vec<String> = exclude_ids.iter().cloned().collect();
    exclude_user_ids.sort();

    let candidate_query = CandidateQuery {
        bounding_box: requester
            .location
            .map(|origin| bounding_box(origin.point(), requester.preferences.max_distance_km)),
        genders: Default::default(),
        interests: Some(tallies.top_interests(strategy.top_interest_count)),
        min_age: anchor.saturating_sub(strategy.age_window),
        max_age: anchor.saturating_add(strategy.age_window),
        online_only: false,
        verified_only: false,
        active_since: None,
        exclude_user_ids,
        limit: state.ranker.policy().pool_cap,
    };
    let pool = state.appwrite.query_candidates(user_id, &candidate_query).await?;

    let recommendations = strategy.recommend(&tallies, &requester, &pool, &exclude_ids);

    tracing::info!("Returning {} recommendations for user {}", recommendations.len(), user_id);

    Ok(HttpResponse::Ok().json(RecommendationsResponse { recommendations }))
}

/// Daily suggestions endpoint
///
/// GET /api/v1/matches/daily-suggestions?userId=...
async fn daily(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;
    let user_id = &query.user_id;

    let requester = load_profile(&state, user_id).await?;
    let now = Utc::now();

    let candidate_query = CandidateQuery {
        bounding_box: None,
        genders: Default::default(),
        interests: None,
        min_age: requester.preferences.min_age,
        max_age: requester.preferences.max_age,
        online_only: false,
        verified_only: true,
        active_since: Some(start_of_utc_day(now)),
        exclude_user_ids: Vec::new(),
        limit: state.ranker.policy().pool_cap,
    };
    let pool = state.appwrite.query_candidates(user_id, &candidate_query).await?;

    let suggestions = daily_suggestions(&requester, &pool, now, state.daily_suggestions);

    Ok(HttpResponse::Ok().json(RecommendationsResponse {
        recommendations: suggestions,
    }))
}

/// Match statistics endpoint
///
/// GET /api/v1/matches/statistics?userId=...
async fn statistics(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;
    let user_id = &query.user_id;
    let key = CacheKey::statistics(user_id);

    let statistics = match state.cache.get_or_bypass::<MatchStatistics>(&key).await {
        Some(cached) => cached,
        None => {
            let records = state.postgres.list_matches(user_id).await?;
            let computed = MatchStatistics::compute(&records, Utc::now());
            if let Err(e) = state.cache.set(&key, &computed).await {
                tracing::warn!("Failed to cache statistics for {}: {}", user_id, e);
            }
            computed
        }
    };

    Ok(HttpResponse::Ok().json(StatisticsResponse {
        user_id: user_id.clone(),
        statistics,
    }))
}

/// Record match endpoint
///
/// POST /api/v1/matches/event
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string",
///   "status": "pending|matched|rejected"
/// }
/// ```
async fn record_match(
    state: web::Data<AppState>,
    req: web::Json<RecordMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let status: MatchStatus = req.status.parse().map_err(ApiError::Validation)?;

    state
        .postgres
        .record_match(&req.user_id, &req.target_user_id, status)
        .await?;

    let stale = [
        CacheKey::statistics(&req.user_id),
        CacheKey::statistics(&req.target_user_id),
    ];
    if let Err(e) = state.cache.invalidate(&stale).await {
        tracing::warn!(
            "Failed to invalidate statistics for {} and {}: {}",
            req.user_id,
            req.target_user_id,
            e
        );
    }

    tracing::info!(
        "Recorded match {} -> {} ({:?})",
        req.user_id,
        req.target_user_id,
        status
    );

    Ok(HttpResponse::Ok().json(RecordMatchResponse {
        success: true,
        request_id: uuid::Uuid::new_v4().to_string(),
    }))
}
