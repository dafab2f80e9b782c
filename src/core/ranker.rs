use crate::core::{
    filters::{filter_candidates, FilterOptions},
    distance::distance_km,
    scoring::quick_score,
};
use crate::models::{Preferences, RankedCandidate, UserProfile};
use std::collections::HashSet;

/// Pool cap and result limits applied by the ranker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingPolicy {
    /// Filtered candidates scored per request, taken in pool order
    pub pool_cap: usize,
    /// Result size when the caller does not ask for one
    pub default_limit: usize,
    /// Upper bound on any requested result size
    pub max_limit: usize,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            pool_cap: 50,
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl RankingPolicy {
    /// Resolve a caller-requested limit against the policy bounds
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

/// Result of the ranking process
#[derive(Debug)]
pub struct RankResult<'a> {
    pub candidates: Vec<RankedCandidate<'a>>,
    /// Size of the raw pool handed to the ranker
    pub total_candidates: usize,
    /// Candidates that survived filtering, before the pool cap
    pub eligible_candidates: usize,
}

/// Main ranking orchestrator
///
/// # Pipeline Stages
/// 1. Hard constraint filtering
/// 2. Pool cap (fallback for pools not capped by the storage query)
/// 3. Quick scoring
/// 4. Stable sort (descending) and truncation
#[derive(Debug, Clone, Default)]
pub struct MatchRanker {
    policy: RankingPolicy,
}

impl MatchRanker {
    pub fn new(policy: RankingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    /// Rank a candidate pool for the requester
    ///
    /// Ties keep the order the candidates had in the pool, so identical
    /// inputs always produce identical output.
    ///
    /// Pools fetched through `storage_query` already hold at most
    /// `pool_cap` candidates and the cap here does nothing for them. It only
    /// bounds scoring work for callers that pass an uncapped pool, and it
    /// counts eligible candidates in pool order.
    ///
    /// # Arguments
    /// * `pool` - Candidates already narrowed by the storage query
    /// * `requester` - The requesting user's profile
    /// * `preferences` - Hard constraints, usually the requester's own
    /// * `exclude_ids` - Already matched or blocked users
    /// * `options` - Additional filter switches
    /// * `limit` - Maximum number of results
    pub fn rank<'a>(
        &self,
        pool: &'a [UserProfile],
        requester: &UserProfile,
        preferences: &Preferences,
        exclude_ids: &HashSet<String>,
        options: &FilterOptions,
        limit: usize,
    ) -> RankResult<'a> {
        let eligible = filter_candidates(pool, requester, preferences, exclude_ids, options);
        let eligible_candidates = eligible.len();

        let mut ranked: Vec<RankedCandidate<'a>> = eligible
            .into_iter()
            .take(self.policy.pool_cap)
            .map(|candidate| score_candidate(requester, candidate))
            .collect();

        // `sort_by` is stable; `total_cmp` keeps NaN scores from breaking the order
        ranked.sort_by(|a, b| b.compatibility_score.total_cmp(&a.compatibility_score));
        ranked.truncate(limit);

        tracing::debug!(
            requester = %requester.id,
            pool = pool.len(),
            eligible = eligible_candidates,
            returned = ranked.len(),
            "ranked candidate pool"
        );

        RankResult {
            candidates: ranked,
            total_candidates: pool.len(),
            eligible_candidates,
        }
    }
}

fn score_candidate<'a>(requester: &UserProfile, candidate: &'a UserProfile) -> RankedCandidate<'a> {
    let distance = match (requester.location, candidate.location) {
        (Some(a), Some(b)) => Some(distance_km(a.point(), b.point())),
        _ => None,
    };

    RankedCandidate {
        profile: candidate,
        compatibility_score: quick_score(requester, candidate),
        shared_interests: requester.shared_interests(candidate),
        distance_km: distance,
    }
}
