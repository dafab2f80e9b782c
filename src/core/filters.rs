use crate::core::distance::{bounding_box, distance_km};
use crate::models::{CandidateQuery, Preferences, UserProfile};
use std::collections::HashSet;

/// Optional hard constraints applied on top of the preferences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub require_common_interest: bool,
    /// Radius cap; candidates without a location fail it while it is set
    pub max_distance_km: Option<f64>,
    pub online_only: bool,
    pub verified_only: bool,
}

impl FilterOptions {
    /// Options for preference-driven discovery: a shared interest is
    /// required and the radius comes from the preferences unless overridden.
    pub fn discovery(preferences: &Preferences, max_distance_override: Option<f64>) -> Self {
        Self {
            require_common_interest: true,
            max_distance_km: Some(max_distance_override.unwrap_or(preferences.max_distance_km)),
            online_only: false,
            verified_only: false,
        }
    }
}

/// Check whether a single candidate survives every hard constraint
///
/// Checks run in a fixed order so the cheap ones exit early; the result
/// does not depend on that order.
#[inline]
pub fn passes_filters(
    candidate: &UserProfile,
    requester: &UserProfile,
    preferences: &Preferences,
    exclude_ids: &HashSet<String>,
    options: &FilterOptions,
) -> bool {
    if candidate.id == requester.id || exclude_ids.contains(&candidate.id) {
        return false;
    }

    if !preferences.accepts_gender(&candidate.gender) {
        return false;
    }

    if !preferences.accepts_age(candidate.age) {
        return false;
    }

    if options.require_common_interest && !requester.shares_interest_with(candidate) {
        return false;
    }

    if let (Some(max_km), Some(origin)) = (options.max_distance_km, requester.location) {
        match candidate.location {
            Some(location) if distance_km(origin.point(), location.point()) <= max_km => {}
            _ => return false,
        }
    }

    if options.online_only && !candidate.is_online {
        return false;
    }

    if options.verified_only && !candidate.is_verified {
        return false;
    }

    true
}

/// Build the storage query that pre-narrows the pool for a requester
///
/// The bounding box over-approximates the radius; `passes_filters` still
/// performs the exact check on whatever the store returns.
pub fn storage_query(
    requester: &UserProfile,
    preferences: &Preferences,
    exclude_ids: &HashSet<String>,
    options: &FilterOptions,
    limit: usize,
) -> CandidateQuery {
    let bbox = match (options.max_distance_km, requester.location) {
        (Some(radius_km), Some(origin)) => Some(bounding_box(origin.point(), radius_km)),
        _ => None,
    };

    let mut exclude_user_ids: Vec<String> = exclude_ids.iter().cloned().collect();
    exclude_user_ids.sort();

    CandidateQuery {
        bounding_box: bbox,
        genders: preferences.gender_preference.clone(),
        interests: options
            .require_common_interest
            .then(|| requester.interests.iter().cloned().collect()),
        min_age: preferences.min_age,
        max_age: preferences.max_age,
        online_only: options.online_only,
        verified_only: options.verified_only,
        active_since: None,
        exclude_user_ids,
        limit,
    }
}

/// Reduce a candidate pool to the profiles that pass every constraint
///
/// Pool order is preserved and no profile is modified.
pub fn filter_candidates<'a>(
    pool: &'a [UserProfile],
    requester: &UserProfile,
    preferences: &Preferences,
    exclude_ids: &HashSet<String>,
    options: &FilterOptions,
) -> Vec<&'a UserProfile> {
    pool.iter()
        .filter(|candidate| passes_filters(candidate, requester, preferences, exclude_ids, options))
        .collect()
}
