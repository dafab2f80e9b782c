use crate::core::distance::distance_meters;
use crate::models::{ScoreBreakdown, UserProfile};

/// Points per shared interest in the quick score
pub const QUICK_INTEREST_POINTS: f64 = 10.0;
/// Bonus when the candidate's age is inside the requester's preferred range
pub const QUICK_AGE_BONUS: f64 = 20.0;
/// Location bonus at distance zero, decaying one point per km
pub const QUICK_LOCATION_BONUS: f64 = 30.0;

pub const INTERESTS_WEIGHT: f64 = 30.0;
pub const AGE_WEIGHT: f64 = 20.0;
pub const LOCATION_WEIGHT: f64 = 20.0;
pub const ACTIVITY_WEIGHT: f64 = 15.0;
pub const VERIFICATION_WEIGHT: f64 = 15.0;

pub const MAX_SCORE: f64 = 100.0;

/// Fast aggregate score (0-100) used to rank large candidate pools
///
/// Scoring formula:
/// score = min(100,
///     10 * shared_interests +                 # uncapped before the final clamp
///     20 if candidate.age in user's range +
///     max(0, 30 - distance_km)                # only when both have a location
/// )
pub fn quick_score(user: &UserProfile, candidate: &UserProfile) -> f64 {
    let interest_score =
        QUICK_INTEREST_POINTS * user.interests.intersection(&candidate.interests).count() as f64;

    let age_score = if user.preferences.accepts_age(candidate.age) {
        QUICK_AGE_BONUS
    } else {
        0.0
    };

    let location_score = match (user.location, candidate.location) {
        (Some(a), Some(b)) => decay_by_km(QUICK_LOCATION_BONUS, distance_meters(a.point(), b.point())),
        _ => 0.0,
    };

    (interest_score + age_score + location_score).min(MAX_SCORE)
}

/// Detailed five-part compatibility breakdown for a single pair of users
///
/// Each component is bounded by its weight and the total is their sum, so
/// the total never exceeds 100.
pub fn detailed_score(user1: &UserProfile, user2: &UserProfile) -> ScoreBreakdown {
    let interests = interest_component(user1, user2);

    let age_gap = (i16::from(user1.age) - i16::from(user2.age)).abs() as f64;
    let age = (AGE_WEIGHT - 2.0 * age_gap).max(0.0);

    let location = match (user1.location, user2.location) {
        (Some(a), Some(b)) => decay_by_km(LOCATION_WEIGHT, distance_meters(a.point(), b.point())),
        _ => 0.0,
    };

    let activity = match (user1.last_active, user2.last_active) {
        (Some(a), Some(b)) => {
            let hours = (a - b).num_milliseconds().abs() as f64 / 3_600_000.0;
            (ACTIVITY_WEIGHT - hours).max(0.0)
        }
        _ => 0.0,
    };

    let verification = if user1.is_verified && user2.is_verified {
        VERIFICATION_WEIGHT
    } else {
        0.0
    };

    ScoreBreakdown {
        interests,
        age,
        location,
        activity,
        verification,
        total: interests + age + location + activity + verification,
    }
}

/// Interest overlap normalized by the larger interest set
#[inline]
fn interest_component(user1: &UserProfile, user2: &UserProfile) -> f64 {
    let larger = user1.interests.len().max(user2.interests.len());
    if larger == 0 {
        return 0.0;
    }

    let common = user1.interests.intersection(&user2.interests).count();
    INTERESTS_WEIGHT * common as f64 / larger as f64
}

/// `max(0, full - km)`; a NaN distance contributes nothing
#[inline]
fn decay_by_km(full: f64, meters: f64) -> f64 {
    (full - meters / 1000.0).max(0.0)
}
