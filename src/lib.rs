//! Heartbeat Match - match scoring and candidate ranking for the Heartbeat dating app
//!
//! The core modules are pure and synchronous: great-circle distance,
//! compatibility scoring, hard-constraint filtering and ranking over an
//! in-memory candidate pool. The service layer feeds them from the profile
//! document store, PostgreSQL and the cache, and the routes expose them
//! over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    detailed_score, distance_km, distance_meters, filter_candidates, quick_score, FilterOptions,
    MatchRanker, RankingPolicy,
};
pub use models::{Preferences, RankedCandidate, ScoreBreakdown, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let berlin = geo::Point::new(13.4050, 52.5200);
        assert_eq!(distance_meters(berlin, berlin), 0.0);
        assert_eq!(MatchRanker::default().policy(), &RankingPolicy::default());
    }
}
