// Core algorithm exports
pub mod filters;
pub mod distance;
pub mod ranker;
pub mod recommendations;
pub mod scoring;
pub mod statistics;

pub use filters::{filter_candidates, passes_filters, storage_query, FilterOptions};
pub use distance::{bounding_box, distance_km, distance_meters, is_within_bounding_box};
pub use ranker::{MatchRanker, RankResult, RankingPolicy};
pub use recommendations::{daily_suggestions, start_of_utc_day, RecommendationProfile, RecommendationStrategy};
pub use scoring::{detailed_score, quick_score};
pub use statistics::{counterpart_ids, unique_pairs, MatchStatistics};
