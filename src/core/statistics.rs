use crate::models::{MatchRecord, MatchStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Window counted as "recent" in the statistics
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Summary of a user's match records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
    #[serde(rename = "successfulMatches")]
    pub successful_matches: usize,
    #[serde(rename = "pendingMatches")]
    pub pending_matches: usize,
    /// Percentage of records that became a match; 0 with no records
    #[serde(rename = "matchRate")]
    pub match_rate: f64,
    #[serde(rename = "recentMatches")]
    pub recent_matches: usize,
}

impl MatchStatistics {
    /// Records for the same pair count once, using the newest of them
    pub fn compute(records: &[MatchRecord], now: DateTime<Utc>) -> Self {
        let records = unique_pairs(records);
        let total_matches = records.len();
        let successful_matches = records
            .iter()
            .filter(|r| r.status == MatchStatus::Matched)
            .count();
        let pending_matches = records
            .iter()
            .filter(|r| r.status == MatchStatus::Pending)
            .count();

        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        let recent_matches = records.iter().filter(|r| r.created_at >= cutoff).count();

        let match_rate = if total_matches == 0 {
            0.0
        } else {
            successful_matches as f64 / total_matches as f64 * 100.0
        };

        Self {
            total_matches,
            successful_matches,
            pending_matches,
            match_rate,
            recent_matches,
        }
    }
}

/// One record per unordered pair, keeping the newest; input order otherwise
pub fn unique_pairs(records: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut newest: HashMap<(&str, &str), &MatchRecord> = HashMap::new();
    for record in records {
        newest
            .entry(record.pair())
            .and_modify(|kept| {
                if record.created_at > kept.created_at {
                    *kept = record;
                }
            })
            .or_insert(record);
    }

    records
        .iter()
        .filter(|r| newest.get(&r.pair()).is_some_and(|kept| std::ptr::eq(*kept, *r)))
        .collect()
}

/// Ids of everyone the user already has a match record with
pub fn counterpart_ids(records: &[MatchRecord], user_id: &str) -> HashSet<String> {
    records
        .iter()
        .filter_map(|r| r.counterpart(user_id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, target: &str, status: MatchStatus, age_days: i64) -> MatchRecord {
        MatchRecord {
            user_id: user.to_string(),
            target_user_id: target.to_string(),
            status,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn test_statistics() {
        let records = vec![
            record("me", "a", MatchStatus::Matched, 1),
            record("b", "me", MatchStatus::Pending, 3),
            record("me", "c", MatchStatus::Rejected, 10),
            record("d", "me", MatchStatus::Matched, 30),
        ];

        let stats = MatchStatistics::compute(&records, Utc::now());

        assert_eq!(stats.total_matches, 4);
        assert_eq!(stats.successful_matches, 2);
        assert_eq!(stats.pending_matches, 1);
        assert_eq!(stats.match_rate, 50.0);
        assert_eq!(stats.recent_matches, 2);
    }

    #[test]
    fn test_mutual_pair_counts_once() {
        let records = vec![
            record("me", "a", MatchStatus::Pending, 2),
            record("a", "me", MatchStatus::Matched, 1),
        ];

        let stats = MatchStatistics::compute(&records, Utc::now());

        assert_eq!(stats.total_matches, 1);
        assert_eq!(stats.successful_matches, 1);
        assert_eq!(stats.pending_matches, 0);
        assert_eq!(stats.match_rate, 100.0);

        let kept = unique_pairs(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].user_id, "a");
    }

    #[test]
    fn test_statistics_without_records() {
        let stats = MatchStatistics::compute(&[], Utc::now());
        assert_eq!(stats, MatchStatistics::default());
    }

    #[test]
    fn test_counterpart_ids() {
        let records = vec![
            record("me", "a", MatchStatus::Matched, 1),
            record("b", "me", MatchStatus::Pending, 1),
        ];

        let ids = counterpart_ids(&records, "me");
        assert_eq!(ids, HashSet::from(["a".to_string(), "b".to_string()]));
    }
}
