use crate::core::distance::{distance_km, distance_meters};
use crate::models::{Recommendation, UserProfile};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

/// Interest and age tallies over the profiles a user has matched with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationProfile {
    pub interest_counts: BTreeMap<String, usize>,
    pub age_counts: BTreeMap<u8, usize>,
}

impl RecommendationProfile {
    pub fn from_history<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = &'a UserProfile>,
    {
        let mut profile = Self::default();
        for matched in history {
            for interest in &matched.interests {
                *profile.interest_counts.entry(interest.clone()).or_default() += 1;
            }
            *profile.age_counts.entry(matched.age).or_default() += 1;
        }
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.age_counts.is_empty()
    }

    /// The `n` most frequent interests; ties resolve in tag order
    pub fn top_interests(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(&String, &usize)> = self.interest_counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        ranked.into_iter().take(n).map(|(tag, _)| tag.clone()).collect()
    }

    /// Most frequent age in the history; ties resolve to the younger age
    pub fn anchor_age(&self) -> Option<u8> {
        self.age_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(age, _)| *age)
    }
}

/// History-based recommendation heuristic.
///
/// Independent of the compatibility scorer: it favours candidates resembling
/// past matches rather than the requester's stated preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationStrategy {
    pub age_window: u8,
    pub top_interest_count: usize,
    pub limit: usize,
}

impl Default for RecommendationStrategy {
    fn default() -> Self {
        Self {
            age_window: 2,
            top_interest_count: 5,
            limit: 20,
        }
    }
}

impl RecommendationStrategy {
    pub fn recommend<'a>(
        &self,
        history: &RecommendationProfile,
        requester: &UserProfile,
        pool: &'a [UserProfile],
        exclude_ids: &HashSet<String>,
    ) -> Vec<Recommendation<'a>> {
        let Some(anchor) = history.anchor_age() else {
            return Vec::new();
        };
        let min_age = anchor.saturating_sub(self.age_window);
        let max_age = anchor.saturating_add(self.age_window);
        let top_interests: HashSet<String> =
            history.top_interests(self.top_interest_count).into_iter().collect();

        let mut recommendations: Vec<Recommendation<'a>> = pool
            .iter()
            .filter(|c| c.id != requester.id && !exclude_ids.contains(&c.id))
            .filter(|c| c.age >= min_age && c.age <= max_age)
            .filter_map(|candidate| {
                let distance_m = match (requester.location, candidate.location) {
                    (Some(a), Some(b)) => {
                        let meters = distance_meters(a.point(), b.point());
                        if meters / 1000.0 > requester.preferences.max_distance_km {
                            return None;
                        }
                        Some(meters)
                    }
                    // Located requesters only see located candidates
                    (Some(_), None) => return None,
                    _ => None,
                };

                let shared = candidate
                    .interests
                    .iter()
                    .filter(|i| top_interests.contains(*i))
                    .count();
                if shared == 0 {
                    return None;
                }

                let proximity = distance_m.map_or(0.0, |m| 1000.0 / (m + 1.0));

                Some(Recommendation {
                    profile: candidate,
                    match_score: 10.0 * shared as f64 + proximity,
                    distance_km: distance_m.map(|m| m / 1000.0),
                })
            })
            .collect();

        recommendations.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        recommendations.truncate(self.limit);
        recommendations
    }
}

/// Midnight UTC of the day containing `now`
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

/// Verified users in the requester's age range who were active today (UTC),
/// most recently active first
pub fn daily_suggestions<'a>(
    requester: &UserProfile,
    pool: &'a [UserProfile],
    now: DateTime<Utc>,
    count: usize,
) -> Vec<Recommendation<'a>> {
    let start_of_day = start_of_utc_day(now);

    let mut suggestions: Vec<&'a UserProfile> = pool
        .iter()
        .filter(|c| c.id != requester.id)
        .filter(|c| requester.preferences.accepts_age(c.age))
        .filter(|c| c.is_verified)
        .filter(|c| c.last_active.is_some_and(|t| t >= start_of_day))
        .collect();

    suggestions.sort_by(|a, b| b.last_active.cmp(&a.last_active));

    suggestions
        .into_iter()
        .take(count)
        .map(|candidate| Recommendation {
            profile: candidate,
            match_score: 0.0,
            distance_km: match (requester.location, candidate.location) {
                (Some(a), Some(b)) => Some(distance_km(a.point(), b.point())),
                _ => None,
            },
        })
        .collect()
}
