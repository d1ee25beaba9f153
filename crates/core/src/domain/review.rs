use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub rating: i32,
    pub review_text: String,
    pub ai_response: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_recommended_actions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields of a review before storage has assigned `id` and `created_at`.
/// The generated fields stay optional in the schema even though the current
/// pipeline always fills them.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: i32,
    pub review_text: String,
    pub ai_response: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_recommended_actions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStatistics {
    pub total: i64,
    /// Count per rating value; only ratings that actually occur are present.
    pub rating_distribution: BTreeMap<i32, i64>,
}

impl ReviewStatistics {
    pub fn from_ratings<I: IntoIterator<Item = i32>>(ratings: I) -> Self {
        let mut total = 0;
        let mut rating_distribution = BTreeMap::new();
        for rating in ratings {
            total += 1;
            *rating_distribution.entry(rating).or_insert(0) += 1;
        }
        Self {
            total,
            rating_distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_counts_per_rating() {
        let stats = ReviewStatistics::from_ratings([5, 5, 3, 1]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.rating_distribution.get(&5), Some(&2));
        assert_eq!(stats.rating_distribution.get(&3), Some(&1));
        assert_eq!(stats.rating_distribution.get(&1), Some(&1));
        assert_eq!(stats.rating_distribution.get(&2), None);
    }

    #[test]
    fn empty_set_yields_zero_total_and_empty_distribution() {
        let stats = ReviewStatistics::from_ratings([]);
        assert_eq!(stats.total, 0);
        assert!(stats.rating_distribution.is_empty());
    }
}
