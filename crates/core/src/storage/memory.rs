use crate::domain::review::{NewReview, Review, ReviewStatistics};
use crate::storage::{next_review_id, sort_newest_first, ReviewStore};
use chrono::Utc;
use tokio::sync::Mutex;

/// Process-lifetime store for when no persistent backend is configured.
/// Losing the data on restart is the accepted trade-off of this mode.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    reviews: Mutex<Vec<Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ReviewStore for InMemoryReviewStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert_review(&self, new: NewReview) -> anyhow::Result<i64> {
        let mut reviews = self.reviews.lock().await;
        let id = next_review_id(&reviews);
        reviews.push(Review {
            id,
            rating: new.rating,
            review_text: new.review_text,
            ai_response: new.ai_response,
            ai_summary: new.ai_summary,
            ai_recommended_actions: new.ai_recommended_actions,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_reviews(&self) -> anyhow::Result<Vec<Review>> {
        let reviews = self.reviews.lock().await;
        let mut out = reviews.clone();
        sort_newest_first(&mut out);
        Ok(out)
    }

    async fn get_review(&self, id: i64) -> anyhow::Result<Option<Review>> {
        let reviews = self.reviews.lock().await;
        Ok(reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn statistics(&self) -> anyhow::Result<ReviewStatistics> {
        let reviews = self.reviews.lock().await;
        Ok(ReviewStatistics::from_ratings(
            reviews.iter().map(|r| r.rating),
        ))
    }
}
