use crate::config::Settings;
use crate::domain::review::{NewReview, Review, ReviewStatistics};
use std::sync::Arc;

pub mod json_file;
pub mod memory;
pub mod postgres;

/// Persistence contract shared by all backends. Within one store instance,
/// ids are unique and strictly increasing in insertion order, listings are
/// newest-first, and statistics always agree with the listing.
#[async_trait::async_trait]
pub trait ReviewStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn insert_review(&self, new: NewReview) -> anyhow::Result<i64>;

    async fn list_reviews(&self) -> anyhow::Result<Vec<Review>>;

    async fn get_review(&self, id: i64) -> anyhow::Result<Option<Review>>;

    async fn statistics(&self) -> anyhow::Result<ReviewStatistics>;
}

/// Picks the backend once at startup: relational if DATABASE_URL is set,
/// file-persisted if DATABASE_PATH is set, in-memory otherwise.
pub async fn from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn ReviewStore>> {
    let store: Arc<dyn ReviewStore> = if let Some(db_url) = settings.database_url.as_deref() {
        Arc::new(postgres::PostgresReviewStore::connect(db_url).await?)
    } else if let Some(path) = settings.database_path.as_deref() {
        Arc::new(json_file::JsonFileReviewStore::open(path).await?)
    } else {
        // Explicit trade-off: without DATABASE_URL or DATABASE_PATH the
        // review set lives only as long as the process.
        Arc::new(memory::InMemoryReviewStore::new())
    };

    tracing::info!(backend = store.backend_name(), "storage backend selected");
    Ok(store)
}

/// Newest first; id breaks ties so same-instant inserts keep a total order.
pub(crate) fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Id assignment for the non-relational backends: max existing id plus one,
/// starting from 1 on an empty set.
pub(crate) fn next_review_id(reviews: &[Review]) -> i64 {
    reviews.iter().map(|r| r.id).max().unwrap_or(0) + 1
}
