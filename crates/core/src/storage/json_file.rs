use crate::domain::review::{NewReview, Review, ReviewStatistics};
use crate::storage::{next_review_id, sort_newest_first, ReviewStore};
use anyhow::Context;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Whole-set JSON persistence: the full review array lives in one file and
/// every insert is a read-modify-write-serialize cycle. All file access runs
/// under `io`, so two concurrent inserts cannot read the same max id.
pub struct JsonFileReviewStore {
    path: PathBuf,
    io: Mutex<()>,
}

impl JsonFileReviewStore {
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        if tokio::fs::metadata(&path).await.is_err() {
            tokio::fs::write(&path, b"[]")
                .await
                .with_context(|| format!("failed to initialize {}", path.display()))?;
        }

        Ok(Self {
            path,
            io: Mutex::new(()),
        })
    }

    /// Missing or unreadable content loads as the empty set; the next write
    /// starts the file over.
    async fn load(&self) -> Vec<Review> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "review file unreadable; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Review>>(&bytes) {
            Ok(reviews) => reviews,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "review file corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    async fn persist(&self, reviews: &[Review]) -> anyhow::Result<()> {
        let bytes =
            serde_json::to_vec_pretty(reviews).context("failed to serialize review set")?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[async_trait::async_trait]
impl ReviewStore for JsonFileReviewStore {
    fn backend_name(&self) -> &'static str {
        "json_file"
    }

    async fn insert_review(&self, new: NewReview) -> anyhow::Result<i64> {
        let _guard = self.io.lock().await;

        let mut reviews = self.load().await;
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
        self.persist(&reviews).await?;
        Ok(id)
    }

    async fn list_reviews(&self) -> anyhow::Result<Vec<Review>> {
        let _guard = self.io.lock().await;

        let mut reviews = self.load().await;
        sort_newest_first(&mut reviews);
        Ok(reviews)
    }

    async fn get_review(&self, id: i64) -> anyhow::Result<Option<Review>> {
        let _guard = self.io.lock().await;

        let reviews = self.load().await;
        Ok(reviews.into_iter().find(|r| r.id == id))
    }

    async fn statistics(&self) -> anyhow::Result<ReviewStatistics> {
        let _guard = self.io.lock().await;

        let reviews = self.load().await;
        Ok(ReviewStatistics::from_ratings(
            reviews.iter().map(|r| r.rating),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_review(rating: i32, text: &str) -> NewReview {
        NewReview {
            rating,
            review_text: text.to_string(),
            ai_response: Some("thanks".to_string()),
            ai_summary: Some("summary".to_string()),
            ai_recommended_actions: Some("- act".to_string()),
        }
    }

    #[tokio::test]
    async fn open_initializes_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        let store = JsonFileReviewStore::open(&path).await.unwrap();

        assert_eq!(store.list_reviews().await.unwrap().len(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/db/reviews.json");
        JsonFileReviewStore::open(&path).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn reviews_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");

        let id = {
            let store = JsonFileReviewStore::open(&path).await.unwrap();
            store.insert_review(new_review(4, "keeps")).await.unwrap()
        };

        let reopened = JsonFileReviewStore::open(&path).await.unwrap();
        let review = reopened.get_review(id).await.unwrap().unwrap();
        assert_eq!(review.review_text, "keeps");
        assert_eq!(review.rating, 4);
    }

    #[tokio::test]
    async fn id_is_max_plus_one_over_the_stored_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        let store = JsonFileReviewStore::open(&path).await.unwrap();

        let a = store.insert_review(new_review(1, "a")).await.unwrap();
        let b = store.insert_review(new_review(2, "b")).await.unwrap();
        assert_eq!((a, b), (1, 2));

        // A reopened store continues the sequence from the file contents.
        let reopened = JsonFileReviewStore::open(&path).await.unwrap();
        let c = reopened.insert_review(new_review(3, "c")).await.unwrap();
        assert_eq!(c, 3);
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileReviewStore::open(&path).await.unwrap();
        assert_eq!(store.list_reviews().await.unwrap().len(), 0);

        // The first insert starts the set over from id 1.
        let id = store.insert_review(new_review(5, "fresh")).await.unwrap();
        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn listing_is_newest_first_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        let store = JsonFileReviewStore::open(&path).await.unwrap();

        for i in 1..=3 {
            store.insert_review(new_review(3, &format!("r{i}"))).await.unwrap();
        }

        let listed = store.list_reviews().await.unwrap();
        let texts: Vec<_> = listed.iter().map(|r| r.review_text.as_str()).collect();
        assert_eq!(texts, vec!["r3", "r2", "r1"]);
    }

    #[tokio::test]
    async fn concurrent_inserts_never_share_an_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        let store = std::sync::Arc::new(JsonFileReviewStore::open(&path).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert_review(new_review(3, &format!("c{i}"))).await.unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[tokio::test]
    async fn statistics_match_the_listing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        let store = JsonFileReviewStore::open(&path).await.unwrap();

        for rating in [5, 5, 3, 1] {
            store.insert_review(new_review(rating, "x")).await.unwrap();
        }

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.rating_distribution.get(&5), Some(&2));
        assert_eq!(stats.rating_distribution.get(&3), Some(&1));
        assert_eq!(stats.rating_distribution.get(&1), Some(&1));
    }
}
