use crate::domain::review::{NewReview, Review, ReviewStatistics};
use crate::storage::ReviewStore;
use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeMap;

type ReviewRow = (
    i64,
    i32,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
);

/// Relational backend. Id assignment and the rating range check live in the
/// schema; ordering and aggregation are done server-side.
#[derive(Debug, Clone)]
pub struct PostgresReviewStore {
    pool: PgPool,
}

impl PostgresReviewStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("connect DATABASE_URL failed")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("sqlx migrations failed")?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_into_review(row: ReviewRow) -> Review {
    let (id, rating, review_text, ai_response, ai_summary, ai_recommended_actions, created_at) =
        row;
    Review {
        id,
        rating,
        review_text,
        ai_response,
        ai_summary,
        ai_recommended_actions,
        created_at,
    }
}

#[async_trait::async_trait]
impl ReviewStore for PostgresReviewStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert_review(&self, new: NewReview) -> anyhow::Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO reviews (rating, review_text, ai_response, ai_summary, ai_recommended_actions) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(new.rating)
        .bind(&new.review_text)
        .bind(&new.ai_response)
        .bind(&new.ai_summary)
        .bind(&new.ai_recommended_actions)
        .fetch_one(&self.pool)
        .await
        .context("insert reviews failed")?;

        Ok(id)
    }

    async fn list_reviews(&self) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, rating, review_text, ai_response, ai_summary, ai_recommended_actions, created_at \
             FROM reviews \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("list reviews failed")?;

        Ok(rows.into_iter().map(row_into_review).collect())
    }

    async fn get_review(&self, id: i64) -> anyhow::Result<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, rating, review_text, ai_response, ai_summary, ai_recommended_actions, created_at \
             FROM reviews \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("get review failed")?;

        Ok(row.map(row_into_review))
    }

    async fn statistics(&self) -> anyhow::Result<ReviewStatistics> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await
            .context("count reviews failed")?;

        let rows = sqlx::query_as::<_, (i32, i64)>(
            "SELECT rating, COUNT(*) FROM reviews GROUP BY rating",
        )
        .fetch_all(&self.pool)
        .await
        .context("aggregate ratings failed")?;

        let rating_distribution: BTreeMap<i32, i64> = rows.into_iter().collect();

        Ok(ReviewStatistics {
            total,
            rating_distribution,
        })
    }
}
