use crate::domain::review::{NewReview, Review, ReviewStatistics};
use crate::domain::submission::ReviewSubmission;
use crate::llm::gateway::GenerationGateway;
use crate::llm::prompts;
use crate::storage::ReviewStore;
use anyhow::Context;
use std::sync::Arc;

/// Write-path result: the stored id plus the customer-facing reply. Summary
/// and recommended actions are only visible through the read paths.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub review_id: i64,
    pub ai_response: String,
}

/// Validates a submission, runs the three generators as a join, persists the
/// composed review, and answers with a receipt. Constructed once at startup
/// with the chosen store injected.
pub struct ReviewPipeline {
    gateway: GenerationGateway,
    store: Arc<dyn ReviewStore>,
}

impl ReviewPipeline {
    pub fn new(gateway: GenerationGateway, store: Arc<dyn ReviewStore>) -> Self {
        Self { gateway, store }
    }

    pub async fn submit_review(
        &self,
        rating: i32,
        review_text: &str,
    ) -> anyhow::Result<SubmitReceipt> {
        let validated = ReviewSubmission {
            rating,
            review_text: review_text.to_string(),
        }
        .validate()?;

        // All three settle before anything is persisted; none of them can
        // fail outright, only degrade to the gateway's canned text.
        let (response, summary, actions) = tokio::join!(
            prompts::generate_user_response(&self.gateway, validated.rating, &validated.review_text),
            prompts::generate_summary(&self.gateway, validated.rating, &validated.review_text),
            prompts::generate_recommended_actions(
                &self.gateway,
                validated.rating,
                &validated.review_text
            ),
        );

        let review_id = self
            .store
            .insert_review(NewReview {
                rating: validated.rating,
                review_text: validated.review_text,
                ai_response: Some(response.clone()),
                ai_summary: Some(summary),
                ai_recommended_actions: Some(actions),
            })
            .await
            .context("persist review failed")?;

        tracing::info!(review_id, rating = validated.rating, "review ingested");

        Ok(SubmitReceipt {
            review_id,
            ai_response: response,
        })
    }

    pub async fn list_reviews(&self) -> anyhow::Result<Vec<Review>> {
        self.store.list_reviews().await
    }

    pub async fn get_review(&self, id: i64) -> anyhow::Result<Option<Review>> {
        self.store.get_review(id).await
    }

    pub async fn statistics(&self) -> anyhow::Result<ReviewStatistics> {
        self.store.statistics().await
    }
}
