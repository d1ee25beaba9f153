use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reviewly_core::domain::review::{Review, ReviewStatistics};
use reviewly_core::domain::submission::ValidationError;
use reviewly_core::llm::gateway::GenerationGateway;
use reviewly_core::pipeline::ReviewPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = reviewly_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let store = reviewly_core::storage::from_settings(&settings).await?;
    let gateway = GenerationGateway::from_settings(&settings)?;
    let pipeline = Arc::new(ReviewPipeline::new(gateway, store));

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/reviews", post(submit_review).get(list_reviews))
        .route("/reviews/:id", get(get_review))
        .route("/statistics", get(get_statistics))
        .with_state(pipeline)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct SubmitReviewRequest {
    // Absent fields fall through to pipeline validation, so a missing
    // rating answers 400 with a reason instead of a bare extractor reject.
    #[serde(default)]
    rating: i32,
    #[serde(default)]
    review_text: String,
}

#[derive(Debug, Serialize)]
struct SubmitReviewResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    review_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ai_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SubmitReviewResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            review_id: None,
            ai_response: None,
            error: Some(error.into()),
        }
    }
}

async fn submit_review(
    State(pipeline): State<Arc<ReviewPipeline>>,
    Json(req): Json<SubmitReviewRequest>,
) -> (StatusCode, Json<SubmitReviewResponse>) {
    match pipeline.submit_review(req.rating, &req.review_text).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(SubmitReviewResponse {
                success: true,
                review_id: Some(receipt.review_id),
                ai_response: Some(receipt.ai_response),
                error: None,
            }),
        ),
        Err(err) => {
            if let Some(validation) = err.downcast_ref::<ValidationError>() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(SubmitReviewResponse::failure(validation.reason.clone())),
                );
            }

            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "review submission failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitReviewResponse::failure(
                    "Failed to process review. Please try again.",
                )),
            )
        }
    }
}

#[derive(Debug, Serialize)]
struct ReviewsResponse {
    reviews: Vec<Review>,
}

async fn list_reviews(
    State(pipeline): State<Arc<ReviewPipeline>>,
) -> Result<Json<ReviewsResponse>, StatusCode> {
    let reviews = pipeline.list_reviews().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "list reviews failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ReviewsResponse { reviews }))
}

async fn get_review(
    State(pipeline): State<Arc<ReviewPipeline>>,
    Path(id): Path<i64>,
) -> Result<Json<Review>, StatusCode> {
    let review = pipeline
        .get_review(id)
        .await
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "get review failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(review))
}

async fn get_statistics(
    State(pipeline): State<Arc<ReviewPipeline>>,
) -> Result<Json<ReviewStatistics>, StatusCode> {
    let statistics = pipeline.statistics().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "statistics failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(statistics))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &reviewly_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
