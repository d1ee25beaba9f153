use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reviewly_core::domain::submission::ValidationError;
use reviewly_core::llm::gateway::GenerationGateway;
use reviewly_core::pipeline::ReviewPipeline;

#[derive(Debug, Parser)]
#[command(name = "reviewly_cli")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest one review through the full generation + storage pipeline.
    Submit {
        /// Star rating, 1-5.
        #[arg(long)]
        rating: i32,

        /// Review body.
        #[arg(long)]
        text: String,
    },

    /// Print all stored reviews, newest first.
    List,

    /// Print a single review by id.
    Show {
        #[arg(long)]
        id: i64,
    },

    /// Print the review count and rating distribution.
    Stats,
}

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

    let args = Args::parse();

    let store = reviewly_core::storage::from_settings(&settings).await?;
    let gateway = GenerationGateway::from_settings(&settings)?;
    let pipeline = ReviewPipeline::new(gateway, store);

    match args.command {
        Command::Submit { rating, text } => match pipeline.submit_review(rating, &text).await {
            Ok(receipt) => {
                tracing::info!(review_id = receipt.review_id, "review ingested");
                println!("review_id: {}", receipt.review_id);
                println!("{}", receipt.ai_response);
            }
            Err(err) => {
                if let Some(validation) = err.downcast_ref::<ValidationError>() {
                    eprintln!("rejected: {}", validation.reason);
                    std::process::exit(2);
                }
                sentry_anyhow::capture_anyhow(&err);
                return Err(err);
            }
        },
        Command::List => {
            let reviews = pipeline.list_reviews().await?;
            println!("{}", serde_json::to_string_pretty(&reviews)?);
        }
        Command::Show { id } => match pipeline.get_review(id).await? {
            Some(review) => println!("{}", serde_json::to_string_pretty(&review)?),
            None => {
                eprintln!("no review with id {id}");
                std::process::exit(1);
            }
        },
        Command::Stats => {
            let stats = pipeline.statistics().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
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
