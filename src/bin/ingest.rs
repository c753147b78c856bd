//! Ingestion binary
//!
//! Run with: cargo run --bin newsroom-ingest -- --samples 10

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsroom_rag::app::AppContext;
use newsroom_rag::config::AppConfig;
use newsroom_rag::ingest::{GcsArticleSource, IngestPipeline};

#[derive(Parser)]
#[command(
    name = "newsroom-ingest",
    about = "Sample, enrich and index news articles"
)]
struct Args {
    /// TOML config file; environment variables override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of articles to ingest
    #[arg(long, default_value_t = 10)]
    samples: usize,

    /// Keep only articles strictly under this many words
    #[arg(long, default_value_t = 1000)]
    max_words: usize,

    /// Sampling seed; the same seed reproduces the same rows
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsroom_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env(),
    };

    let context = AppContext::from_config(config).await?;
    let source = GcsArticleSource::connect(
        &context.config.gcp.service_account_key_path,
        &context.config.gcp.bucket,
        &context.config.source.object,
    )
    .await?;

    let pipeline = IngestPipeline::from_context(&context, Arc::new(source));
    let report = pipeline
        .run(args.samples, Some(args.max_words), args.seed)
        .await?;

    println!(
        "Ingested {} of {} sampled articles ({} skipped, {} index upserts failed)",
        report.stored, report.sampled, report.skipped, report.vector_upserts_failed
    );
    Ok(())
}
