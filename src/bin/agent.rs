//! Interactive agent binary
//!
//! Run with: cargo run --bin newsroom-agent

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsroom_rag::agent::NewsAgent;
use newsroom_rag::app::AppContext;
use newsroom_rag::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "newsroom-agent",
    about = "Ask questions over the ingested news archive"
)]
struct Args {
    /// TOML config file; environment variables override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Neighbors to request per query
    #[arg(long, default_value_t = NewsAgent::DEFAULT_TOP_K)]
    top_k: usize,
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
    let agent = NewsAgent::from_context(&context, args.top_k)?;

    println!("News agent ready. Ask a question, or type 'quit' to exit.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("quit") || question.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = agent.answer(question).await;
        println!("\n{reply}\n");
    }
    Ok(())
}
