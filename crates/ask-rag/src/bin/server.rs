//! RAG Server binary
//!
//! Run with: cargo run -p ask-rag --bin ask-rag-server -- --data-dir data

use std::path::PathBuf;

use anyhow::Context;
use ask_rag::{
    config::RagConfig, ingestion::IndexBuilder, providers::Providers, server::RagServer, RagChain,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Answer questions over a folder of text files
#[derive(Debug, Parser)]
#[command(name = "ask-rag-server", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of .txt files to index
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

impl Args {
    /// Overwrite config values with the flags that were given
    fn apply(self, config: &mut RagConfig) {
        if let Some(dir) = self.data_dir {
            config.data.dir = dir;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ask_rag=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration; flags win over file and environment
    let mut config = RagConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Backend: {}", config.backend.as_str());
    tracing::info!("  - Data directory: {}", config.data.dir.display());
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Top k: {}", config.retrieval.top_k);

    let providers = Providers::from_config(&config).await?;

    let builder = IndexBuilder::from_config(&config);
    tracing::info!("Indexing {}...", builder.data_dir().display());
    let index = builder
        .build(providers.embedder.as_ref())
        .await
        .with_context(|| format!("Failed to build index from {}", builder.data_dir().display()))?;

    tracing::info!(
        "Indexed {} chunks from {} documents",
        index.len(),
        index.documents().len()
    );

    let chain = RagChain::from_config(&config, providers, index)?;
    let server = RagServer::new(config, chain);

    println!("\nServer starting...");
    println!("  Ask:    POST http://{}/ask", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  Info:   http://{}/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
