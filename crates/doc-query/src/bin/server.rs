//! Document query server binary
//!
//! Run with: cargo run -p doc-query --bin doc-query-server

use clap::Parser;
use doc_query::{
    config::{ConfigOverrides, RagConfig},
    credentials::{self, Credentials, PromptMode, TerminalPrompt},
    server::RagServer,
    AppState,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "doc-query-server",
    version,
    about = "Upload documents and ask questions about them"
)]
struct Args {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// Staging directory for uploaded files
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Directory holding the persisted index
    #[arg(long)]
    index_dir: Option<PathBuf>,

    /// Env file loaded before reading API keys
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Prompt on the terminal for missing API keys instead of exiting
    #[arg(long)]
    interactive: bool,

    /// Turn off verbose request logging
    #[arg(long)]
    no_debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = RagConfig::default().with_overrides(ConfigOverrides {
        host: args.host,
        port: args.port,
        upload_dir: args.upload_dir,
        index_dir: args.index_dir,
        debug: args.no_debug.then_some(false),
    });

    // Initialize tracing
    let default_filter = if config.server.debug {
        "doc_query=debug,tower_http=debug"
    } else {
        "doc_query=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    credentials::load_env_file(&args.env_file)?;

    let mode = if args.interactive {
        PromptMode::Interactive
    } else {
        PromptMode::FailFast
    };
    let credentials = Credentials::resolve(mode, &mut TerminalPrompt::new())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Staging directory: {}", config.storage.upload_dir.display());
    tracing::info!("  - Index directory: {}", config.storage.index_dir.display());

    let state = AppState::with_hosted_providers(config, &credentials)?;
    state.load_persisted_index();

    let server = RagServer::new(state);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload - Upload documents (multipart field `files`)");
    println!("  POST /query  - Ask a question ({{\"query\": \"...\"}})");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
