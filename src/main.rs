use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;

use docqa_core::{EmbeddingProvider, LLMProvider, RAGEngine};
use docqa_openai::OpenAiClient;
use docqa_rag::EphemeralRAGEngine;
use docqa_web::AppState;

#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Answer questions about a pasted document", long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "DOCQA_BIND", default_value = "127.0.0.1:8000")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let client = Arc::new(OpenAiClient::from_env().context("failed to configure OpenAI client")?);
    if client.config().api_key.is_none() {
        log::warn!("OPENAI_API_KEY is not set; every question will fail until it is");
    }
    log::info!(
        "using {} for answers and {} for embeddings",
        LLMProvider::model_id(client.as_ref()),
        EmbeddingProvider::model_id(client.as_ref())
    );

    let engine: Arc<dyn RAGEngine> = Arc::new(EphemeralRAGEngine::new(client.clone(), client));
    let app = docqa_web::router(AppState::new(engine));

    let listener = TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    log::info!("docqa listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
