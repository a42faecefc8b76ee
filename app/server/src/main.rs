//! Naaj backend entry point: config, corpus, engine, HTTP surface.

mod llm;
mod server;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use naaj_engine::places::GooglePlaces;
use naaj_engine::{CorpusStore, EngineConfig, RetrievalEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match std::env::var("NAAJ_CONFIG") {
        Ok(path) => {
            EngineConfig::from_file(Path::new(&path)).map_err(|e| anyhow::anyhow!(e))?
        }
        Err(_) => EngineConfig::default(),
    };

    // A missing corpus is not fatal: retrieval degrades to external-only.
    let corpus = match CorpusStore::load_from_file(&config.corpus_path()) {
        Ok(store) => store,
        Err(err) => {
            tracing::warn!(error = %err, "corpus unavailable, starting with an empty dataset");
            CorpusStore::empty()
        }
    };

    let places_key = std::env::var("GOOGLE_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("GOOGLE_API_KEY is not set; external search will return no results");
        String::new()
    });
    let provider = Arc::new(GooglePlaces::new(places_key, config.provider.timeout_secs)?);

    let engine = RetrievalEngine::new(config, corpus, provider);

    let generator = match std::env::var("GEMINI_API_KEY") {
        Ok(key) => Some(llm::AnswerGenerator::new(key)?),
        Err(_) => {
            tracing::warn!("GEMINI_API_KEY is not set; answers fall back to the retrieved data");
            None
        }
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    server::serve(engine, generator, port).await
}
