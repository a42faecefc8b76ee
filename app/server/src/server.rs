//! HTTP surface: request validation, retrieval, answer shaping.

use axum::{
    extract::State as AxumState,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use naaj_engine::{Coordinates, RankedPlace, RetrievalEngine, Turn};

use crate::llm::AnswerGenerator;

const GENERATION_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
struct AppState {
    engine: Arc<RetrievalEngine>,
    generator: Option<Arc<AnswerGenerator>>,
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    #[serde(default)]
    history: Vec<HistoryTurn>,
}

#[derive(Debug, Deserialize)]
struct HistoryTurn {
    text: String,
    is_user: bool,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    question: String,
    retrieved_data: Vec<RankedPlace>,
    answer: String,
}

async fn handle_ask(
    AxumState(state): AxumState<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let question = payload
        .question
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    // Malformed input never reaches the engine.
    if question.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Se requiere una pregunta.".to_string()));
    }

    let coordinates = match (payload.lat, payload.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };
    let history: Vec<Turn> = payload
        .history
        .into_iter()
        .map(|t| Turn { text: t.text, is_user: t.is_user })
        .collect();

    let retrieved = state.engine.retrieve(&question, &history, coordinates).await;

    let answer = match &state.generator {
        Some(generator) => {
            let generation = generator.generate(&question, &retrieved);
            match tokio::time::timeout(
                std::time::Duration::from_secs(GENERATION_TIMEOUT_SECS),
                generation,
            )
            .await
            {
                Ok(Ok(text)) => text,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "answer generation failed");
                    fallback_answer(&retrieved)
                }
                Err(_) => {
                    tracing::warn!("answer generation timed out");
                    fallback_answer(&retrieved)
                }
            }
        }
        None => fallback_answer(&retrieved),
    };

    Ok(Json(AskResponse { question, retrieved_data: retrieved, answer }))
}

/// The chat caller always gets an answer path, even when generation is
/// down: list what retrieval found, or apologize.
fn fallback_answer(retrieved: &[RankedPlace]) -> String {
    if retrieved.is_empty() {
        return "Lo siento, por ahora no pude encontrar lugares para tu pregunta. \
                ¿Puedes intentarlo de nuevo con otras palabras?"
            .to_string();
    }
    let names: Vec<&str> = retrieved.iter().map(|p| p.name.as_str()).collect();
    format!("Esto es lo que encontré: {}.", names.join(", "))
}

async fn health_check() -> &'static str {
    "Naaj API is running"
}

pub async fn serve(
    engine: RetrievalEngine,
    generator: Option<AnswerGenerator>,
    port: u16,
) -> anyhow::Result<()> {
    let state = AppState {
        engine: Arc::new(engine),
        generator: generator.map(Arc::new),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(health_check))
        .route("/naaj", post(handle_ask))
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Naaj API listening on http://{}/naaj", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use naaj_engine::places::GooglePlaces;
    use naaj_engine::{CorpusStore, EngineConfig, Provenance};

    fn state() -> AppState {
        let provider = Arc::new(GooglePlaces::new("", 1).unwrap());
        let engine =
            RetrievalEngine::new(EngineConfig::default(), CorpusStore::empty(), provider);
        AppState { engine: Arc::new(engine), generator: None }
    }

    #[tokio::test]
    async fn test_missing_question_rejected_before_engine() {
        let request = AskRequest { question: None, lat: None, lng: None, history: Vec::new() };
        let result = handle_ask(AxumState(state()), Json(request)).await;
        let (status, _) = result.err().expect("expected rejection");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let request = AskRequest {
            question: Some("   ".into()),
            lat: None,
            lng: None,
            history: Vec::new(),
        };
        let result = handle_ask(AxumState(state()), Json(request)).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_answer_lists_findings() {
        let place = RankedPlace {
            name: "La Pigua".into(),
            category: String::new(),
            address: String::new(),
            coordinates: None,
            map_link: "https://maps.example/pigua".into(),
            distance_km: None,
            provenance: Provenance::LocalCorpus,
            rating: None,
            open_now: None,
            reviews: Vec::new(),
        };
        assert!(fallback_answer(&[place]).contains("La Pigua"));
        assert!(fallback_answer(&[]).contains("Lo siento"));
    }
}
