//! Answer generation against the Gemini REST API.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use naaj_engine::RankedPlace;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const GENERATION_TIMEOUT_SECS: u64 = 60;

pub struct AnswerGenerator {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl AnswerGenerator {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(15))
            .timeout(std::time::Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for answer generation")?;
        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub async fn generate(&self, question: &str, places: &[RankedPlace]) -> Result<String> {
        let prompt = build_prompt(question, places);
        let request = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }]
        });

        let endpoint = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );
        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error ({}): {}", status, error));
        }

        let body = response.text().await?;
        // Gateways sometimes answer HTML under HTTP 200.
        if body.trim_start().starts_with('<') {
            return Err(anyhow!("Gemini returned HTML instead of JSON"));
        }
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Failed to parse Gemini response: {}", e))?;

        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow!("Gemini returned no candidates"))
    }
}

/// Prompt for the generation step. The model answers in the user's own
/// language; language detection stays out of this backend.
pub fn build_prompt(question: &str, places: &[RankedPlace]) -> String {
    let data = serde_json::to_string_pretty(places).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Eres Naaj, un asistente turístico inteligente, amable y culturalmente consciente.\n\
         Hablas TODOS los idiomas y SIEMPRE respondes en el mismo idioma que el usuario.\n\
         Tu especialidad es México, especialmente Campeche, su cultura, lugares turísticos y transporte.\n\
         \n\
         PREGUNTA DEL USUARIO:\n{question}\n\
         \n\
         DATOS RELEVANTES:\n{data}\n\
         \n\
         INSTRUCCIONES:\n\
         - Determina automáticamente el idioma del usuario y responde exclusivamente en ese idioma.\n\
         - Usa SOLO los datos proporcionados si aplican.\n\
         - Si el tema no aparece en los datos, responde con conocimiento general turístico.\n\
         - Da recomendaciones prácticas y fáciles de seguir.\n\
         - Si el usuario pide lugares cercanos, prioriza los que tengan 'distance_km'.\n\
         - Incluye el enlace de mapa ('map_link') de cada lugar que recomiendes.\n"
    )
}
