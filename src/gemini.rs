//! Google Generative Language (Gemini) client: `models/{model}:generateContent`.
//!
//! Same shape as the OpenAI client: one JSON request, text out, usage + latency logged, key never logged.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::GenerationError;
use crate::generator::{extract_api_error, TextGenerator};

#[derive(Clone)]
pub struct GeminiClient {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl GeminiClient {
  /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into());
    Self::new(api_key, base_url, model)
  }

  pub fn new(api_key: String, base_url: String, model: String) -> Option<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;
    let base_url = base_url.trim_end_matches('/').to_string();
    Some(Self { client, api_key, base_url, model, temperature: 0.7 })
  }

  fn build_request(&self, system: &str, user: &str) -> GenerateContentRequest {
    GenerateContentRequest {
      system_instruction: (!system.is_empty()).then(|| Content { role: None, parts: vec![Part { text: system.into() }] }),
      contents: vec![Content { role: Some("user".into()), parts: vec![Part { text: user.into() }] }],
      generation_config: GenerationConfig {
        temperature: self.temperature,
        response_mime_type: "application/json".into(),
      },
    }
  }
}

#[async_trait]
impl TextGenerator for GeminiClient {
  fn name(&self) -> String {
    format!("gemini:{}", self.model)
  }

  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model, prompt_len = user.len()))]
  async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError> {
    let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
    let req = self.build_request(system, user);

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "quiz-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-goog-api-key", self.api_key.as_str())
      .json(&req).send().await.map_err(|e| GenerationError::Http(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_api_error(&body).unwrap_or(body);
      warn!(%status, elapsed = ?start.elapsed(), "Gemini returned an error status");
      return Err(GenerationError::Api(format!("Gemini HTTP {}: {}", status, msg)));
    }

    let raw = res.text().await.map_err(|e| GenerationError::Http(e.to_string()))?;
    let body: GenerateContentResponse = serde_json::from_str(&raw)?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }
    let text = body.text();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Gemini response received");
    if text.is_empty() {
      return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
  }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
  #[serde(skip_serializing_if = "Option::is_none")]
  system_instruction: Option<Content>,
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
  #[serde(default)]
  text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  temperature: f32,
  response_mime_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default)]
  usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
  /// Concatenated text parts of the first candidate.
  fn text(&self) -> String {
    self.candidates.first()
      .and_then(|c| c.content.as_ref())
      .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<String>())
      .unwrap_or_default()
      .trim()
      .to_string()
  }
}

#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}
