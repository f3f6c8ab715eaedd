//! Application state: the question provider with its generation stages and fallback bank.
//!
//! Built once at startup and shared read-only across requests.
//! Stage order is fixed: Gemini (if GEMINI_API_KEY) first, then the OpenAI-compatible
//! service (if OPENAI_API_KEY). With neither key, every request is served from the fallback bank.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::load_quiz_config_from_env;
use crate::gemini::GeminiClient;
use crate::openai::OpenAI;
use crate::provider::QuestionProvider;
use crate::seeds::FallbackBank;

#[derive(Clone)]
pub struct AppState {
    pub provider: QuestionProvider,
}

impl AppState {
    /// Build state from env: load config, build the fallback bank, init generation clients.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        // Load TOML config if provided (prompts + optional extra fallback questions).
        let cfg = load_quiz_config_from_env().unwrap_or_default();

        let bank = FallbackBank::new(&cfg.fallback);
        for (subject, count) in bank.inventory() {
            info!(target: "questions", %subject, count, "Startup fallback inventory");
        }

        let mut provider = QuestionProvider::new(cfg.prompts, bank);

        if let Some(gemini) = GeminiClient::from_env() {
            info!(target: "quiz_backend", base_url = %gemini.base_url, model = %gemini.model, "Gemini enabled.");
            provider = provider.with_generator(Arc::new(gemini));
        } else {
            info!(target: "quiz_backend", "Gemini disabled (no GEMINI_API_KEY).");
        }

        if let Some(oa) = OpenAI::from_env() {
            info!(target: "quiz_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
            provider = provider.with_generator(Arc::new(oa));
        } else {
            info!(target: "quiz_backend", "OpenAI disabled (no OPENAI_API_KEY).");
        }

        if provider.stages().is_empty() {
            warn!(target: "quiz_backend", "No generation service configured. Using fallback questions only.");
        }

        Self { provider }
    }

    pub fn with_provider(provider: QuestionProvider) -> Self {
        Self { provider }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
