//! Loading quiz configuration (prompts + optional extra fallback questions) from TOML.
//!
//! See `QuizConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub fallback: Vec<FallbackQuestionCfg>,
}

/// Canned question accepted in TOML configuration, added to the fallback bank under `subject`.
#[derive(Clone, Debug, Deserialize)]
pub struct FallbackQuestionCfg {
  pub subject: String,
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: String,
}

/// Prompts sent to the generation services.
/// `question_user_template` understands `{count}`, `{subject}` and `{difficulty}`.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub question_system: String,
  pub question_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      question_system: "You are a quiz author. Respond ONLY with strict JSON, no commentary.".into(),
      question_user_template: "Generate exactly {count} multiple-choice questions about {subject} at {difficulty} difficulty. \
Each question must have exactly 4 distinct options and exactly one correct answer. \
Return a JSON object of the form {\"questions\": [{\"question\": string, \"options\": [string, string, string, string], \"correctAnswer\": string}]} \
where correctAnswer is copied verbatim from options.".into(),
    }
  }
}

/// Parse a TOML document into `QuizConfig`.
pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "quiz_backend", %path, fallback_entries = cfg.fallback.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
