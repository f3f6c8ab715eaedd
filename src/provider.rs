//! Question provider: ordered generation stages with a canned fallback at the end.
//!
//! Each stage gets one attempt. Transport errors, API errors, unparsable text and batches with no
//! usable question all demote the stage to "failed" and the next one is tried. When every stage has
//! failed, the fallback bank answers. The caller always gets a non-empty list.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Prompts;
use crate::domain::{Question, QuestionSource};
use crate::error::GenerationError;
use crate::generator::TextGenerator;
use crate::seeds::FallbackBank;
use crate::util::{fill_template, strip_code_fences, trunc_for_log};

/// One generation stage: a text generator plus the source tag its results carry.
#[derive(Clone)]
pub struct Stage {
  pub source: QuestionSource,
  pub generator: Arc<dyn TextGenerator>,
}

#[derive(Clone)]
pub struct QuestionProvider {
  stages: Vec<Stage>,
  prompts: Prompts,
  fallback: FallbackBank,
}

#[derive(Deserialize)]
struct GeneratedBatch {
  #[serde(default)]
  questions: Vec<serde_json::Value>,
}

impl QuestionProvider {
  pub fn new(prompts: Prompts, fallback: FallbackBank) -> Self {
    Self { stages: Vec::new(), prompts, fallback }
  }

  /// Append a stage. The first one added is tagged primary, the second secondary.
  /// Further generators are tried in order and reported as secondary.
  pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
    let source = if self.stages.is_empty() {
      QuestionSource::PrimaryService
    } else {
      QuestionSource::SecondaryService
    };
    self.stages.push(Stage { source, generator });
    self
  }

  pub fn stages(&self) -> &[Stage] {
    &self.stages
  }

  pub fn build_prompt(&self, subject: &str, difficulty: &str, count: usize) -> String {
    let count = count.to_string();
    fill_template(
      &self.prompts.question_user_template,
      &[("count", count.as_str()), ("subject", subject), ("difficulty", difficulty)],
    )
  }

  /// Never fails: returns at least one question and the source that produced them.
  #[instrument(level = "info", skip(self), fields(stages = self.stages.len()))]
  pub async fn generate_questions(
    &self,
    subject: &str,
    difficulty: &str,
    count: usize,
  ) -> (Vec<Question>, QuestionSource) {
    let count = count.max(1);
    let prompt = self.build_prompt(subject, difficulty, count);

    for stage in &self.stages {
      let name = stage.generator.name();
      match self.run_stage(stage, &prompt, count).await {
        Ok(questions) => {
          info!(target: "questions", %subject, %difficulty, generator = %name, source = %stage.source, served = questions.len(), "Generated questions");
          return (questions, stage.source);
        }
        Err(e) => {
          error!(target: "questions", %subject, %difficulty, generator = %name, source = %stage.source, error = %e, "Generation stage failed; falling through");
        }
      }
    }

    if self.stages.is_empty() {
      warn!(target: "questions", %subject, "No generation service configured; serving fallback questions");
    }
    let questions = self.fallback.questions_for(subject, count);
    warn!(target: "questions", %subject, %difficulty, served = questions.len(), source = %QuestionSource::Fallback, "Serving fallback questions");
    (questions, QuestionSource::Fallback)
  }

  async fn run_stage(&self, stage: &Stage, prompt: &str, count: usize) -> Result<Vec<Question>, GenerationError> {
    let raw = stage.generator.generate(&self.prompts.question_system, prompt).await?;
    debug!(target: "questions", preview = %trunc_for_log(&raw, 200), "Raw generation output");
    parse_questions(&raw, count)
  }
}

/// Parse model output into at most `count` well-formed questions.
///
/// Accepts an optional markdown fence around the JSON. Fails when the text is not JSON, has no
/// `questions` array, or none of its entries is a well-formed question.
pub fn parse_questions(raw: &str, count: usize) -> Result<Vec<Question>, GenerationError> {
  let body = strip_code_fences(raw);
  if body.is_empty() {
    return Err(GenerationError::EmptyResponse);
  }
  let batch: GeneratedBatch = serde_json::from_str(body)?;
  let total = batch.questions.len();

  let questions: Vec<Question> = batch
    .questions
    .into_iter()
    .filter_map(|v| serde_json::from_value::<Question>(v).ok())
    .filter(Question::is_well_formed)
    .take(count)
    .collect();

  if questions.len() < total.min(count) {
    debug!(target: "questions", total, kept = questions.len(), "Dropped malformed generated questions");
  }
  if questions.is_empty() {
    return Err(GenerationError::NoQuestions);
  }
  Ok(questions)
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  /// Generator that replays a fixed outcome and counts calls.
  pub(crate) struct Scripted {
    pub outcome: Result<String, String>,
    pub calls: AtomicUsize,
  }

  impl Scripted {
    pub(crate) fn ok(text: &str) -> Arc<Self> {
      Arc::new(Self { outcome: Ok(text.to_string()), calls: AtomicUsize::new(0) })
    }
    pub(crate) fn failing(msg: &str) -> Arc<Self> {
      Arc::new(Self { outcome: Err(msg.to_string()), calls: AtomicUsize::new(0) })
    }
  }

  #[async_trait]
  impl TextGenerator for Scripted {
    fn name(&self) -> String {
      "scripted".into()
    }

    async fn generate(&self, _system: &str, _user: &str) -> Result<String, GenerationError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.outcome.clone().map_err(GenerationError::Http)
    }
  }

  pub(crate) fn batch_json(n: usize) -> String {
    let qs: Vec<serde_json::Value> = (0..n)
      .map(|i| {
        serde_json::json!({
          "question": format!("Question {i}?"),
          "options": ["alpha", "beta", "gamma", "delta"],
          "correctAnswer": "gamma",
        })
      })
      .collect();
    serde_json::json!({ "questions": qs }).to_string()
  }

  fn provider() -> QuestionProvider {
    QuestionProvider::new(Prompts::default(), FallbackBank::default())
  }

  #[test]
  fn prompt_mentions_count_subject_and_difficulty() {
    let p = provider().build_prompt("History", "Easy", 3);
    assert!(p.contains("exactly 3"));
    assert!(p.contains("History"));
    assert!(p.contains("Easy"));
  }

  #[test]
  fn parse_accepts_fenced_json_and_truncates() {
    let raw = format!("```json\n{}\n```", batch_json(5));
    let qs = parse_questions(&raw, 3).expect("parse");
    assert_eq!(qs.len(), 3);
    assert!(qs.iter().all(Question::is_well_formed));
  }

  #[test]
  fn parse_rejects_garbage_and_missing_array() {
    assert!(matches!(parse_questions("not json at all", 5), Err(GenerationError::Parse(_))));
    assert!(matches!(parse_questions("{\"items\": []}", 5), Err(GenerationError::NoQuestions)));
    assert!(matches!(parse_questions("{\"questions\": []}", 5), Err(GenerationError::NoQuestions)));
    assert!(matches!(parse_questions("```\n```", 5), Err(GenerationError::EmptyResponse)));
  }

  #[test]
  fn parse_drops_malformed_entries() {
    let raw = r#"{"questions": [
      {"question": "ok?", "options": ["a", "b", "c", "d"], "correctAnswer": "d"},
      {"question": "bad answer", "options": ["a", "b", "c", "d"], "correctAnswer": "e"},
      {"question": "three options", "options": ["a", "b", "c"], "correctAnswer": "a"},
      {"text": "wrong shape"}
    ]}"#;
    let qs = parse_questions(raw, 10).expect("parse");
    assert_eq!(qs.len(), 1);
    assert_eq!(qs[0].question, "ok?");
  }

  #[tokio::test]
  async fn primary_success_is_tagged_primary() {
    let primary = Scripted::ok(&batch_json(4));
    let secondary = Scripted::ok(&batch_json(4));
    let p = provider().with_generator(primary.clone()).with_generator(secondary.clone());

    let (qs, source) = p.generate_questions("Science", "Medium", 4).await;
    assert_eq!(qs.len(), 4);
    assert_eq!(source, QuestionSource::PrimaryService);
    assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn primary_failure_falls_through_to_secondary_once() {
    let primary = Scripted::failing("connection refused");
    let secondary = Scripted::ok(&format!("```json\n{}\n```", batch_json(2)));
    let p = provider().with_generator(primary.clone()).with_generator(secondary.clone());

    let (qs, source) = p.generate_questions("Science", "Medium", 5).await;
    assert_eq!(qs.len(), 2);
    assert_eq!(source, QuestionSource::SecondaryService);
    assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn malformed_output_counts_as_stage_failure() {
    let primary = Scripted::ok("Sure! Here are your questions: 1) ...");
    let secondary = Scripted::ok("{\"questions\": \"none\"}");
    let p = provider().with_generator(primary).with_generator(secondary);

    let (qs, source) = p.generate_questions("Geography", "Hard", 3).await;
    assert_eq!(source, QuestionSource::Fallback);
    assert_eq!(qs.len(), 3);
    assert_eq!(qs[0].question, "What is the longest river in the world?");
  }

  #[tokio::test]
  async fn total_failure_serves_history_fallback() {
    let p = provider()
      .with_generator(Scripted::failing("503"))
      .with_generator(Scripted::failing("timeout"));

    let (qs, source) = p.generate_questions("History", "Easy", 3).await;
    assert_eq!(source, QuestionSource::Fallback);
    assert_eq!(qs.len(), 3);
    let bank = FallbackBank::default();
    assert_eq!(qs, bank.questions_for("History", 3));
  }

  #[tokio::test]
  async fn single_stage_failure_goes_straight_to_fallback() {
    let only = Scripted::failing("401");
    let p = provider().with_generator(only.clone());
    let (qs, source) = p.generate_questions("Underwater Basket Weaving", "Easy", 20).await;
    assert_eq!(source, QuestionSource::Fallback);
    assert_eq!(qs.len(), 10);
    assert_eq!(only.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn zero_count_still_returns_one_question() {
    let (qs, _) = provider().generate_questions("Mathematics", "Easy", 0).await;
    assert_eq!(qs.len(), 1);
  }
}
