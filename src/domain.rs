//! Domain models: quiz questions, where a batch of questions came from, and the selectable catalog.

use serde::{Deserialize, Serialize};

/// Subjects offered by the quiz flow. The provider accepts any non-empty subject text.
pub const SUBJECTS: &[&str] = &[
  "Mathematics",
  "Science",
  "History",
  "Geography",
  "Literature",
  "General Knowledge",
];

/// Difficulty levels offered by the quiz flow.
pub const LEVELS: &[&str] = &["Easy", "Medium", "Hard"];

/// Fallback key used when a subject has no dedicated canned questions.
pub const DEFAULT_SUBJECT: &str = "General Knowledge";

pub const OPTIONS_PER_QUESTION: usize = 4;

/// One multiple-choice item. `correct_answer` must be value-equal to one of `options`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: String,
}

impl Question {
  pub fn new(question: &str, options: [&str; OPTIONS_PER_QUESTION], correct_answer: &str) -> Self {
    Self {
      question: question.to_string(),
      options: options.iter().map(|o| o.to_string()).collect(),
      correct_answer: correct_answer.to_string(),
    }
  }

  /// Non-empty text, exactly four pairwise-distinct options, and an answer that is one of them.
  pub fn is_well_formed(&self) -> bool {
    if self.question.trim().is_empty() || self.options.len() != OPTIONS_PER_QUESTION {
      return false;
    }
    let distinct = self.options.iter().enumerate().all(|(i, a)| {
      !a.trim().is_empty() && self.options[i + 1..].iter().all(|b| a.trim() != b.trim())
    });
    distinct && self.options.iter().any(|o| *o == self.correct_answer)
  }

  /// Index of the correct option, if the question is well formed.
  pub fn correct_index(&self) -> Option<usize> {
    self.options.iter().position(|o| *o == self.correct_answer)
  }
}

/// Which path produced a batch of questions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionSource {
  PrimaryService,
  SecondaryService,
  Fallback,
}

impl QuestionSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      QuestionSource::PrimaryService => "primary-service",
      QuestionSource::SecondaryService => "secondary-service",
      QuestionSource::Fallback => "fallback",
    }
  }
}

impl std::fmt::Display for QuestionSource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Case-insensitive lookup of a catalog entry, returning its canonical spelling.
pub fn canonical<'a>(catalog: &[&'a str], value: &str) -> Option<&'a str> {
  let value = value.trim();
  catalog.iter().copied().find(|c| c.eq_ignore_ascii_case(value))
}
