//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Question, QuestionSource};

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const MAX_QUESTIONS: usize = 50;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsIn {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub number_of_questions: Option<i64>,
}

/// Accepts integers, integral floats (`3.0`) and numeric strings (`"3"`).
/// Anything else becomes `None` so the default count applies instead of rejecting the request.
fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

impl QuestionsIn {
    /// Requested count: defaults to 10, at least 1, at most `MAX_QUESTIONS`.
    pub fn count(&self) -> usize {
        match self.number_of_questions {
            None => DEFAULT_QUESTION_COUNT,
            Some(n) => n.clamp(1, MAX_QUESTIONS as i64) as usize,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsOut {
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<QuestionSource>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize, Deserialize)]
pub struct CatalogOut {
    pub subjects: Vec<String>,
    pub levels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_defaults_and_clamps() {
        let mut body = QuestionsIn::default();
        assert_eq!(body.count(), 10);
        body.number_of_questions = Some(0);
        assert_eq!(body.count(), 1);
        body.number_of_questions = Some(-4);
        assert_eq!(body.count(), 1);
        body.number_of_questions = Some(500);
        assert_eq!(body.count(), MAX_QUESTIONS);
        body.number_of_questions = Some(3);
        assert_eq!(body.count(), 3);
    }

    #[test]
    fn request_uses_camel_case_count() {
        let body: QuestionsIn =
            serde_json::from_str(r#"{"subject":"History","difficulty":"Easy","numberOfQuestions":3}"#).expect("parse");
        assert_eq!(body.subject.as_deref(), Some("History"));
        assert_eq!(body.count(), 3);
    }

    #[test]
    fn count_accepts_floats_and_numeric_strings() {
        let parse = |raw: &str| serde_json::from_str::<QuestionsIn>(raw).expect("parse").count();
        assert_eq!(parse(r#"{"numberOfQuestions":3.0}"#), 3);
        assert_eq!(parse(r#"{"numberOfQuestions":" 7 "}"#), 7);
        assert_eq!(parse(r#"{"numberOfQuestions":2.5}"#), DEFAULT_QUESTION_COUNT);
        assert_eq!(parse(r#"{"numberOfQuestions":"lots"}"#), DEFAULT_QUESTION_COUNT);
        assert_eq!(parse(r#"{"numberOfQuestions":null}"#), DEFAULT_QUESTION_COUNT);
        assert_eq!(parse(r#"{"numberOfQuestions":[1]}"#), DEFAULT_QUESTION_COUNT);
    }
}
