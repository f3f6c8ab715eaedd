//! HTTP endpoint handlers. These are thin wrappers that forward to the question provider.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{LEVELS, SUBJECTS};
use crate::protocol::*;
use crate::state::AppState;

/// Structural request errors. The only failures a client ever sees from this API.
#[derive(Debug)]
pub enum ApiError {
  MissingField(&'static str),
  InvalidBody(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let error = match self {
      ApiError::MissingField(field) => format!("Missing required field: {field}"),
      ApiError::InvalidBody(msg) => format!("Invalid request body: {msg}"),
    };
    (StatusCode::BAD_REQUEST, Json(ErrorOut { error })).into_response()
  }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ApiError> {
  match value.as_deref().map(str::trim) {
    Some(v) if !v.is_empty() => Ok(v.to_string()),
    _ => Err(ApiError::MissingField(field)),
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn http_get_catalog() -> impl IntoResponse {
  Json(CatalogOut {
    subjects: SUBJECTS.iter().map(|s| s.to_string()).collect(),
    levels: LEVELS.iter().map(|s| s.to_string()).collect(),
  })
}

#[instrument(level = "info", skip(state, body), fields(request_id = %Uuid::new_v4()))]
pub async fn http_post_questions(
  State(state): State<Arc<AppState>>,
  body: Result<Json<QuestionsIn>, JsonRejection>,
) -> Result<Json<QuestionsOut>, ApiError> {
  let Json(body) = body.map_err(|e| {
    warn!(target: "questions", error = %e, "Rejected unparsable questions request");
    ApiError::InvalidBody(e.body_text())
  })?;

  let subject = required(&body.subject, "subject")?;
  let difficulty = required(&body.difficulty, "difficulty")?;
  let count = body.count();

  let (questions, source) = state.provider.generate_questions(&subject, &difficulty, count).await;
  info!(target: "questions", %subject, %difficulty, requested = count, served = questions.len(), %source, "HTTP questions served");
  Ok(Json(QuestionsOut { questions, source: Some(source) }))
}
