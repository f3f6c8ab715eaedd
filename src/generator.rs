//! The text-generation capability the question provider depends on.
//!
//! Anything that can turn a (system, user) prompt pair into text can back a generation stage.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::GenerationError;

#[async_trait]
pub trait TextGenerator: Send + Sync {
  /// Short label for logs, e.g. "gemini:gemini-1.5-flash".
  fn name(&self) -> String;

  async fn generate(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

/// Try to extract a clean error message from an `{"error": {"message": ...}}` body.
/// OpenAI and Google both use this envelope.
pub(crate) fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use axum::{http::StatusCode, Json, Router};

  /// Serve `body` with `status` for every request on an ephemeral local port; returns the base URL.
  pub(crate) async fn serve_stub(status: StatusCode, body: serde_json::Value) -> String {
    let app = Router::new().fallback(move || {
      let body = body.clone();
      async move { (status, Json(body)) }
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
      let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
  }

  /// Like `serve_stub`, but the 200 body is plain text rather than JSON.
  pub(crate) async fn serve_text_stub(body: &'static str) -> String {
    let app = Router::new().fallback(move || async move { body });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
      let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
  }

  #[test]
  fn extracts_nested_error_message() {
    let body = r#"{"error":{"message":"quota exceeded","code":429}}"#;
    assert_eq!(extract_api_error(body).as_deref(), Some("quota exceeded"));
    assert_eq!(extract_api_error("<html>bad gateway</html>"), None);
  }
}
