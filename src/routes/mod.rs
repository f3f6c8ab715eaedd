//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - JSON API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers), adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/catalog", get(http::http_get_catalog))
        .route("/api/v1/questions", post(http::http_post_questions))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Prompts;
    use crate::domain::QuestionSource;
    use crate::protocol::QuestionsOut;
    use crate::provider::tests::{batch_json, Scripted};
    use crate::provider::QuestionProvider;
    use crate::seeds::FallbackBank;

    fn app(provider: QuestionProvider) -> Router {
        build_router(Arc::new(AppState::with_provider(provider)))
    }

    fn offline() -> QuestionProvider {
        QuestionProvider::new(Prompts::default(), FallbackBank::default())
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/questions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        let res = app.oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn missing_subject_or_difficulty_is_400_without_questions() {
        for body in [
            r#"{"difficulty":"Easy"}"#,
            r#"{"subject":"History"}"#,
            r#"{"subject":"  ","difficulty":"Easy"}"#,
            r#"{}"#,
        ] {
            let (status, value) = post_json(app(offline()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert!(value.get("error").and_then(|e| e.as_str()).is_some(), "{body}");
            assert!(value.get("questions").is_none(), "{body}");
        }
    }

    #[tokio::test]
    async fn malformed_body_is_400_with_error_field() {
        let (status, value) = post_json(app(offline()), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn history_with_both_services_down_returns_three_fallback_questions() {
        let provider = offline()
            .with_generator(Scripted::failing("primary down"))
            .with_generator(Scripted::failing("secondary down"));
        let (status, value) = post_json(
            app(provider),
            r#"{"subject":"History","difficulty":"Easy","numberOfQuestions":3}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let out: QuestionsOut = serde_json::from_value(value).expect("questions out");
        assert_eq!(out.source, Some(QuestionSource::Fallback));
        assert_eq!(out.questions, FallbackBank::default().questions_for("History", 3));
        assert!(out.questions.iter().all(|q| q.is_well_formed()));
    }

    #[tokio::test]
    async fn float_or_string_count_is_accepted() {
        for body in [
            r#"{"subject":"History","difficulty":"Easy","numberOfQuestions":3.0}"#,
            r#"{"subject":"History","difficulty":"Easy","numberOfQuestions":"3"}"#,
        ] {
            let (status, value) = post_json(app(offline()), body).await;
            assert_eq!(status, StatusCode::OK, "{body}");
            assert_eq!(value["questions"].as_array().map(Vec::len), Some(3), "{body}");
            assert_eq!(value["source"], "fallback", "{body}");
        }
    }

    #[tokio::test]
    async fn unusable_count_falls_back_to_default() {
        let (status, value) = post_json(
            app(offline()),
            r#"{"subject":"General Knowledge","difficulty":"Easy","numberOfQuestions":{"n":3}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["questions"].as_array().map(Vec::len), Some(10));
    }

    #[tokio::test]
    async fn count_defaults_to_ten() {
        let provider = offline().with_generator(Scripted::ok(&batch_json(12)));
        let (status, value) = post_json(app(provider), r#"{"subject":"Science","difficulty":"Hard"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["questions"].as_array().map(Vec::len), Some(10));
        assert_eq!(value["source"], "primary-service");
    }

    #[tokio::test]
    async fn secondary_stage_is_reported_as_source() {
        let provider = offline()
            .with_generator(Scripted::ok("I cannot help with that."))
            .with_generator(Scripted::ok(&batch_json(3)));
        let (status, value) = post_json(
            app(provider),
            r#"{"subject":"Literature","difficulty":"Medium","numberOfQuestions":3}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["source"], "secondary-service");
        assert_eq!(value["questions"][0]["correctAnswer"], "gamma");
    }

    #[tokio::test]
    async fn health_and_catalog_respond() {
        let res = app(offline())
            .oneshot(Request::builder().uri("/api/v1/catalog").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert!(value["levels"].as_array().is_some_and(|l| l.len() == 3));

        let res = app(offline())
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
    }
}
