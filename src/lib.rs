//! Quiz backend: multiple-choice question generation with canned fallbacks, plus the quiz flow
//! state machine that consumes it.
//!
//! - `provider`: ordered generation stages (Gemini, OpenAI-compatible) then the fallback bank
//! - `routes`: axum router exposing `POST /api/v1/questions`
//! - `quiz`: intro → selection → countdown → timed questions → results

pub mod config;
pub mod domain;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod openai;
pub mod protocol;
pub mod provider;
pub mod quiz;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;
