//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! Behavior:
//! - LOG_LEVEL controls the filter (e.g. "debug" or detailed directives like
//!   "info,questions=debug,quiz_backend=debug,tower_http=info,axum=info").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Notes:
//! - We include targets in the output to disambiguate sources.
//! - Tower HTTP TraceLayer still adds per-request spans; this complements it.
//! - Logs go to stderr so the terminal client can own stdout.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,questions=debug,quiz=info,quiz_backend=debug,tower_http=info,axum=info";

pub fn init_tracing() {
    init_tracing_with_default(DEFAULT_FILTER);
}

/// Same as `init_tracing` but with a caller-chosen default filter (the terminal client keeps quiet by default).
pub fn init_tracing_with_default(default_filter: &str) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    // Choose JSON vs pretty; don't try to store different layer types.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
