//! Logging and tracing utilities.
//!
//! Structured logging uses the `tracing` ecosystem. All logs are written to
//! **stderr** so that stdout stays free for the host protocol.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `debug`, `pingdirectory_provider=debug`)
//!
//! # Examples
//!
//! ```bash
//! # Show request and response bodies sent to the configuration API
//! RUST_LOG=pingdirectory_provider=debug ./provider
//! ```

use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the default logging subscriber.
///
/// This sets up a `tracing` subscriber that:
/// - Writes to **stderr**
/// - Respects the `RUST_LOG` environment variable for filtering
/// - Defaults to `info` level if `RUST_LOG` is not set
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level, used when `RUST_LOG` is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Unlike [`init_logging`], this does not panic if a subscriber has already
/// been set, which makes it safe to call from tests.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer::<S>()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Log the JSON body of an outgoing configuration API request at debug level.
///
/// Bodies that cannot be rendered are skipped.
pub fn log_request_body(method: &str, body: &Value) {
    if let Some(rendered) = render(body) {
        debug!(method, body = %rendered, "Configuration API request");
    }
}

/// Log the JSON body of a configuration API response at debug level.
///
/// Bodies that cannot be rendered are skipped.
pub fn log_response_body(method: &str, body: &Value) {
    if let Some(rendered) = render(body) {
        debug!(method, body = %rendered, "Configuration API response");
    }
}

fn render(body: &Value) -> Option<String> {
    serde_json::to_string(body).ok()
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so
    // initialization itself is not exercised here.

    use super::*;
    use serde_json::json;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("pingdirectory_provider=debug").is_ok());
        assert!(EnvFilter::try_new("warn,pingdirectory_provider=trace").is_ok());
    }

    #[test]
    fn test_render_body() {
        assert_eq!(
            render(&json!({"op": "replace"})).as_deref(),
            Some(r#"{"op":"replace"}"#)
        );
        log_request_body("POST", &json!({"id": "x"}));
        log_response_body("GET", &json!(null));
    }
}
