// ── Core error types ──
//
// User-facing errors from exaview-core. Consumers never see raw HTTP status
// codes or JSON parse failures directly: every backend round-trip failure
// becomes one of the "request failed" variants below, and every failed
// identifier-path resolution becomes `KeyNotFound`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request failures ─────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Backend error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected backend payload: {message}")]
    Decode { message: String },

    // ── Lookup failures ──────────────────────────────────────────────
    /// A composite identifier path did not resolve in the store.
    #[error("Not found: {path}")]
    KeyNotFound { path: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// `true` for the request-failure family (anything that came back
    /// from, or failed on the way to, the backend).
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::AuthenticationFailed { .. }
                | Self::Timeout
                | Self::Api { .. }
                | Self::Decode { .. }
        )
    }

    pub(crate) fn key_not_found(segments: &[&str]) -> Self {
        Self::KeyNotFound {
            path: segments.join("/"),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<exaview_api::Error> for CoreError {
    fn from(err: exaview_api::Error) -> Self {
        match err {
            exaview_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            exaview_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            exaview_api::Error::Status { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            exaview_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            exaview_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            exaview_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            exaview_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Backend URL cannot carry API paths: {url}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_become_request_failures() {
        let err = CoreError::from(exaview_api::Error::Status {
            status: 500,
            message: "boom".into(),
        });
        assert!(err.is_request_failure());
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }

    #[test]
    fn key_not_found_is_not_a_request_failure() {
        let err = CoreError::key_not_found(&["R1", "H9"]);
        assert!(!err.is_request_failure());
        assert_eq!(err.to_string(), "Not found: R1/H9");
    }
}
