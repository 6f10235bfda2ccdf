// ── Core error types ──
//
// Errors surfaced by astroviz-core. Transport failures inside the running
// engine never escape as errors; they become status changes and a
// last-error string on the store. These variants cover the places where
// a caller does get a `Result`: wire conversion, engine lifecycle and
// one-shot fetches.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to daemon at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Daemon connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed message: {reason}")]
    MalformedMessage { reason: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Engine already stopped")]
    EngineStopped,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// `true` when the payload itself was unusable, as opposed to the
    /// connection failing.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedMessage { .. } | Self::Validation { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<astroviz_api::Error> for CoreError {
    fn from(err: astroviz_api::Error) -> Self {
        match err {
            astroviz_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            astroviz_api::Error::HttpStatus { status } => CoreError::Api {
                message: format!("snapshot request failed with HTTP {status}"),
                status: Some(status),
            },
            astroviz_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            astroviz_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            astroviz_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            astroviz_api::Error::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason,
            },
            astroviz_api::Error::WebSocketClosed { code, reason } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("stream closed (code {code}): {reason}"),
            },
            astroviz_api::Error::Serialization(message) => CoreError::Internal(message),
            astroviz_api::Error::Deserialization { message, .. } => {
                CoreError::MalformedMessage { reason: message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_keeps_code() {
        let err = CoreError::from(astroviz_api::Error::HttpStatus { status: 503 });
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
    }

    #[test]
    fn deserialization_becomes_malformed() {
        let err = CoreError::from(astroviz_api::Error::Deserialization {
            message: "missing field `epoch`".into(),
            body: "{}".into(),
        });
        assert!(err.is_malformed());
        assert_eq!(err.to_string(), "Malformed message: missing field `epoch`");
    }
}
