use thiserror::Error;

/// Top-level error type for the `astroviz-api` crate.
///
/// Covers every failure mode of the two transports (WebSocket push stream
/// and HTTP snapshot polling) plus wire decoding. `astroviz-core` maps these
/// into status changes and last-error strings; none of them are fatal.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the snapshot endpoint.
    #[error("Request failed: {status}")]
    HttpStatus { status: u16 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request or connect attempt timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket closed unexpectedly.
    #[error("WebSocket closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Outbound frame could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { status } => *status >= 500,
            Self::Timeout { .. } | Self::WebSocketConnect(_) | Self::WebSocketClosed { .. } => {
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if this error came from decoding a payload rather
    /// than from the connection itself.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        assert!(Error::HttpStatus { status: 503 }.is_transient());
        assert!(!Error::HttpStatus { status: 404 }.is_transient());
        assert!(Error::WebSocketConnect("refused".into()).is_transient());
    }

    #[test]
    fn http_status_message_names_the_code() {
        let err = Error::HttpStatus { status: 502 };
        assert_eq!(err.to_string(), "Request failed: 502");
    }

    #[test]
    fn deserialization_is_malformed_not_transient() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "nope".into(),
        };
        assert!(err.is_malformed());
        assert!(!err.is_transient());
    }
}
