//! WebSocket push-stream transport.
//!
//! [`WebSocketConnector`] opens one connection per call; the reconnect loop
//! lives in `astroviz-core`, which owns the connectivity state machine.
//! [`WebSocketSession`] hides control frames and surfaces only text frames,
//! clean closes, and errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use astroviz_api::{PushConnector, PushSession, WebSocketConnector};
//! use std::time::Duration;
//!
//! let connector = WebSocketConnector::new(url, Duration::from_secs(10));
//! let mut session = connector.connect().await?;
//! session.send_text(r#"{"kind":"subscribe","stream":"orbits"}"#.into()).await?;
//!
//! while let Some(frame) = session.next_text().await {
//!     println!("{}", frame?);
//! }
//! ```

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::error::Error;
use crate::source::{PushConnector, PushSession};

// ── WebSocketConnector ───────────────────────────────────────────────

/// Opens push-channel connections to a fixed URL.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: Url,
    connect_timeout: Duration,
}

impl WebSocketConnector {
    pub fn new(url: Url, connect_timeout: Duration) -> Self {
        Self {
            url,
            connect_timeout,
        }
    }

    /// The configured stream URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl PushConnector for WebSocketConnector {
    type Session = WebSocketSession;

    async fn connect(&self) -> Result<WebSocketSession, Error> {
        tracing::info!(url = %self.url, "Connecting to orbital stream");

        let uri: tungstenite::http::Uri = self.url.as_str().parse().map_err(
            |e: tungstenite::http::uri::InvalidUri| Error::WebSocketConnect(e.to_string()),
        )?;
        let request = ClientRequestBuilder::new(uri);

        let (stream, _response) =
            tokio::time::timeout(self.connect_timeout, tokio_tungstenite::connect_async(request))
                .await
                .map_err(|_| Error::Timeout {
                    timeout_secs: self.connect_timeout.as_secs(),
                })?
                .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

        tracing::info!("Orbital stream connected");
        Ok(WebSocketSession { stream })
    }
}

// ── WebSocketSession ─────────────────────────────────────────────────

/// A single open WebSocket connection.
pub struct WebSocketSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PushSession for WebSocketSession {
    async fn send_text(&mut self, text: String) -> Result<(), Error> {
        self.stream
            .send(Message::text(text))
            .await
            .map_err(|e| Error::WebSocketConnect(e.to_string()))
    }

    async fn next_text(&mut self) -> Option<Result<String, Error>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(Message::Ping(_)) => {
                    // tungstenite answers pings on the next read/write
                    tracing::trace!("WebSocket ping");
                }
                Ok(Message::Close(frame)) => return close_outcome(frame.as_ref()),
                Ok(_) => {
                    // Binary, Pong, Frame -- ignore
                }
                Err(e) => return Some(Err(Error::WebSocketConnect(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "WebSocket close handshake failed");
        }
    }
}

/// Normal and going-away closes end the session cleanly; anything else is
/// surfaced as an error so the caller can record it.
fn close_outcome(
    frame: Option<&tungstenite::protocol::CloseFrame>,
) -> Option<Result<String, Error>> {
    let Some(cf) = frame else {
        tracing::info!("WebSocket close frame received (no payload)");
        return None;
    };

    tracing::info!(code = %cf.code, reason = %cf.reason, "WebSocket close frame received");
    match cf.code {
        CloseCode::Normal | CloseCode::Away => None,
        code => Some(Err(Error::WebSocketClosed {
            code: u16::from(code),
            reason: cf.reason.as_str().to_owned(),
        })),
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tungstenite::protocol::CloseFrame;

    #[test]
    fn missing_close_payload_is_clean() {
        assert!(close_outcome(None).is_none());
    }

    #[test]
    fn normal_close_is_clean() {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "bye".into(),
        };
        assert!(close_outcome(Some(&frame)).is_none());
    }

    #[test]
    fn abnormal_close_is_an_error() {
        let frame = CloseFrame {
            code: CloseCode::Error,
            reason: "backend restarting".into(),
        };
        match close_outcome(Some(&frame)) {
            Some(Err(Error::WebSocketClosed { code, reason })) => {
                assert_eq!(code, 1011);
                assert_eq!(reason, "backend restarting");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
