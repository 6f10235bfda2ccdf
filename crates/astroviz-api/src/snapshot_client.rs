// HTTP snapshot client
//
// Pull-side counterpart to the push stream: one idempotent GET returning a
// full snapshot. Used as the fallback source while the stream is offline.

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::source::SnapshotSource;
use crate::transport::TransportConfig;
use crate::wire::{WireSnapshot, deserialization_error};

const SNAPSHOT_PATH: &str = "api/orbits/snapshot";

/// Raw HTTP client for the daemon's snapshot endpoint.
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl SnapshotClient {
    /// Create a client from the daemon base URL (e.g. `http://localhost:8000`).
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_client(transport.build_client()?, base_url)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Result<Self, Error> {
        let endpoint = snapshot_endpoint(base_url)?;
        Ok(Self { http, endpoint })
    }

    /// Fully resolved snapshot URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// GET the current snapshot.
    pub async fn snapshot(&self) -> Result<WireSnapshot, Error> {
        debug!(url = %self.endpoint, "fetching snapshot");

        let resp = self.http.get(self.endpoint.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "snapshot body received");
        serde_json::from_str(&body).map_err(|e| deserialization_error(&e, &body))
    }
}

impl SnapshotSource for SnapshotClient {
    async fn fetch_snapshot(&self) -> Result<WireSnapshot, Error> {
        self.snapshot().await
    }
}

/// Join the snapshot path onto the base URL, keeping any path prefix the
/// base already carries (`http://host/daemon` → `http://host/daemon/api/...`).
fn snapshot_endpoint(base_url: &Url) -> Result<Url, Error> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(SNAPSHOT_PATH)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_from_bare_host() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            snapshot_endpoint(&base).unwrap().as_str(),
            "http://localhost:8000/api/orbits/snapshot"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let base = Url::parse("https://example.net/daemon").unwrap();
        assert_eq!(
            snapshot_endpoint(&base).unwrap().as_str(),
            "https://example.net/daemon/api/orbits/snapshot"
        );
    }
}
