use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{trace, warn};
use ureq::Agent;

use super::ClientError;

const HTTP_TIMEOUT_SECS: u64 = 10;

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .http_status_as_error(false)
            .build()
            .into()
    })
}

/// A response with its status line and text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests for the state wrappers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Non-2xx statuses are responses, not errors.
    async fn get(&self, url: &str) -> Result<TransportResponse, ClientError>;
}

/// [`Transport`] over HTTP.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

impl HttpTransport {
    /// Blocking request, called inside `spawn_blocking`.
    fn get_sync(url: &str) -> Result<TransportResponse, ClientError> {
        let resp = get_agent().get(url).call().map_err(|e| {
            warn!("Request to \"{}\" failed: {}", url, e);
            ClientError::Transport(e.to_string())
        })?;

        let status = resp.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = resp
            .into_body()
            .read_to_string()
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        trace!("GET {} -> {}", url, status);

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, ClientError> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || Self::get_sync(&url))
            .await
            .map_err(|e| ClientError::Transport(format!("spawn_blocking failed: {}", e)))?
    }
}
