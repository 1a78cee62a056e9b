//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// User-Agent sent with tile requests.
const USER_AGENT: &str = concat!("mapscii-rs/", env!("CARGO_PKG_VERSION"));

/// Errors from an HTTP tile fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// Connection, timeout or protocol failure
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Body could not be read
    #[error("Failed to read response from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Trait for asynchronous HTTP GET.
///
/// Allows tile sources to be tested with mock clients.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Async HTTP client implementation using reqwest.
///
/// A disconnected client (see [`AsyncReqwestClient::disconnected`]) holds no
/// reqwest client and fails every request.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: Option<reqwest::Client>,
}

impl AsyncReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client: Some(client),
        })
    }

    /// A client for sources that never fetch over HTTP.
    pub fn disconnected() -> Self {
        Self { client: None }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let Some(client) = &self.client else {
            return Err(FetchError::Client(format!("no HTTP client configured for {}", url)));
        };
        trace!(url = url, "HTTP GET request starting");

        let response = match client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(FetchError::Request {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = url, status = status.as_u16(), "HTTP error status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(FetchError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
