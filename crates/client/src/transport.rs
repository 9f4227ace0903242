//! Raw HTTP access to the image-search API.
//!
//! A [`Transport`] performs exactly one request and hands back the decoded
//! JSON body. It does not retry and does not validate shape; both are the
//! fetcher's job. [`HttpTransport`] is the production implementation on
//! top of [`reqwest`].

use async_trait::async_trait;
use gallery_core::error::FetchFailure;
use gallery_core::types::ImageId;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::config::{ApiConfig, DetailEndpoint};

/// One logical request against the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// A page of search results. Parameters are already sanitized.
    Search {
        text: String,
        page: u32,
        per_page: u32,
    },
    /// A single image by id.
    Image { id: ImageId },
}

/// Errors from a single transport round-trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request exceeded its deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// No response was received (connection, DNS, TLS, reset, ...).
    #[error("request failed: {0}")]
    Connect(String),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body could not be decoded as JSON.
    #[error("undecodable response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            TransportError::Connect(err.to_string())
        }
    }
}

impl From<TransportError> for FetchFailure {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        match err {
            TransportError::Timeout(_) => FetchFailure::timeout(message),
            TransportError::Connect(_) => FetchFailure::network(message),
            TransportError::Status { status, .. } => FetchFailure::http(status, message),
            TransportError::Decode(_) => FetchFailure::malformed(message),
        }
    }
}

/// Performs one request and returns the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, TransportError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// [`reqwest`]-backed transport for a Pixabay-compatible API.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpTransport {
    /// Create a transport with a client configured for `config`'s timeout.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Create a transport reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling).
    pub fn with_client(client: reqwest::Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Target URL for `request`.
    pub fn url(&self, request: &ApiRequest) -> String {
        match (request, self.config.detail_endpoint) {
            (ApiRequest::Image { id }, DetailEndpoint::Path) => {
                format!("{}/images/{id}", self.config.base_url)
            }
            _ => self.config.base_url.clone(),
        }
    }

    /// Query-string parameters for `request`, including the API key.
    pub fn query_params(&self, request: &ApiRequest) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(key) = &self.config.api_key {
            params.push(("key", key.clone()));
        }
        match request {
            ApiRequest::Search {
                text,
                page,
                per_page,
            } => {
                params.push(("q", text.clone()));
                params.push(("page", page.to_string()));
                params.push(("per_page", per_page.to_string()));
            }
            ApiRequest::Image { id } => {
                if self.config.detail_endpoint == DetailEndpoint::QueryParam {
                    params.push(("id", id.to_string()));
                }
            }
        }
        params
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`TransportError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let url = self.url(request);
        let mut builder = self.client.get(&url).query(&self.query_params(request));
        if self.config.sends_bearer_token() {
            if let Some(token) = &self.config.bearer_token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        tracing::debug!(url = %url, ?request, "Sending API request");

        let response = builder.send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Value>().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use gallery_core::error::FailureKind;

    use super::*;

    fn transport(config: ApiConfig) -> HttpTransport {
        HttpTransport::with_client(reqwest::Client::new(), config)
    }

    fn search() -> ApiRequest {
        ApiRequest::Search {
            text: "red fox".into(),
            page: 2,
            per_page: 20,
        }
    }

    #[test]
    fn search_params_use_wire_names() {
        let t = transport(ApiConfig::default());
        assert_eq!(t.url(&search()), "https://pixabay.com/api");
        assert_eq!(
            t.query_params(&search()),
            vec![
                ("q", "red fox".to_string()),
                ("page", "2".to_string()),
                ("per_page", "20".to_string()),
            ]
        );
    }

    #[test]
    fn api_key_is_prepended_when_configured() {
        let t = transport(ApiConfig {
            api_key: Some("secret".into()),
            ..Default::default()
        });
        let params = t.query_params(&search());
        assert_eq!(params[0], ("key", "secret".to_string()));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn detail_uses_id_param_by_default() {
        let t = transport(ApiConfig::default());
        let request = ApiRequest::Image { id: 42 };
        assert_eq!(t.url(&request), "https://pixabay.com/api");
        assert_eq!(t.query_params(&request), vec![("id", "42".to_string())]);
    }

    #[test]
    fn detail_uses_path_when_configured() {
        let t = transport(ApiConfig {
            base_url: "http://localhost:4000/api".into(),
            detail_endpoint: DetailEndpoint::Path,
            ..Default::default()
        });
        let request = ApiRequest::Image { id: 42 };
        assert_eq!(t.url(&request), "http://localhost:4000/api/images/42");
        assert!(t.query_params(&request).is_empty());
    }

    #[test]
    fn transport_errors_map_to_failure_kinds() {
        let cases = [
            (TransportError::Timeout("slow".into()), FailureKind::Timeout),
            (TransportError::Connect("refused".into()), FailureKind::Network),
            (
                TransportError::Status {
                    status: 401,
                    body: "nope".into(),
                },
                FailureKind::Http(401),
            ),
            (TransportError::Decode("eof".into()), FailureKind::Malformed),
        ];
        for (err, kind) in cases {
            assert_eq!(FetchFailure::from(err).kind, kind);
        }
    }

    #[test]
    fn status_error_display() {
        let err = TransportError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "API error (502): bad gateway");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let t = HttpTransport::new(ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();
        let err = t.get_json(&search()).await.unwrap_err();
        assert_matches!(err, TransportError::Connect(_) | TransportError::Timeout(_));
    }
}
