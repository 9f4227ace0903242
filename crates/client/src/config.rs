use std::time::Duration;

/// Public Pixabay endpoint used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "https://pixabay.com/api";

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// How the detail-by-id endpoint is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailEndpoint {
    /// `GET {base}?id=<n>` (public API form).
    QueryParam,
    /// `GET {base}/images/{id}` (mock server form).
    Path,
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// API client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the list endpoint, without a trailing slash.
    pub base_url: String,
    /// API key appended as `key=` to every request when set.
    pub api_key: Option<String>,
    /// Opaque bearer credential supplied by the auth collaborator.
    pub bearer_token: Option<String>,
    pub detail_endpoint: DetailEndpoint,
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                   |
    /// |--------------------------------|---------------------------|
    /// | `GALLERY_API_URL`              | `https://pixabay.com/api` |
    /// | `GALLERY_API_KEY`              | unset                     |
    /// | `GALLERY_API_TOKEN`            | unset                     |
    /// | `GALLERY_DETAIL_ENDPOINT`      | `query` (or `path`)       |
    /// | `GALLERY_REQUEST_TIMEOUT_SECS` | `10`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = non_empty("GALLERY_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.into())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let detail_endpoint = match non_empty("GALLERY_DETAIL_ENDPOINT").as_deref() {
            None | Some("query") => DetailEndpoint::QueryParam,
            Some("path") => DetailEndpoint::Path,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "GALLERY_DETAIL_ENDPOINT",
                    expected: "`query` or `path`",
                    value: other.to_string(),
                })
            }
        };

        let request_timeout_secs = match non_empty("GALLERY_REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    name: "GALLERY_REQUEST_TIMEOUT_SECS",
                    expected: "a positive integer",
                    value: raw,
                })?,
        };

        Ok(Self {
            base_url,
            api_key: non_empty("GALLERY_API_KEY"),
            bearer_token: non_empty("GALLERY_API_TOKEN"),
            detail_endpoint,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    /// Whether the bearer token should be attached.
    ///
    /// The public Pixabay API authenticates by `key` only and the token is
    /// never sent there.
    pub fn sends_bearer_token(&self) -> bool {
        self.bearer_token.is_some() && !self.base_url.contains("pixabay.com")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            api_key: None,
            bearer_token: None,
            detail_endpoint: DetailEndpoint::QueryParam,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.bearer_token, None);
        assert_eq!(config.detail_endpoint, DetailEndpoint::QueryParam);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            ("GALLERY_API_URL", "http://localhost:4000/api/"),
            ("GALLERY_API_KEY", "k-123"),
            ("GALLERY_API_TOKEN", "t-456"),
            ("GALLERY_DETAIL_ENDPOINT", "path"),
            ("GALLERY_REQUEST_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:4000/api");
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.bearer_token.as_deref(), Some("t-456"));
        assert_eq!(config.detail_endpoint, DetailEndpoint::Path);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[("GALLERY_API_KEY", "  "), ("GALLERY_API_URL", "")]).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn rejects_unknown_detail_endpoint() {
        assert_matches!(
            load(&[("GALLERY_DETAIL_ENDPOINT", "header")]),
            Err(ConfigError::Invalid { name: "GALLERY_DETAIL_ENDPOINT", .. })
        );
    }

    #[test]
    fn rejects_bad_timeout() {
        for bad in ["abc", "0", "-2"] {
            assert_matches!(
                load(&[("GALLERY_REQUEST_TIMEOUT_SECS", bad)]),
                Err(ConfigError::Invalid { name: "GALLERY_REQUEST_TIMEOUT_SECS", .. })
            );
        }
    }

    #[test]
    fn bearer_token_is_not_sent_to_public_api() {
        let public = load(&[("GALLERY_API_TOKEN", "t")]).unwrap();
        assert!(!public.sends_bearer_token());

        let private = load(&[
            ("GALLERY_API_TOKEN", "t"),
            ("GALLERY_API_URL", "http://localhost:4000/api"),
        ])
        .unwrap();
        assert!(private.sends_bearer_token());
    }
}
