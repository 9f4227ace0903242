use std::fmt;

use serde::Serialize;

/// Classification of a failed fetch.
///
/// The kind decides the retry behaviour: only [`FailureKind::Network`] and
/// [`FailureKind::Timeout`] are ever retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum FailureKind {
    /// No response was received (connection refused, DNS, reset, ...).
    Network,
    /// The request exceeded its deadline.
    Timeout,
    /// The server answered with a non-2xx status code.
    Http(u16),
    /// The response body did not have the expected shape.
    Malformed,
}

impl FailureKind {
    /// Whether an automatic retry can plausibly succeed.
    pub fn is_transient(self) -> bool {
        matches!(self, FailureKind::Network | FailureKind::Timeout)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => f.write_str("network error"),
            FailureKind::Timeout => f.write_str("request timed out"),
            FailureKind::Http(status) => write!(f, "HTTP {status}"),
            FailureKind::Malformed => f.write_str("malformed response"),
        }
    }
}

/// Typed failure returned by every fetch operation.
///
/// Failures are values, never panics: the cache stores the most recent one
/// on the affected entry and exposes it through its snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Http(status), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Malformed, message)
    }

    /// `true` for an HTTP 401, which the auth collaborator must handle
    /// (typically by forcing re-authentication).
    pub fn is_unauthorized(&self) -> bool {
        self.kind == FailureKind::Http(401)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
