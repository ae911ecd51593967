use thiserror::Error;

/// Top-level error type for the `upway-api` crate.
///
/// Covers every failure mode of both services: authentication,
/// transport, unexpected HTTP status, and payload decoding.
/// `upway-core` maps these into caller-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials were explicitly rejected (no session cookie, token
    /// endpoint refused the client credentials).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The service answered 401 for an authenticated request.
    #[error("Unauthorized -- session or token is no longer valid")]
    Unauthorized,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success status that is not otherwise classified.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Http { status: 401, .. })
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build a `Deserialization` error with a short body preview in the message.
    pub(crate) fn deserialization(err: &serde_json::Error, body: String) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body,
        }
    }

    /// Build an `Http` error from a status and whatever body came with it.
    pub(crate) fn http(status: reqwest::StatusCode, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Http {
            status: status.as_u16(),
            message: if preview.is_empty() {
                status.to_string()
            } else {
                preview
            },
        }
    }
}
