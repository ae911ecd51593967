// ── Core error types ──
//
// Caller-facing errors from upway-core. Transport-layer failures from
// upway-api are translated by the `From` impl below; consumers only
// ever match on `CoreError`.

use thiserror::Error;

use upway_api::DataService;

use crate::catalog::Variable;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    /// Raised while building a config, before any network I/O.
    #[error("Invalid configuration for {field}: {reason}")]
    Configuration { field: String, reason: String },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Login failed: {message}")]
    Login { message: String },

    #[error("Session is not logged in -- pass force_login to log in again")]
    NotLoggedIn,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected response: {message}")]
    Response { message: String },

    /// The portal returned an id missing from the catalog.
    #[error("Variable id {id} is not in the catalog")]
    UnmappedVariable { id: u32 },

    #[error("{variable} is not available on {service}")]
    UnsupportedVariable {
        variable: Variable,
        service: DataService,
    },

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Request failed: {message}")]
    Transport {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },
}

impl CoreError {
    /// A required config field is missing for the selected service.
    pub(crate) fn missing(field: &str, service: DataService) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: format!("required when using {service}"),
        }
    }

    pub(crate) fn response(message: impl Into<String>) -> Self {
        Self::Response {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<upway_api::Error> for CoreError {
    fn from(err: upway_api::Error) -> Self {
        match err {
            upway_api::Error::Authentication { message } => Self::Login { message },
            upway_api::Error::Unauthorized => Self::Transport {
                message: "service rejected the session (HTTP 401)".into(),
                status: Some(401),
            },
            upway_api::Error::Http { status, message } => Self::Transport {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            upway_api::Error::Transport(e) => Self::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            upway_api::Error::InvalidUrl(e) => Self::Configuration {
                field: "base_url".into(),
                reason: e.to_string(),
            },
            upway_api::Error::Tls(message) => Self::Transport {
                message,
                status: None,
            },
            upway_api::Error::Deserialization { message, .. } => Self::Response { message },
        }
    }
}
