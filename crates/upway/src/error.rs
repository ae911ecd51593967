//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use upway_config::ConfigError;
use upway_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Request to the data service failed: {message}")]
    #[diagnostic(
        code(upway::connection_failed),
        help("Check your network connection, or raise the timeout with --timeout.")
    )]
    ConnectionFailed {
        message: String,
        status: Option<u16>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(upway::auth_failed),
        help(
            "Verify your credentials.\n\
             Run: upway config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(
        code(upway::not_logged_in),
        help("The session expired. Retry with --force-login.")
    )]
    NotLoggedIn,

    #[error("No {field} configured for profile '{profile}'")]
    #[diagnostic(
        code(upway::no_credentials),
        help(
            "Configure credentials with: upway config init\n\
             Or set UPWAY_PASSWORD / UPWAY_CLIENT_SECRET."
        )
    )]
    NoCredentials { profile: String, field: String },

    // ── Variables ────────────────────────────────────────────────────
    #[error("Unknown variable '{name}'")]
    #[diagnostic(
        code(upway::unknown_variable),
        help("Run: upway variables to see available variables")
    )]
    UnknownVariable { name: String },

    #[error("{variable} is not available on {service}")]
    #[diagnostic(
        code(upway::unsupported_variable),
        help("Run: upway variables --service {service} to see what it reports")
    )]
    UnsupportedVariable { variable: String, service: String },

    // ── Service responses ────────────────────────────────────────────
    #[error("Unexpected response from the data service: {message}")]
    #[diagnostic(code(upway::response))]
    Response { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(upway::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(upway::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: upway config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No configuration found")]
    #[diagnostic(
        code(upway::no_config),
        help(
            "Create one with: upway config init\n\
             Expected at: {path}\n\
             Or pass --service together with credentials."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(upway::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { status, .. } => match status {
                Some(401 | 403) => exit_code::AUTH,
                _ => exit_code::CONNECTION,
            },
            Self::AuthFailed { .. } | Self::NotLoggedIn | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::UnknownVariable { .. }
            | Self::UnsupportedVariable { .. }
            | Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Config(_) => exit_code::USAGE,
            Self::Response { .. } | Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration { field, reason } => Self::Validation { field, reason },
            CoreError::Login { message } => Self::AuthFailed { message },
            CoreError::NotLoggedIn => Self::NotLoggedIn,
            CoreError::Response { message } => Self::Response { message },
            CoreError::UnmappedVariable { id } => Self::Response {
                message: format!("variable id {id} is not in the catalog"),
            },
            CoreError::UnsupportedVariable { variable, service } => Self::UnsupportedVariable {
                variable: variable.to_string(),
                service: service.to_string(),
            },
            CoreError::Transport { message, status } => Self::ConnectionFailed { message, status },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile, field } => Self::NoCredentials { profile, field },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Client(core) => core.into(),
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use upway_core::{DataService, Variable};

    use super::*;

    #[test]
    fn auth_errors_exit_with_auth_code() {
        let err: CliError = CoreError::Login {
            message: "bad password".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert_eq!(CliError::NotLoggedIn.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn rejected_token_exits_with_auth_code() {
        let err: CliError = CoreError::Transport {
            message: "unauthorized".into(),
            status: Some(401),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn transport_errors_exit_with_connection_code() {
        let err: CliError = CoreError::Transport {
            message: "connection refused".into(),
            status: None,
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn config_errors_exit_with_usage_code() {
        let err: CliError = ConfigError::Client(CoreError::Configuration {
            field: "heatpump_id".into(),
            reason: "required when using MyUpway".into(),
        })
        .into();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "heatpump_id"));
        assert_eq!(err.exit_code(), exit_code::USAGE);

        let err: CliError = CoreError::UnsupportedVariable {
            variable: Variable::Version,
            service: DataService::MyUplink,
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "VERSION is not available on MyUplink");
    }

    #[test]
    fn unmapped_ids_are_general_failures() {
        let err: CliError = CoreError::UnmappedVariable { id: 99_999 }.into();
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
