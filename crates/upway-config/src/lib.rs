//! Shared configuration for upway tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `upway_core::ClientConfig`. The CLI layers its
//! flag overrides on top of [`profile_to_builder`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use upway_core::{ClientConfig, ClientConfigBuilder, CoreError, DataService};

/// Keyring service name; entries are keyed `"{profile}/{field}"`.
const KEYRING_SERVICE: &str = "upway";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {field} configured for profile '{profile}'")]
    NoCredentials { profile: String, field: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error(transparent)]
    Client(#[from] CoreError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, else the default.
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named connection profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// "myupway" or "myuplink".
    pub service: Option<DataService>,

    /// MyUpway login email.
    pub username: Option<String>,

    /// MyUpway password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the MyUpway password.
    pub password_env: Option<String>,

    /// MyUpway heat pump (system) id.
    pub heatpump_id: Option<u64>,

    /// myUplink OAuth client id.
    pub client_id: Option<String>,

    /// myUplink client secret (plaintext -- prefer keyring or env var).
    pub client_secret: Option<String>,

    /// Environment variable name containing the client secret.
    pub client_secret_env: Option<String>,

    /// Override the service URL.
    pub base_url: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "upway", "upway").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("upway");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, then `UPWAY_*` environment overrides.
///
/// Nested keys use a double underscore: `UPWAY_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UPWAY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a secret: profile-named env var, `fallback_env`, keyring,
/// then plaintext in the profile.
fn resolve_secret(
    profile_name: &str,
    field: &str,
    named_env: Option<&str>,
    fallback_env: &str,
    plaintext: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. Env vars
    if let Some(val) = named_env
        .into_iter()
        .chain(std::iter::once(fallback_env))
        .find_map(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{field}")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(val) = plaintext {
        return Ok(SecretString::from(val.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        field: field.into(),
    })
}

/// MyUpway password for `profile`.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile_name,
        "password",
        profile.password_env.as_deref(),
        "UPWAY_PASSWORD",
        profile.password.as_deref(),
    )
}

/// myUplink client secret for `profile`.
pub fn resolve_client_secret(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile_name,
        "client-secret",
        profile.client_secret_env.as_deref(),
        "UPWAY_CLIENT_SECRET",
        profile.client_secret.as_deref(),
    )
}

// ── ClientConfig translation ────────────────────────────────────────

/// Builder pre-filled from a profile, for callers that override fields.
///
/// Only the secret the selected service needs is resolved. The service
/// comes from `service`, else the profile; validation happens in
/// [`ClientConfigBuilder::build`].
pub fn profile_to_builder(
    profile: &Profile,
    profile_name: &str,
    service: Option<DataService>,
) -> Result<ClientConfigBuilder, ConfigError> {
    let service = service
        .or(profile.service)
        .ok_or_else(|| ConfigError::Validation {
            field: "service".into(),
            reason: format!("profile '{profile_name}' does not name a service"),
        })?;

    let mut builder = ClientConfig::builder(service);

    match service {
        DataService::MyUpway => {
            if let Some(ref username) = profile.username {
                builder = builder.username(username.clone());
            }
            if let Some(id) = profile.heatpump_id {
                builder = builder.heatpump_id(id);
            }
            builder = builder.password(resolve_password(profile, profile_name)?);
        }
        DataService::MyUplink => {
            if let Some(ref client_id) = profile.client_id {
                builder = builder.client_id(client_id.clone());
            }
            builder = builder.client_secret(resolve_client_secret(profile, profile_name)?);
        }
    }

    if let Some(ref raw) = profile.base_url {
        let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
        builder = builder.base_url(url);
    }

    if let Some(secs) = profile.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder)
}

/// Build a validated `ClientConfig` from a profile, with no overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    Ok(profile_to_builder(profile, profile_name, None)?.build()?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use upway_core::AuthCredentials;

    use super::*;

    fn portal_profile() -> Profile {
        Profile {
            service: Some(DataService::MyUpway),
            username: Some("user@example.com".into()),
            password: Some("hunter2".into()),
            heatpump_id: Some(12345),
            ..Profile::default()
        }
    }

    #[test]
    fn parses_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "home"

[defaults]
output = "json"

[profiles.home]
service = "myupway"
username = "user@example.com"
heatpump_id = 12345

[profiles.cabin]
service = "myuplink"
client_id = "abc"
client_secret_env = "CABIN_SECRET"
timeout = 10
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.profile_name(None), "home");
        assert_eq!(config.profile_name(Some("cabin")), "cabin");
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout, 30);

        let home = config.profile("home").unwrap();
        assert_eq!(home.service, Some(DataService::MyUpway));
        assert_eq!(home.heatpump_id, Some(12345));

        let cabin = config.profile("cabin").unwrap();
        assert_eq!(cabin.service, Some(DataService::MyUplink));
        assert_eq!(cabin.client_secret_env.as_deref(), Some("CABIN_SECRET"));
        assert_eq!(cabin.timeout, Some(10));

        assert!(matches!(
            config.profile("missing"),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.profile_name(None), "default");
        assert_eq!(config.defaults.output, "table");
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert("default".into(), portal_profile());
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.username.as_deref(), Some("user@example.com"));
        assert_eq!(profile.heatpump_id, Some(12345));
    }

    #[test]
    fn portal_profile_builds_client_config() {
        let config = profile_to_client_config(&portal_profile(), "upway-test-portal").unwrap();

        assert_eq!(config.service(), DataService::MyUpway);
        assert!(matches!(
            config.auth(),
            AuthCredentials::Portal {
                heatpump_id: 12345,
                ..
            }
        ));
    }

    #[test]
    fn uplink_profile_honours_overrides() {
        let profile = Profile {
            service: Some(DataService::MyUplink),
            client_id: Some("abc".into()),
            client_secret: Some("s3cret".into()),
            base_url: Some("http://127.0.0.1:9000".into()),
            timeout: Some(5),
            ..Profile::default()
        };

        let config = profile_to_client_config(&profile, "upway-test-uplink").unwrap();
        assert_eq!(config.service(), DataService::MyUplink);
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn profile_without_service_is_rejected() {
        let profile = Profile {
            service: None,
            ..portal_profile()
        };
        let err = profile_to_builder(&profile, "upway-test-none", None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "service"));

        // an explicit service overrides the profile
        let builder =
            profile_to_builder(&profile, "upway-test-none", Some(DataService::MyUpway)).unwrap();
        assert_eq!(builder.build().unwrap().service(), DataService::MyUpway);
    }

    #[test]
    fn missing_heatpump_id_surfaces_core_validation() {
        let profile = Profile {
            heatpump_id: None,
            ..portal_profile()
        };
        let err = profile_to_client_config(&profile, "upway-test-no-id").unwrap_err();
        assert!(
            matches!(err, ConfigError::Client(CoreError::Configuration { ref field, .. }) if field == "heatpump_id"),
            "got: {err:?}"
        );
    }

    #[test]
    fn bad_base_url_is_validation_error() {
        let profile = Profile {
            base_url: Some("not a url".into()),
            ..portal_profile()
        };
        let err = profile_to_client_config(&profile, "upway-test-url").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));
    }
}
