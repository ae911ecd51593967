// ── Runtime connection configuration ──
//
// These types describe *how* to reach a data service. They carry
// credential data and connection tuning, but never touch disk.
// The CLI (via upway-config) builds a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use upway_api::{DataService, TlsMode, TransportConfig};

use crate::error::CoreError;

/// How to authenticate with a service. The variant decides the service.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// MyUpway portal login for one heat pump.
    Portal {
        username: String,
        password: SecretString,
        heatpump_id: u64,
    },
    /// myUplink OAuth2 client credentials.
    ClientCredentials {
        client_id: String,
        client_secret: SecretString,
    },
}

impl AuthCredentials {
    pub fn service(&self) -> DataService {
        match self {
            Self::Portal { .. } => DataService::MyUpway,
            Self::ClientCredentials { .. } => DataService::MyUplink,
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
}

/// Validated configuration for one client.
///
/// Only obtainable through [`ClientConfig::builder`], so holding one
/// means the credentials for its service are complete. Fields are
/// private; a struct literal does not compile outside this crate:
///
/// ```compile_fail
/// # use std::time::Duration;
/// # use upway_core::{AuthCredentials, ClientConfig, TlsVerification};
/// let config = ClientConfig {
///     auth: AuthCredentials::ClientCredentials {
///         client_id: String::new(),
///         client_secret: String::new().into(),
///     },
///     base_url: "https://api.myuplink.com".parse().unwrap(),
///     tls: TlsVerification::SystemDefaults,
///     timeout: Duration::from_secs(30),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    auth: AuthCredentials,
    base_url: Url,
    tls: TlsVerification,
    timeout: Duration,
}

impl ClientConfig {
    pub fn builder(service: DataService) -> ClientConfigBuilder {
        ClientConfigBuilder::new(service)
    }

    pub fn service(&self) -> DataService {
        self.auth.service()
    }

    pub fn auth(&self) -> &AuthCredentials {
        &self.auth
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tls(&self) -> &TlsVerification {
        &self.tls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Transport settings for the HTTP clients.
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: self.timeout,
        }
    }
}

/// Collects optional settings, then validates them against the service.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    service: DataService,
    username: Option<String>,
    password: Option<SecretString>,
    heatpump_id: Option<u64>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    base_url: Option<Url>,
    tls: TlsVerification,
    timeout: Duration,
}

impl ClientConfigBuilder {
    fn new(service: DataService) -> Self {
        Self {
            service,
            username: None,
            password: None,
            heatpump_id: None,
            client_id: None,
            client_secret: None,
            base_url: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    pub fn heatpump_id(mut self, id: u64) -> Self {
        self.heatpump_id = Some(id);
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, secret: SecretString) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Override the service URL (test servers, proxies).
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn tls(mut self, tls: TlsVerification) -> Self {
        self.tls = tls;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate and build. Empty strings and a zero heat pump id count
    /// as missing.
    pub fn build(self) -> Result<ClientConfig, CoreError> {
        let service = self.service;

        let auth = match service {
            DataService::MyUpway => AuthCredentials::Portal {
                username: non_empty(self.username).ok_or_else(|| CoreError::missing("username", service))?,
                password: non_empty_secret(self.password)
                    .ok_or_else(|| CoreError::missing("password", service))?,
                heatpump_id: self
                    .heatpump_id
                    .filter(|id| *id != 0)
                    .ok_or_else(|| CoreError::missing("heatpump_id", service))?,
            },
            DataService::MyUplink => AuthCredentials::ClientCredentials {
                client_id: non_empty(self.client_id)
                    .ok_or_else(|| CoreError::missing("client_id", service))?,
                client_secret: non_empty_secret(self.client_secret)
                    .ok_or_else(|| CoreError::missing("client_secret", service))?,
            },
        };

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(service.default_base_url()).map_err(|e| CoreError::Configuration {
                field: "base_url".into(),
                reason: e.to_string(),
            })?,
        };

        Ok(ClientConfig {
            auth,
            base_url,
            tls: self.tls,
            timeout: self.timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_secret(value: Option<SecretString>) -> Option<SecretString> {
    value.filter(|v| !v.expose_secret().is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn field_of(err: &CoreError) -> &str {
        match err {
            CoreError::Configuration { field, .. } => field,
            other => panic!("expected Configuration error, got: {other:?}"),
        }
    }

    fn portal() -> ClientConfigBuilder {
        ClientConfig::builder(DataService::MyUpway)
            .username("test_user")
            .password(secret("test_pass"))
            .heatpump_id(123)
    }

    fn uplink() -> ClientConfigBuilder {
        ClientConfig::builder(DataService::MyUplink)
            .client_id("client_id")
            .client_secret(secret("client_secret"))
    }

    #[test]
    fn portal_config_builds() {
        let config = portal().build().unwrap();
        assert_eq!(config.service(), DataService::MyUpway);
        assert_eq!(config.base_url.as_str(), "https://www.myupway.com/");
        match config.auth {
            AuthCredentials::Portal {
                username,
                heatpump_id,
                ..
            } => {
                assert_eq!(username, "test_user");
                assert_eq!(heatpump_id, 123);
            }
            AuthCredentials::ClientCredentials { .. } => panic!("wrong credentials kind"),
        }
    }

    #[test]
    fn uplink_config_builds() {
        let config = uplink().build().unwrap();
        assert_eq!(config.service(), DataService::MyUplink);
        assert_eq!(config.base_url.as_str(), "https://api.myuplink.com/");
    }

    #[test]
    fn portal_requires_username() {
        let err = ClientConfig::builder(DataService::MyUpway)
            .password(secret("test_pass"))
            .heatpump_id(123)
            .build()
            .unwrap_err();
        assert_eq!(field_of(&err), "username");
        assert!(err.to_string().contains("MyUpway"));
    }

    #[test]
    fn portal_requires_password() {
        let err = ClientConfig::builder(DataService::MyUpway)
            .username("test_user")
            .heatpump_id(123)
            .build()
            .unwrap_err();
        assert_eq!(field_of(&err), "password");
    }

    #[test]
    fn portal_requires_heatpump_id() {
        let err = ClientConfig::builder(DataService::MyUpway)
            .username("test_user")
            .password(secret("test_pass"))
            .build()
            .unwrap_err();
        assert_eq!(field_of(&err), "heatpump_id");

        let err = portal().heatpump_id(0).build().unwrap_err();
        assert_eq!(field_of(&err), "heatpump_id");
    }

    #[test]
    fn uplink_requires_client_id() {
        let err = ClientConfig::builder(DataService::MyUplink)
            .client_secret(secret("client_secret"))
            .build()
            .unwrap_err();
        assert_eq!(field_of(&err), "client_id");
        assert!(err.to_string().contains("MyUplink"));
    }

    #[test]
    fn uplink_requires_client_secret() {
        let err = ClientConfig::builder(DataService::MyUplink)
            .client_id("client_id")
            .build()
            .unwrap_err();
        assert_eq!(field_of(&err), "client_secret");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let err = portal().username("").build().unwrap_err();
        assert_eq!(field_of(&err), "username");

        let err = uplink().client_secret(secret("")).build().unwrap_err();
        assert_eq!(field_of(&err), "client_secret");
    }

    #[test]
    fn portal_credentials_are_not_required_for_uplink() {
        // portal fields are ignored rather than rejected
        let config = uplink().username("someone").build().unwrap();
        assert_eq!(config.service(), DataService::MyUplink);
    }

    #[test]
    fn base_url_override() {
        let url = Url::parse("http://127.0.0.1:8080").unwrap();
        let config = uplink().base_url(url.clone()).build().unwrap();
        assert_eq!(config.base_url, url);
    }

    #[test]
    fn accessors_expose_validated_settings() {
        let config = portal().timeout(Duration::from_secs(5)).build().unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.tls(), &TlsVerification::SystemDefaults);
        assert_eq!(config.base_url().as_str(), "https://www.myupway.com/");
        assert!(matches!(
            config.auth(),
            AuthCredentials::Portal { heatpump_id: 123, .. }
        ));
    }
}
