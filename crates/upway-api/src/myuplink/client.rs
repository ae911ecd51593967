// Async HTTP client for the myUplink REST API.
//
// Auth: OAuth2 client-credentials grant at /oauth/token, then a bearer
// token on every request. The API does not advertise token lifetime, so
// expiry is only ever discovered through a 401.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for the myUplink API.
pub struct MyUplinkClient {
    http: reqwest::Client,
    base_url: Url,
    client_id: String,
    client_secret: SecretString,
    token: Option<SecretString>,
}

impl MyUplinkClient {
    pub fn new(
        base_url: Url,
        client_id: String,
        client_secret: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            client_id,
            client_secret,
            token: None,
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a bearer token has been obtained.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Exchange the client credentials for a fresh bearer token.
    ///
    /// `POST /oauth/token` (form, `grant_type=client_credentials`).
    /// The stored token is replaced only on success.
    pub async fn fetch_token(&mut self) -> Result<(), Error> {
        let url = self.base_url.join("/oauth/token")?;
        debug!("requesting token at {url}");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
        ];

        let resp = self.http.post(url).form(&form).send().await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Authentication {
                message: format!("cannot fetch myUplink token (HTTP {status})"),
            });
        }

        let body = resp.text().await?;
        let token: types::TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body))?;

        self.token = Some(SecretString::from(token.access_token));
        debug!(expires_in = ?token.expires_in, "token acquired");
        Ok(())
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url} params={params:?}");

        let mut req = self.http.get(url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token.expose_secret());
        }

        let resp = req.send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }

        let body = resp.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(Error::http(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body))
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Systems (and their devices) visible to these credentials.
    ///
    /// `GET /v2/systems/me?page=1&itemsPerPage=10`
    pub async fn systems(&self) -> Result<types::SystemsResponse, Error> {
        self.get(
            "/v2/systems/me",
            &[("page", "1".into()), ("itemsPerPage", "10".into())],
        )
        .await
    }

    /// Current data points of a device.
    ///
    /// `GET /v2/devices/{device_id}/points`, filtered with
    /// `?parameters=a,b,c` when `parameters` is given.
    pub async fn points(
        &self,
        device_id: &str,
        parameters: Option<&[u32]>,
    ) -> Result<Vec<types::Point>, Error> {
        let path = format!("/v2/devices/{device_id}/points");
        let params: Vec<(&str, String)> = match parameters {
            Some(ids) if !ids.is_empty() => {
                let joined = ids
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                vec![("parameters", joined)]
            }
            _ => Vec::new(),
        };
        self.get(&path, &params).await
    }
}
