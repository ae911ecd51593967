// MyUpway portal HTTP client
//
// Wraps `reqwest::Client` with the portal's session mechanics. The whole
// session lives in a cookie jar; endpoint methods are implemented as
// inherent methods in sibling files to keep this module focused on
// transport and session state.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Name of the forms-authentication cookie the portal sets on login.
pub const AUTH_COOKIE: &str = ".ASPXAUTH";

/// Language cookie sent from the first request on. The portal localizes
/// state texts (`On`/`Off`), so pin them to English.
const LANGUAGE_COOKIE: &str = "EmilLanguage=en-GB";

/// One portal session: an HTTP client bound to its own cookie jar.
///
/// Sessions are never patched in place -- login and logout replace the
/// whole thing.
struct Session {
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl Session {
    fn open(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(LANGUAGE_COOKIE, base_url);
        let http = transport.build_client_with_jar(&jar)?;
        Ok(Self { http, jar })
    }

    fn has_cookie(&self, url: &Url, name: &str) -> bool {
        let Some(header) = self.jar.cookies(url) else {
            return false;
        };
        header.to_str().is_ok_and(|cookies| {
            cookies
                .split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .any(|(key, _)| key == name)
        })
    }
}

/// Raw HTTP client for the MyUpway portal's private API.
///
/// Returns the portal's wire types; mapping into the unified model
/// happens in `upway-core`.
pub struct MyUpwayClient {
    base_url: Url,
    heatpump_id: u64,
    transport: TransportConfig,
    session: Session,
}

impl MyUpwayClient {
    /// Create a client for one heat pump, starting with an empty session.
    pub fn new(base_url: Url, heatpump_id: u64, transport: &TransportConfig) -> Result<Self, Error> {
        let session = Session::open(&base_url, transport)?;
        Ok(Self {
            base_url,
            heatpump_id,
            transport: transport.clone(),
            session,
        })
    }

    /// The portal base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The heat pump (system) id every request is scoped to.
    pub fn heatpump_id(&self) -> u64 {
        self.heatpump_id
    }

    /// Whether the session jar currently holds the auth cookie.
    pub fn is_authenticated(&self) -> bool {
        self.session.has_cookie(&self.base_url, AUTH_COOKIE)
    }

    /// Drop the current session and start over with an empty jar.
    pub fn invalidate(&mut self) -> Result<(), Error> {
        trace!("resetting portal session");
        self.session = Session::open(&self.base_url, &self.transport)?;
        Ok(())
    }

    /// The HTTP client of the current session.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.session.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join an absolute portal path (e.g. `/LogIn`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST a urlencoded form and decode the JSON response.
    ///
    /// A 401 means the portal dropped the session: the local jar is
    /// reset so `is_authenticated` reflects it.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &mut self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http().post(url).form(form).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.invalidate()?;
            return Err(Error::Unauthorized);
        }

        let body = resp.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(Error::http(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, body))
    }
}
