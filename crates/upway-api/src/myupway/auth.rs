// MyUpway portal authentication
//
// Form-based login/logout. A successful login is recognized by the auth
// cookie landing in the session jar, not by the status code: the portal
// answers 200 with the login page again when credentials are wrong.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::Error;
use crate::myupway::client::{AUTH_COOKIE, MyUpwayClient};

impl MyUpwayClient {
    /// Authenticate with email + password.
    ///
    /// `POST /LogIn` with a urlencoded form. Always starts from a fresh
    /// session, so a failed login leaves the client unauthenticated.
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        self.invalidate()?;

        let url = self.url("/LogIn")?;
        debug!("logging in at {url}");

        let form = [
            ("returnUrl", ""),
            ("Email", username),
            ("Password", password.expose_secret()),
        ];

        let resp = self.http().post(url).form(&form).send().await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::http(status, &body));
        }

        if !self.is_authenticated() {
            return Err(Error::Authentication {
                message: format!("portal did not issue a {AUTH_COOKIE} cookie"),
            });
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// `GET /LogOut`. The local session is discarded whatever the portal
    /// answers.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let url = self.url("/LogOut")?;
        debug!("logging out at {url}");

        let result = self.http().get(url).send().await;
        self.invalidate()?;

        let resp = result?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "portal logout returned non-success");
        }

        debug!("logout complete");
        Ok(())
    }
}
