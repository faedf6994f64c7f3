//! [`Http`] [`Api`] implementation.

use std::time::Duration;

use common::operations::{By, Perform, Select};
use secrecy::ExposeSecret as _;
use serde::de::DeserializeOwned;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::domain::{session::Token, Identity};

use super::{Api, Authenticated, Credentials, Error};

/// [`Http`] client configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the API server.
    #[default("http://127.0.0.1:8000".to_owned())]
    pub base_url: String,

    /// Path of the endpoint issuing access tokens.
    #[default("/api/v1/auth/login".to_owned())]
    pub login_path: String,

    /// Path of the endpoint returning the current [`Identity`].
    #[default("/api/v1/auth/me".to_owned())]
    pub me_path: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(30))]
    pub timeout: Duration,
}

/// HTTP client of the authentication [`Api`].
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying [`reqwest::Client`].
    client: reqwest::Client,

    /// [`Config`] of this [`Http`] client.
    config: Config,
}

impl Http {
    /// Creates a new [`Http`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to initialize the underlying [`reqwest::Client`].
    pub fn new(config: Config) -> Result<Self, Traced<Error>> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        Ok(Self { client, config })
    }

    /// Returns the full URL of the provided endpoint `path`.
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/'),
        )
    }

    /// Decodes the provided [`reqwest::Response`] as JSON, if successful.
    async fn decode<T: DeserializeOwned>(
        res: reqwest::Response,
    ) -> Result<T, Traced<Error>> {
        let status = res.status();
        if !status.is_success() {
            log::debug!("`{}` responded with `{status}`", res.url());
            return Err(tracerr::new!(Error::Rejected(status)));
        }

        let body = res.text().await.map_err(tracerr::from_and_wrap!(=> Error))?;
        serde_json::from_str(&body).map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Api<Perform<Credentials>> for Http {
    type Ok = Authenticated;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(credentials): Perform<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        let Credentials { email, password } = credentials;
        let username: &str = email.as_ref();
        let password: &str = password.expose_secret().as_ref();

        let res = self
            .client
            .post(self.url(&self.config.login_path))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Self::decode(res).await.map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Identity, Token>>> for Http {
    type Ok = Identity;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Identity, Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token: &str = by.inner().as_ref();

        let res = self
            .client
            .get(self.url(&self.config.me_path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Self::decode(res).await.map_err(tracerr::wrap!())
    }
}
