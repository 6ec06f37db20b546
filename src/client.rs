pub(crate) mod coordinator;

pub use self::coordinator::{AuthGateCoordinator, AuthGateState};

use std::sync::Arc;

use const_format::concatcp;
use log::debug;
use reqwest::{Client as AsyncClient, Url};

use crate::{
    error::{Error, Result},
    model::{AccessTokenResponse, AuthUrlResponse, ServiceHealth, TransferRequest, TransferResponse},
    surface::TransferSurface,
};

const DEFAULT_USER_AGENT: &str = concatcp!("tunebridge/", env!("CARGO_PKG_VERSION"));

// collaborator endpoints, relative to the service base URL
const LOGIN_SPOTIFY_ENDPOINT: &str = "login/spotify";
const LOGIN_APPLE_MUSIC_ENDPOINT: &str = "login/apple-music";
const CALLBACK_SPOTIFY_ENDPOINT: &str = "callback/spotify";
const TRANSFER_ENDPOINT: &str = "transfer";
const HEALTH_ENDPOINT: &str = "health";

/// A client for the transfer service's HTTP endpoints.
///
/// The service implements the provider OAuth handshakes and the playlist copy itself; this client
/// only consumes them. A new client may be built with [ServiceClientBuilder].
///
/// This client uses `Arc` internally, so you do not need to wrap it in an `Arc` in order to reuse
/// it.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    inner: Arc<ServiceClientRef>,
    http_client: AsyncClient,
}

#[derive(Debug)]
struct ServiceClientRef {
    base_url: Url,
}

/// Builder for [ServiceClient].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: String,
    user_agent: Option<String>,
}

impl ServiceClient {
    /// Returns a new [AuthGateCoordinator] with both credential slots empty, driving the given
    /// surface.
    pub fn auth_gate<S>(&self, surface: S) -> AuthGateCoordinator<S>
    where
        S: TransferSurface,
    {
        AuthGateCoordinator::new(self.clone(), surface)
    }

    /// Request the Spotify authorization URL the user should be navigated to.
    pub async fn spotify_auth_url(&self) -> Result<String> {
        debug!("Requesting Spotify authorization URL");

        let response = self
            .http_client
            .get(self.endpoint_url(LOGIN_SPOTIFY_ENDPOINT))
            .send()
            .await?;

        let auth_url_response: AuthUrlResponse = extract_error_status(response)?.json().await?;
        debug!("Got Spotify authorization URL: {}", auth_url_response.auth_url);

        Ok(auth_url_response.auth_url)
    }

    /// Request an Apple Music access token.
    ///
    /// Unlike Spotify's two-phase redirect flow, the service exchanges the Apple Music token in
    /// this single call with no redirect step.
    pub async fn apple_music_token(&self) -> Result<String> {
        debug!("Requesting Apple Music access token");

        let response = self
            .http_client
            .get(self.endpoint_url(LOGIN_APPLE_MUSIC_ENDPOINT))
            .send()
            .await?;

        let token_response: AccessTokenResponse = extract_error_status(response)?.json().await?;
        debug!("Got token response for Apple Music login: {:?}", token_response);

        Ok(token_response.access_token)
    }

    /// Exchange an authorization code from the Spotify redirect for an access token.
    pub async fn exchange_spotify_code(&self, code: &str) -> Result<String> {
        debug!("Exchanging Spotify authorization code for an access token");

        let mut url = self.endpoint_url(CALLBACK_SPOTIFY_ENDPOINT);
        url.query_pairs_mut().append_pair("code", code);

        let response = self.http_client.get(url).send().await?;

        let token_response: AccessTokenResponse = extract_error_status(response)?.json().await?;
        debug!("Got token response for Spotify callback: {:?}", token_response);

        Ok(token_response.access_token)
    }

    /// Ask the service to copy the playlist, authenticated with both provider tokens. Returns the
    /// service's human-readable outcome message.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<String> {
        debug!("Requesting playlist transfer");

        let response = self
            .http_client
            .post(self.endpoint_url(TRANSFER_ENDPOINT))
            .json(request)
            .send()
            .await?;

        let transfer_response: TransferResponse = extract_error_status(response)?.json().await?;
        debug!("Got transfer response: {:?}", transfer_response);

        Ok(transfer_response.message)
    }

    /// Probe the service's health endpoint.
    pub async fn health(&self) -> Result<ServiceHealth> {
        let response = self.http_client.get(self.endpoint_url(HEALTH_ENDPOINT)).send().await?;

        Ok(extract_error_status(response)?.json().await?)
    }

    fn endpoint_url(&self, endpoint: &str) -> Url {
        // joining fails only if the endpoint constant is malformed, not the base URL. if this
        // method fails, there's a bug in the library
        self.inner
            .base_url
            .join(endpoint)
            .expect("failed to build endpoint URL")
    }
}

impl ServiceClientBuilder {
    pub fn new<S>(base_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            base_url: base_url.into(),
            user_agent: None,
        }
    }

    /// Override the user agent the client identifies itself with. Defaults to
    /// `tunebridge/<crate version>`.
    pub fn user_agent<S>(self, user_agent: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            user_agent: Some(user_agent.into()),
            ..self
        }
    }

    pub fn build(self) -> Result<ServiceClient> {
        // without a trailing slash Url::join would replace the last path segment of the base URL
        // instead of appending to it
        let base_url = if self.base_url.ends_with('/') {
            Url::parse(&self.base_url)?
        } else {
            Url::parse(&format!("{}/", self.base_url))?
        };

        let http_client = AsyncClient::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(ServiceClient {
            inner: Arc::new(ServiceClientRef { base_url }),
            http_client,
        })
    }
}

/// Takes a response and maps any non-success status into an error without touching the body. On
/// success returns the given response without modifying it.
fn extract_error_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::ErrorStatus(status.as_u16()))
    }
}
