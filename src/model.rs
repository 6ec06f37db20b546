//! Types that cross the wire between the coordinator and the transfer service, plus the query
//! parameters the page is loaded with after an authorization redirect.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// The two music providers the transfer service authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Spotify,
    AppleMusic,
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Spotify => write!(f, "spotify"),
            Provider::AppleMusic => write!(f, "apple-music"),
        }
    }
}

/// Query parameters carried by the page URL when it is loaded.
///
/// Derived from the incoming URL once at startup and consumed at most once. Only an authorization
/// redirect carries both a `code` and a `state`; on a plain page load both are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

impl RedirectQuery {
    /// Parse the query parameters out of a full page URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        Ok(Self::from_query(url.query().unwrap_or_default()))
    }

    /// Parse a bare query string. A leading `?` is tolerated so the browser's location search
    /// string may be passed in as-is.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut redirect_query = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "code" => redirect_query.code = Some(value.into_owned()),
                "state" => redirect_query.state = Some(value.into_owned()),
                _ => (),
            }
        }

        redirect_query
    }
}

/// Payload for the service's transfer endpoint. Built on demand from the two credential slots and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    pub spotify_token: String,
    pub apple_music_token: String,
}

/// Liveness report from the service's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthUrlResponse {
    pub auth_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransferResponse {
    pub message: String,
}
