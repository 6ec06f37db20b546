//! Contains the [AuthGateCoordinator] and the login-state tracking it performs across the two
//! provider flows.
//!
//! The coordinator owns one credential slot per provider. Spotify's slot is filled through a
//! two-phase redirect flow: [start_spotify_login](AuthGateCoordinator::start_spotify_login)
//! navigates the page away to Spotify's authorization page, and
//! [handle_incoming_redirect](AuthGateCoordinator::handle_incoming_redirect) completes the login
//! once the user lands back with an authorization code. Apple Music's slot is filled by a single
//! token exchange with no redirect step. The transfer action is gated on both slots being
//! populated; no other combination triggers it.
//!
//! # Usage
//!
//! A new coordinator may be built with the
//! [`auth_gate`-function](crate::client::ServiceClient::auth_gate) in
//! [ServiceClient](crate::client::ServiceClient).
//!
//! ```no_run
//! # use tunebridge::client::ServiceClientBuilder;
//! # use tunebridge::model::{Provider, RedirectQuery};
//! # use tunebridge::surface::TransferSurface;
//! # struct Page;
//! # impl TransferSurface for Page {
//! #     fn navigate(&self, _: &str) {}
//! #     fn mark_logged_in(&self, _: Provider) {}
//! #     fn reveal_transfer(&self) {}
//! #     fn alert(&self, _: &str) {}
//! #     fn set_status(&self, _: &str) {}
//! # }
//! # async fn foo() {
//! let service = ServiceClientBuilder::new("http://localhost:5000")
//!     .build()
//!     .expect("failed to build service client");
//!
//! // the surface is whatever renders the controls; here a unit struct standing in for a page
//! let gate = service.auth_gate(Page);
//!
//! // react to the query the page was loaded with. on a plain load this is a no-op; after the
//! // Spotify redirect it completes the Spotify login
//! let query = RedirectQuery::from_query("code=abc&state=spotify");
//! gate.handle_incoming_redirect(&query).await;
//!
//! // the provider logins and the transfer are driven by the page's controls
//! gate.start_apple_music_login().await;
//! gate.start_transfer().await;
//! # }
//! ```

use std::sync::{Arc, RwLock};

use log::{debug, error, warn};

use crate::{
    client::ServiceClient,
    model::{Provider, RedirectQuery, TransferRequest},
    surface::TransferSurface,
};

/// Alert shown when the Spotify login cannot be started.
pub const SPOTIFY_LOGIN_FAILED: &str = "Failed to login to Spotify. Please try again.";
/// Alert shown when the Apple Music login fails.
pub const APPLE_MUSIC_LOGIN_FAILED: &str = "Failed to login to Apple Music. Please try again.";
/// Alert shown when the Spotify authorization code cannot be exchanged for a token.
pub const SPOTIFY_CALLBACK_FAILED: &str = "Failed to complete Spotify login. Please try again.";
/// Alert shown when transfer is attempted before both logins have completed.
pub const BOTH_LOGINS_REQUIRED: &str = "Please login to both Spotify and Apple Music first.";
/// Status text shown while the transfer request is in flight.
pub const TRANSFER_IN_PROGRESS: &str = "Transferring playlist...";
/// Status text shown when the transfer request fails.
pub const TRANSFER_FAILED: &str = "Failed to transfer playlist. Please try again.";

/// The state value the service attaches to its Spotify authorization redirects. Redirects carrying
/// any other state belong to some other flow and are ignored.
const SPOTIFY_REDIRECT_STATE: &str = "spotify";

/// Which provider logins have completed so far.
///
/// Derived from the credential slots on demand. A transfer in flight does not get a state of its
/// own: transfer success and failure both leave the coordinator in
/// [BothAuthed](AuthGateState::BothAuthed), since the tokens persist and the transfer may be
/// retried indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGateState {
    /// Neither provider login has completed.
    NoAuth,
    /// Only the Spotify login has completed.
    SpotifyOnly,
    /// Only the Apple Music login has completed.
    AppleMusicOnly,
    /// Both logins have completed; the transfer action is unlocked.
    BothAuthed,
}

/// Coordinates the two provider login flows and gates the playlist transfer on both having
/// completed.
///
/// Every user-visible effect goes through the [TransferSurface] the coordinator was built with.
/// Failures in any operation are surfaced there and never poison the coordinator; the user may
/// re-trigger any operation after a failure.
///
/// This struct uses `Arc` and interior mutability internally, so you do not need to wrap it in an
/// `Arc` or a `Mutex` in order to share it between event handlers.
pub struct AuthGateCoordinator<S>
where
    S: TransferSurface,
{
    inner: Arc<AuthGateCoordinatorRef<S>>,
}

struct AuthGateCoordinatorRef<S> {
    service: ServiceClient,
    surface: S,

    spotify_token: RwLock<Option<String>>,
    apple_music_token: RwLock<Option<String>>,
}

impl<S> Clone for AuthGateCoordinator<S>
where
    S: TransferSurface,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> AuthGateCoordinator<S>
where
    S: TransferSurface,
{
    pub(crate) fn new(service: ServiceClient, surface: S) -> Self {
        Self {
            inner: Arc::new(AuthGateCoordinatorRef {
                service,
                surface,
                spotify_token: RwLock::new(None),
                apple_music_token: RwLock::new(None),
            }),
        }
    }

    /// Begin the Spotify login flow.
    ///
    /// Requests an authorization URL from the service and navigates the page to it. The navigation
    /// intentionally leaves the current page context; the login completes later through
    /// [handle_incoming_redirect](Self::handle_incoming_redirect) once the user is redirected
    /// back.
    pub async fn start_spotify_login(&self) {
        match self.inner.service.spotify_auth_url().await {
            Ok(auth_url) => {
                debug!("Navigating to Spotify authorization URL");
                self.inner.surface.navigate(&auth_url);
            }

            Err(err) => {
                error!("Failed to login to Spotify: {}", err);
                self.inner.surface.alert(SPOTIFY_LOGIN_FAILED);
            }
        }
    }

    /// Begin and complete the Apple Music login.
    ///
    /// The service exchanges the Apple Music token in a single call, so unlike Spotify there is no
    /// redirect step and the credential slot is filled before this function returns.
    pub async fn start_apple_music_login(&self) {
        match self.inner.service.apple_music_token().await {
            Ok(token) => self.complete_login(Provider::AppleMusic, token),

            Err(err) => {
                error!("Failed to login to Apple Music: {}", err);
                self.inner.surface.alert(APPLE_MUSIC_LOGIN_FAILED);
            }
        }
    }

    /// React to the query parameters the page was loaded with.
    ///
    /// Acts only when the query carries an authorization code and the Spotify state; anything
    /// else, including another flow's callback, is ignored without error. On success the Spotify
    /// credential slot is filled and the transfer control is revealed if the Apple Music login has
    /// also completed.
    pub async fn handle_incoming_redirect(&self, query: &RedirectQuery) {
        let code = match (&query.code, &query.state) {
            (Some(code), Some(state)) if state == SPOTIFY_REDIRECT_STATE => code,

            _ => {
                debug!("Page query does not carry a Spotify authorization redirect; ignoring");
                return;
            }
        };

        match self.inner.service.exchange_spotify_code(code).await {
            Ok(token) => self.complete_login(Provider::Spotify, token),

            Err(err) => {
                error!("Failed to complete Spotify login: {}", err);
                self.inner.surface.alert(SPOTIFY_CALLBACK_FAILED);
            }
        }
    }

    /// Send both tokens to the service's transfer endpoint and report the outcome through the
    /// status display.
    ///
    /// Gated on both logins having completed: with either token missing, the user is alerted and
    /// nothing is sent. The tokens are never consumed, so a failed transfer may be retried without
    /// logging in again.
    pub async fn start_transfer(&self) {
        let request = match self.transfer_request() {
            Some(request) => request,

            None => {
                warn!("Transfer attempted without both provider tokens");
                self.inner.surface.alert(BOTH_LOGINS_REQUIRED);
                return;
            }
        };

        self.inner.surface.set_status(TRANSFER_IN_PROGRESS);

        match self.inner.service.transfer(&request).await {
            Ok(message) => self.inner.surface.set_status(&message),

            Err(err) => {
                error!("Failed to transfer playlist: {}", err);
                self.inner.surface.set_status(TRANSFER_FAILED);
            }
        }
    }

    /// Returns which provider logins have completed so far.
    pub fn state(&self) -> AuthGateState {
        match (self.spotify_token().is_some(), self.apple_music_token().is_some()) {
            (false, false) => AuthGateState::NoAuth,
            (true, false) => AuthGateState::SpotifyOnly,
            (false, true) => AuthGateState::AppleMusicOnly,
            (true, true) => AuthGateState::BothAuthed,
        }
    }

    /// Whether both provider logins have completed, unlocking the transfer action.
    pub fn gate_open(&self) -> bool {
        self.state() == AuthGateState::BothAuthed
    }

    /// Returns the current Spotify access token, if the Spotify login has completed.
    ///
    /// This function returns an owned String by cloning the stored token.
    pub fn spotify_token(&self) -> Option<String> {
        self.inner
            .spotify_token
            .read()
            .expect("spotify token rwlock poisoned")
            .clone()
    }

    /// Returns the current Apple Music access token, if the Apple Music login has completed.
    ///
    /// This function returns an owned String by cloning the stored token.
    pub fn apple_music_token(&self) -> Option<String> {
        self.inner
            .apple_music_token
            .read()
            .expect("apple music token rwlock poisoned")
            .clone()
    }

    /// Builds the transfer payload from the two credential slots. Returns [None] unless both
    /// logins have completed.
    pub fn transfer_request(&self) -> Option<TransferRequest> {
        Some(TransferRequest {
            spotify_token: self.spotify_token()?,
            apple_music_token: self.apple_music_token()?,
        })
    }

    fn complete_login(&self, provider: Provider, token: String) {
        debug!("Storing access token for provider: {}", provider);

        match provider {
            Provider::Spotify => {
                *self
                    .inner
                    .spotify_token
                    .write()
                    .expect("spotify token rwlock poisoned") = Some(token)
            }

            Provider::AppleMusic => {
                *self
                    .inner
                    .apple_music_token
                    .write()
                    .expect("apple music token rwlock poisoned") = Some(token)
            }
        }

        self.inner.surface.mark_logged_in(provider);

        if self.gate_open() {
            self.inner.surface.reveal_transfer();
        }
    }
}
