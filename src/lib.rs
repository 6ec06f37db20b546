//! A client-side coordinator for a two-provider playlist transfer service.
//!
//! The transfer service copies a playlist from Spotify to Apple Music, but before it can, the user
//! has to complete two independent logins: a two-phase Spotify authorization redirect and a
//! single-call Apple Music token exchange. This crate tracks those two asynchronously-completing
//! flows with [AuthGateCoordinator](client::AuthGateCoordinator) and gates the transfer action on
//! both having succeeded. The OAuth internals and the playlist copy itself live in the service;
//! the crate only consumes its HTTP endpoints through [ServiceClient](client::ServiceClient).
//!
//! User-visible effects (navigation, control states, alerts, the status display) go through the
//! [TransferSurface](surface::TransferSurface) trait, implemented by the embedding application.
//!
//! See the [AuthGateCoordinator](client::AuthGateCoordinator) documentation for a usage example.

pub mod client;
pub mod error;
pub mod model;
pub mod surface;

pub use crate::{
    client::{AuthGateCoordinator, AuthGateState, ServiceClient, ServiceClientBuilder},
    error::{Error, Result},
    model::{Provider, RedirectQuery, TransferRequest},
    surface::TransferSurface,
};
