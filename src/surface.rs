//! The seam between the coordinator and whatever user interface hosts it.

use crate::model::Provider;

/// The user-visible controls the coordinator drives.
///
/// The coordinator never renders anything itself; every user-visible effect goes through this
/// trait, implemented by the embedding application. All methods take `&self` so a surface may be
/// shared between the coordinator and the application's own event handling; implementations that
/// need to mutate display state should use interior mutability.
pub trait TransferSurface {
    /// Navigate the whole page to the given URL. This is a full navigation that leaves the current
    /// page context, not an in-page fetch.
    fn navigate(&self, url: &str);

    /// Switch the given provider's login control to its logged-in, disabled display state.
    fn mark_logged_in(&self, provider: Provider);

    /// Make the transfer control visible.
    fn reveal_transfer(&self);

    /// Show a blocking alert.
    fn alert(&self, message: &str);

    /// Replace the status display text.
    fn set_status(&self, message: &str);
}
