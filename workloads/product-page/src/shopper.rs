//! Per-shopper state kept in the session store.

use serde::{Deserialize, Serialize};
use turbo_cache::SessionId;
use turbo_commerce::cart::Bag;
use turbo_commerce::notify::{Toast, ToastLog};

/// Cookie carrying the shopper's session id.
pub const SESSION_COOKIE: &str = "ignite_session";

/// What the session store holds for one shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopperSession {
    /// The shopper's bag.
    pub bag: Bag,
    /// Toasts waiting to be shown on the next page view.
    pub flash: ToastLog,
}

impl ShopperSession {
    /// Take the pending toasts for display.
    ///
    /// Each toast is shown once; the caller must persist the session
    /// afterwards if anything was taken.
    pub fn take_view(&mut self) -> ShopperView {
        ShopperView {
            bag_count: self.bag.count(),
            toasts: self.flash.drain(),
        }
    }
}

/// The per-shopper parts of a rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopperView {
    /// Units in the bag, for the header badge.
    pub bag_count: u32,
    /// Toasts to show on this page.
    pub toasts: Vec<Toast>,
}

impl ShopperView {
    /// Whether the page carries anything specific to this shopper, which
    /// makes it unfit for shared caches.
    pub fn is_personalized(&self) -> bool {
        self.bag_count > 0 || !self.toasts.is_empty()
    }
}

/// `Set-Cookie` value binding the session to the browser.
pub fn session_cookie(id: &SessionId) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        id,
        60 * 60 * 24 * 30
    )
}
