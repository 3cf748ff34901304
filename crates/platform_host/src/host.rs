//! Shared host-service bundle injected into the storefront state core.

use std::rc::Rc;

use crate::{NotificationService, PrefsStore};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed composition (`localStorage`).
    Browser,
    /// In-memory composition used by native builds and tests.
    Memory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Memory => "memory",
        }
    }
}

/// Runtime-selected host service bundle.
///
/// All environment-specific service selection happens before this bundle crosses into
/// `storefront_state`, which keeps the stores decoupled from browser adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Durable key-value store shared by the cart and recently-viewed stores.
    pub prefs: Rc<dyn PrefsStore>,
    /// Notice delivery service.
    pub notifications: Rc<dyn NotificationService>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds a bundle from explicit services.
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        notifications: Rc<dyn NotificationService>,
        host_strategy: HostStrategy,
    ) -> Self {
        Self {
            prefs,
            notifications,
            host_strategy,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
