//! Shared application state.

use std::sync::Arc;

use mentor_chat::ChatRelay;
use mentor_core::{RelayConfig, Result};

/// Shared application state accessible from all route handlers.
///
/// Everything here is read-only after startup, so handlers share it without locking.
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub relay: ChatRelay,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self> {
        let config = Arc::new(config);
        let relay = ChatRelay::new(config.clone())?;
        Ok(Self { config, relay })
    }

    /// Build state around an already constructed relay.
    pub fn with_relay(relay: ChatRelay) -> Self {
        let config = relay.config().clone();
        Self { config, relay }
    }
}
