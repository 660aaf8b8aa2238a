use std::sync::Arc;

use emargement_core::gate::SignatureGate;
use emargement_core::store::{ParticipantDirectory, Store};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. The store and directory are trait objects so tests can
/// run the real router against the in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub directory: Arc<dyn ParticipantDirectory>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Signature gate over this state's store, tuned from config.
    pub fn gate(&self) -> SignatureGate<'_, dyn Store, dyn ParticipantDirectory> {
        SignatureGate::with_config(
            self.store.as_ref(),
            self.directory.as_ref(),
            self.config.gate_config(),
        )
    }
}
