//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use docufix_core::ports::CatalogStore;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub config: Arc<Config>,
}
