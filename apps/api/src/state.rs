use std::sync::Arc;

use crate::auth::SessionStore;
use crate::career::CareerAdvisor;
use crate::config::Config;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Users and profile documents. Default: `FileStore` under `DATA_DIR`.
    pub store: Arc<dyn Store>,
    pub advisor: CareerAdvisor,
    pub sessions: SessionStore,
    pub config: Config,
}
