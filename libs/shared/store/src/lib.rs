pub mod memory;

use std::sync::Arc;

use shared_config::AppConfig;

pub use memory::{MemoryStore, StoreError};

/// Shared axum state: configuration plus the one store instance every
/// cell router operates against.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
        }
    }
}
