//! API handlers for the Droply web API.

pub mod file;
pub mod trash;

pub use file::*;
pub use trash::*;

use std::sync::Arc;

use crate::config::DeletionConfig;
use crate::db::Database;
use crate::file::ObjectStore;

/// Shared database handle.
pub type SharedDatabase = Arc<Database>;

/// State shared by every handler.
pub struct AppState {
    /// Database pool.
    pub db: SharedDatabase,
    /// Remote object store.
    pub object_store: Arc<dyn ObjectStore>,
    /// Deletion settings.
    pub deletion: DeletionConfig,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: SharedDatabase, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            db,
            object_store,
            deletion: DeletionConfig::default(),
        }
    }

    /// Use the given deletion settings.
    pub fn with_deletion_config(mut self, config: DeletionConfig) -> Self {
        self.deletion = config;
        self
    }
}
