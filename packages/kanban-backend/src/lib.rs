/// Kanban board service: config loading, storage init, HTTP server.
pub mod api;
pub mod config;
pub mod server;
pub mod state;

use kanban_core::storage::local::LocalStorage;
use kanban_core::storage::memory::MemoryStorage;
use kanban_core::storage::StorageError;

use crate::config::ServiceConfig;
use crate::state::Stores;

/// Storage selected by the config: the data file when set, memory otherwise.
/// Accounts and boards share the same store.
pub fn open_storage(config: &ServiceConfig) -> Result<Stores, StorageError> {
    match &config.data_file {
        Some(path) => {
            let storage = LocalStorage::open(path)?;
            log::info!("Using data file {}", path.display());
            Ok(Stores::new(storage))
        }
        None => {
            log::warn!("No data_file configured, accounts and boards are kept in memory only");
            Ok(Stores::new(MemoryStorage::new()))
        }
    }
}
