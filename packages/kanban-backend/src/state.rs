/// Shared application state passed to axum handlers.

use std::sync::Arc;

use kanban_core::session::{AccountStore, Accounts, SessionStore};
use kanban_core::storage::BoardStorage;

/// One backing store seen through both of its interfaces.
#[derive(Clone)]
pub struct Stores {
    pub boards: Arc<dyn BoardStorage>,
    pub accounts: Arc<dyn AccountStore>,
}

impl Stores {
    pub fn new<S: BoardStorage + AccountStore + 'static>(store: S) -> Self {
        let store = Arc::new(store);
        Self {
            boards: store.clone(),
            accounts: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn BoardStorage>,
    pub accounts: Arc<Accounts>,
    pub sessions: Arc<SessionStore>,
    pub port: u16,
    pub bind_address: String,
}

impl AppState {
    pub fn new(stores: Stores, port: u16, bind_address: &str) -> Self {
        Self {
            storage: stores.boards,
            accounts: Arc::new(Accounts::new(stores.accounts)),
            sessions: Arc::new(SessionStore::new()),
            port,
            bind_address: bind_address.to_string(),
        }
    }
}
