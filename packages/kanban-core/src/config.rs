/// Reconciler configuration for board clients.
use serde::{Deserialize, Serialize};

/// Reconciler behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilerConfig {
    /// Apply in-flight mutations to the view before the server confirms them.
    /// With this off the view only changes when a fresh snapshot arrives.
    #[serde(default = "default_optimistic")]
    pub optimistic_updates: bool,
}

fn default_optimistic() -> bool {
    true
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            optimistic_updates: default_optimistic(),
        }
    }
}

impl ReconcilerConfig {
    pub fn server_only() -> Self {
        Self {
            optimistic_updates: false,
        }
    }
}
