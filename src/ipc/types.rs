use serde::Deserialize;

use crate::store::{Draft, RosterStore};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// All state the daemon owns: the committed roster and the single in-flight
/// draft. Lives for the process lifetime, nothing is persisted.
pub struct AppState {
    pub roster: RosterStore,
    pub draft: Draft,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            roster: RosterStore::new(),
            draft: Draft::new(),
        }
    }
}
