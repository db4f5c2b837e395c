use serde::{Deserialize, Serialize};

use crate::models::account::AccountVariant;
use crate::models::snapshot::Snapshot;

/// Row of `tracked_players`: the baseline a later `gains` compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAccount {
    pub username: String, // lowercase key
    pub display_name: String,
    pub account_variant: AccountVariant,
    pub snapshot: Snapshot,
    pub combat_level: i64,
    pub saved_at: i64, // unix seconds, UTC
    pub old_names: Vec<String>,
}

impl TrackedAccount {
    pub fn key(username: &str) -> String {
        username.trim().to_lowercase()
    }
}
