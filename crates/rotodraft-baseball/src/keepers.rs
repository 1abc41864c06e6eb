// Versioned keeper configuration record exchanged with persistence.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current on-disk format version.
pub const KEEPER_CONFIG_VERSION: u32 = 1;

fn default_version() -> u32 {
    KEEPER_CONFIG_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeeperEntry {
    pub player_id: String,
    pub cost: f64,
}

/// Team names plus each team's keepers and their costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeeperConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub team_names: Vec<String>,
    /// Team name to keeper list. Teams with no keepers map to an empty list.
    #[serde(default)]
    pub keepers: BTreeMap<String, Vec<KeeperEntry>>,
}

impl KeeperConfig {
    pub fn new(name: impl Into<String>, team_names: Vec<String>) -> Self {
        let keepers = team_names
            .iter()
            .map(|t| (t.clone(), Vec::new()))
            .collect();
        KeeperConfig {
            version: KEEPER_CONFIG_VERSION,
            name: name.into(),
            created_at: Utc::now(),
            team_names,
            keepers,
        }
    }

    pub fn keeper_count(&self) -> usize {
        self.keepers.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
