// Player records and the per-type player pools owned by the draft engine.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DraftError;

/// Batter or pitcher. Decides which pool a player lives in and which
/// categories they count toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    Batter,
    Pitcher,
}

impl PlayerType {
    pub fn is_pitcher(&self) -> bool {
        matches!(self, PlayerType::Pitcher)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerType::Batter => "batter",
            PlayerType::Pitcher => "pitcher",
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Draft status of a pool row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Available,
    Drafted,
    Keeper,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayerStatus::Available => "Available",
            PlayerStatus::Drafted => "Drafted",
            PlayerStatus::Keeper => "Keeper",
        };
        write!(f, "{s}")
    }
}

/// A draftable player with projected stats and a market value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier, unique across both pools.
    pub player_id: String,
    pub name: String,
    /// Eligible position tags in the order the source listed them
    /// (`"C/1B"` becomes `["C", "1B"]`). Empty when the position is unknown.
    pub positions: Vec<String>,
    /// Natal team abbreviation (e.g. "NYY"). Empty if unaffiliated.
    pub team: String,
    /// Market value in dollars. For keepers this is the keeper cost.
    pub dollars: f64,
    pub stats: BTreeMap<String, f64>,
    pub player_type: PlayerType,
}

impl Player {
    pub fn new(
        player_id: impl Into<String>,
        name: impl Into<String>,
        position: &str,
        team: impl Into<String>,
        dollars: f64,
        player_type: PlayerType,
    ) -> Self {
        Player {
            player_id: player_id.into(),
            name: name.into(),
            positions: parse_positions(position),
            team: team.into(),
            dollars,
            stats: BTreeMap::new(),
            player_type,
        }
    }

    /// Builder-style stat setter.
    pub fn with_stat(mut self, key: &str, value: f64) -> Self {
        self.stats.insert(key.to_string(), value);
        self
    }

    /// Stat value, or 0.0 when the projection doesn't carry it.
    pub fn stat(&self, key: &str) -> f64 {
        self.stat_or(key, 0.0)
    }

    pub fn stat_or(&self, key: &str, default: f64) -> f64 {
        self.stats
            .get(key)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    pub fn is_pitcher(&self) -> bool {
        self.player_type.is_pitcher()
    }

    /// Position tags joined back into the source format, e.g. "SS/2B".
    pub fn position_display(&self) -> String {
        self.positions.join("/")
    }

    pub fn is_eligible(&self, tag: &str) -> bool {
        self.positions.iter().any(|p| p == tag)
    }
}

/// Split a position string such as `"c/1B"` or `"SP / RP"` into upper-cased tags.
///
/// Missing-data markers ("", "nan") produce an empty list.
pub fn parse_positions(position: &str) -> Vec<String> {
    position
        .split('/')
        .map(|p| p.trim().to_uppercase())
        .filter(|p| !p.is_empty() && p != "NAN")
        .collect()
}

// ---------------------------------------------------------------------------
// Pools
// ---------------------------------------------------------------------------

/// One row of a player pool: the player plus its draft status.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry {
    player: Player,
    status: PlayerStatus,
    drafted_by: Option<String>,
}

impl PoolEntry {
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    /// Team holding this player. `None` exactly when the player is available.
    pub fn drafted_by(&self) -> Option<&str> {
        self.drafted_by.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.status == PlayerStatus::Available
    }
}

/// All players of one type, keyed by player id.
///
/// Rows keep their load order so that every scan over the pool is
/// deterministic. Mutation is crate-private: only the engine changes status.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    player_type: PlayerType,
    entries: Vec<PoolEntry>,
    index: HashMap<String, usize>,
}

impl PlayerPool {
    /// Build a pool with every player Available.
    pub fn new(player_type: PlayerType, players: Vec<Player>) -> Result<Self, DraftError> {
        let mut entries = Vec::with_capacity(players.len());
        let mut index = HashMap::with_capacity(players.len());

        for player in players {
            if player.player_type != player_type {
                return Err(DraftError::Validation(format!(
                    "player {} is a {} but was loaded into the {} pool",
                    player.player_id, player.player_type, player_type
                )));
            }
            if index.contains_key(&player.player_id) {
                return Err(DraftError::Validation(format!(
                    "duplicate player id {} in {} pool",
                    player.player_id, player_type
                )));
            }
            index.insert(player.player_id.clone(), entries.len());
            entries.push(PoolEntry {
                player,
                status: PlayerStatus::Available,
                drafted_by: None,
            });
        }

        Ok(PlayerPool {
            player_type,
            entries,
            index,
        })
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    pub fn get(&self, player_id: &str) -> Option<&PoolEntry> {
        self.index.get(player_id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.index.contains_key(player_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoolEntry> {
        self.entries.iter()
    }

    pub fn available(&self) -> impl Iterator<Item = &PoolEntry> {
        self.entries.iter().filter(|e| e.is_available())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark a player taken by `team`. Caller has already validated the row.
    pub(crate) fn assign(&mut self, player_id: &str, status: PlayerStatus, team: &str) {
        if let Some(&i) = self.index.get(player_id) {
            let entry = &mut self.entries[i];
            entry.status = status;
            entry.drafted_by = Some(team.to_string());
        }
    }

    pub(crate) fn release(&mut self, player_id: &str) {
        if let Some(&i) = self.index.get(player_id) {
            let entry = &mut self.entries[i];
            entry.status = PlayerStatus::Available;
            entry.drafted_by = None;
        }
    }

    #[cfg(test)]
    pub(crate) fn force_status(&mut self, player_id: &str, status: PlayerStatus, team: Option<&str>) {
        if let Some(&i) = self.index.get(player_id) {
            self.entries[i].status = status;
            self.entries[i].drafted_by = team.map(str::to_string);
        }
    }
}
