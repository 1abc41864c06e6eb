// Draft engine: player pools, teams, and the pick/keeper state machine.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::DraftError;
use crate::keepers::{KeeperConfig, KeeperEntry};
use crate::player::{Player, PlayerPool, PlayerStatus, PlayerType, PoolEntry};
use crate::roster::{RosterEntry, Slot, SlotConfig, SlotUsage, Team};
use crate::standings::{aggregate, CategoryConfig, StandingsRow};

/// League settings shared by every team of an engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub slots: SlotConfig,
    pub categories: CategoryConfig,
}

/// Why a keeper entry was not applied during import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownTeam,
    UnknownPlayer,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedKeeper {
    pub team: String,
    pub player_id: String,
    pub reason: SkipReason,
}

/// Outcome of `DraftEngine::import_keeper_config`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub applied: usize,
    pub skipped: Vec<SkippedKeeper>,
}

/// A team's roster split by player type, in acquisition order.
#[derive(Debug, Clone)]
pub struct RosterView<'a> {
    pub batters: Vec<&'a RosterEntry>,
    pub pitchers: Vec<&'a RosterEntry>,
}

/// Owns both player pools and every team.
///
/// Every operation validates before it mutates, so a call that returns an
/// error leaves the engine exactly as it was. The engine is plain owned
/// data; `snapshot` is a deep copy.
#[derive(Debug, Clone)]
pub struct DraftEngine {
    batters: PlayerPool,
    pitchers: PlayerPool,
    teams: Vec<Team>,
    settings: EngineSettings,
}

fn validate_team_names(names: &[String]) -> Result<(), DraftError> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            return Err(DraftError::Validation("team name must not be empty".into()));
        }
        if !seen.insert(name.as_str()) {
            return Err(DraftError::Validation(format!("duplicate team name `{name}`")));
        }
    }
    Ok(())
}

impl DraftEngine {
    pub fn new(
        batters: Vec<Player>,
        pitchers: Vec<Player>,
        team_names: &[String],
    ) -> Result<Self, DraftError> {
        Self::with_settings(batters, pitchers, team_names, EngineSettings::default())
    }

    pub fn with_settings(
        batters: Vec<Player>,
        pitchers: Vec<Player>,
        team_names: &[String],
        settings: EngineSettings,
    ) -> Result<Self, DraftError> {
        validate_team_names(team_names)?;
        let batters = PlayerPool::new(PlayerType::Batter, batters)?;
        let pitchers = PlayerPool::new(PlayerType::Pitcher, pitchers)?;

        if let Some(dup) = batters.iter().find(|e| pitchers.contains(&e.player().player_id)) {
            return Err(DraftError::Validation(format!(
                "player id {} appears in both pools",
                dup.player().player_id
            )));
        }

        info!(
            "Draft engine ready: {} batters, {} pitchers, {} teams",
            batters.len(),
            pitchers.len(),
            team_names.len()
        );

        Ok(DraftEngine {
            batters,
            pitchers,
            teams: team_names.iter().map(Team::new).collect(),
            settings,
        })
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn pool(&self, player_type: PlayerType) -> &PlayerPool {
        match player_type {
            PlayerType::Batter => &self.batters,
            PlayerType::Pitcher => &self.pitchers,
        }
    }

    fn pool_mut(&mut self, player_type: PlayerType) -> &mut PlayerPool {
        match player_type {
            PlayerType::Batter => &mut self.batters,
            PlayerType::Pitcher => &mut self.pitchers,
        }
    }

    pub fn batters(&self) -> &PlayerPool {
        &self.batters
    }

    pub fn pitchers(&self) -> &PlayerPool {
        &self.pitchers
    }

    /// Look a player up in either pool.
    pub fn find_player(&self, player_id: &str) -> Option<&PoolEntry> {
        self.batters
            .get(player_id)
            .or_else(|| self.pitchers.get(player_id))
    }

    pub fn status_of(&self, player_id: &str) -> Option<PlayerStatus> {
        self.find_player(player_id).map(PoolEntry::status)
    }

    /// Every available player from both pools, batters first.
    pub fn available_players(&self) -> impl Iterator<Item = &PoolEntry> {
        self.batters.available().chain(self.pitchers.available())
    }

    /// Teams in draft order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name() == name)
    }

    pub fn team_names(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.name().to_string()).collect()
    }

    fn team_index(&self, name: &str) -> Result<usize, DraftError> {
        self.teams
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| DraftError::team_not_found(name))
    }

    // -----------------------------------------------------------------------
    // Acquisitions
    // -----------------------------------------------------------------------

    /// Draft an available player onto `team`. Returns the slot charged.
    pub fn process_pick(
        &mut self,
        player_id: &str,
        team: &str,
        player_type: PlayerType,
    ) -> Result<Option<Slot>, DraftError> {
        self.acquire(player_id, team, player_type, PlayerStatus::Drafted, None)
    }

    /// Assign a keeper to `team` at `cost`, which replaces the market value
    /// on the rostered copy of the player.
    pub fn process_keeper(
        &mut self,
        player_id: &str,
        team: &str,
        cost: f64,
        player_type: PlayerType,
    ) -> Result<Option<Slot>, DraftError> {
        self.acquire(player_id, team, player_type, PlayerStatus::Keeper, Some(cost))
    }

    fn acquire(
        &mut self,
        player_id: &str,
        team: &str,
        player_type: PlayerType,
        status: PlayerStatus,
        cost: Option<f64>,
    ) -> Result<Option<Slot>, DraftError> {
        let team_idx = self.team_index(team)?;
        let entry = self
            .pool(player_type)
            .get(player_id)
            .ok_or_else(|| DraftError::player_not_found(player_id))?;
        if !entry.is_available() {
            return Err(DraftError::IllegalTransition {
                player_id: player_id.to_string(),
                expected: PlayerStatus::Available,
                actual: entry.status(),
            });
        }

        let mut player = entry.player().clone();
        if let Some(cost) = cost {
            player.dollars = cost;
        }

        self.pool_mut(player_type).assign(player_id, status, team);
        let slot = self.teams[team_idx].add_player(player, &self.settings.slots);

        debug!(
            "{} {} -> {} ({})",
            status,
            player_id,
            team,
            slot.map_or("no slot", |s| s.display_str())
        );
        Ok(slot)
    }

    /// Revert a Drafted player to Available.
    pub fn undo_pick(&mut self, player_id: &str) -> Result<(), DraftError> {
        self.release(player_id, PlayerStatus::Drafted)
    }

    /// Revert a Keeper player to Available.
    pub fn remove_keeper(&mut self, player_id: &str) -> Result<(), DraftError> {
        self.release(player_id, PlayerStatus::Keeper)
    }

    fn release(&mut self, player_id: &str, expected: PlayerStatus) -> Result<(), DraftError> {
        let entry = self
            .find_player(player_id)
            .ok_or_else(|| DraftError::player_not_found(player_id))?;
        if entry.status() != expected {
            return Err(DraftError::IllegalTransition {
                player_id: player_id.to_string(),
                expected,
                actual: entry.status(),
            });
        }
        let player_type = entry.player().player_type;
        let holder = entry.drafted_by().map(str::to_string);

        if let Some(idx) = holder
            .as_deref()
            .and_then(|name| self.teams.iter().position(|t| t.name() == name))
        {
            self.teams[idx].remove_player(player_id);
        } else {
            warn!("{} {} had no owning team on release", expected, player_id);
        }
        self.pool_mut(player_type).release(player_id);

        debug!("Released {} {} (was {:?})", expected, player_id, holder);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    /// Reconcile the team list to exactly `names`, in that order.
    ///
    /// Teams that keep their name keep their roster. Teams that disappear
    /// release every player back to the pool. New names start empty.
    pub fn set_team_names(&mut self, names: &[String]) -> Result<(), DraftError> {
        validate_team_names(names)?;

        let mut old = std::mem::take(&mut self.teams);
        let mut next = Vec::with_capacity(names.len());
        for name in names {
            match old.iter().position(|t| t.name() == name) {
                Some(i) => next.push(old.remove(i)),
                None => next.push(Team::new(name.clone())),
            }
        }

        for team in old {
            for player in team.players() {
                self.pool_mut(player.player_type).release(&player.player_id);
            }
            info!(
                "Removed team '{}', released {} players",
                team.name(),
                team.roster().len()
            );
        }

        self.teams = next;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Keeper configuration
    // -----------------------------------------------------------------------

    /// Current keepers, derived from Keeper-status rows.
    pub fn export_keeper_config(&self, name: &str) -> KeeperConfig {
        let mut config = KeeperConfig::new(name, self.team_names());
        for team in &self.teams {
            let keepers: Vec<KeeperEntry> = team
                .roster()
                .iter()
                .filter(|e| self.status_of(&e.player.player_id) == Some(PlayerStatus::Keeper))
                .map(|e| KeeperEntry {
                    player_id: e.player.player_id.clone(),
                    cost: e.player.dollars,
                })
                .collect();
            config.keepers.insert(team.name().to_string(), keepers);
        }
        config
    }

    /// Apply a keeper configuration: reset the team list, then assign each
    /// keeper. Entries for unknown teams or players, or for players that are
    /// already taken, are skipped rather than failing the import.
    pub fn import_keeper_config(&mut self, config: &KeeperConfig) -> Result<ImportSummary, DraftError> {
        self.set_team_names(&config.team_names)?;

        let mut summary = ImportSummary::default();
        for (team, entries) in &config.keepers {
            let known_team = self.team(team).is_some();
            for keeper in entries {
                let reason = if !known_team {
                    Some(SkipReason::UnknownTeam)
                } else {
                    match self.find_player(&keeper.player_id) {
                        None => Some(SkipReason::UnknownPlayer),
                        Some(e) if !e.is_available() => Some(SkipReason::Unavailable),
                        Some(_) => None,
                    }
                };

                if let Some(reason) = reason {
                    warn!(
                        "Skipping keeper {} for '{}': {:?}",
                        keeper.player_id, team, reason
                    );
                    summary.skipped.push(SkippedKeeper {
                        team: team.clone(),
                        player_id: keeper.player_id.clone(),
                        reason,
                    });
                    continue;
                }

                let player_type = self
                    .find_player(&keeper.player_id)
                    .map(|e| e.player().player_type)
                    .ok_or_else(|| DraftError::player_not_found(&keeper.player_id))?;
                self.process_keeper(&keeper.player_id, team, keeper.cost, player_type)?;
                summary.applied += 1;
            }
        }

        info!(
            "Imported keeper config '{}': {} applied, {} skipped",
            config.name,
            summary.applied,
            summary.skipped.len()
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// One row per team, in team order.
    pub fn get_standings(&self) -> Vec<StandingsRow> {
        self.teams
            .iter()
            .map(|t| StandingsRow {
                team: t.name().to_string(),
                totals: aggregate(t.players(), &self.settings.categories),
            })
            .collect()
    }

    pub fn team_roster(&self, name: &str) -> Result<RosterView<'_>, DraftError> {
        let team = &self.teams[self.team_index(name)?];
        let (pitchers, batters): (Vec<&RosterEntry>, Vec<&RosterEntry>) =
            team.roster().iter().partition(|e| e.player.is_pitcher());
        Ok(RosterView { batters, pitchers })
    }

    pub fn slot_summary(&self, name: &str) -> Result<Vec<SlotUsage>, DraftError> {
        let team = &self.teams[self.team_index(name)?];
        Ok(team.slot_summary(&self.settings.slots))
    }

    /// Deep, fully independent copy of the engine.
    pub fn snapshot(&self) -> DraftEngine {
        self.clone()
    }
}
