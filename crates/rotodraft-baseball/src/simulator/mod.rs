// Step-through draft simulator: AI teams pick, the human team pauses it.

pub mod scoring;

use std::fmt;

use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::{DraftEngine, RosterView};
use crate::error::DraftError;
use crate::order::{validate_order, DraftOrderEntry};
use crate::player::{Player, PlayerType};
use crate::roster::{Slot, Team};
use crate::standings::StandingsRow;

use self::scoring::{composite_score, pick_rationale, selection_weights, ScoringContext, TOP_N_PLAYERS};

/// Who made a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickSource {
    User,
    Ai,
}

/// One completed pick. The log is append-only; undoing a pick in an engine
/// never rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickLogEntry {
    pub pick_number: u32,
    pub team: String,
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub player_type: PlayerType,
    pub source: PickSource,
    pub rationale: String,
    pub dollars: f64,
}

impl fmt::Display for PickLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<3} {:<20} {:<24} {:<8} ${:>5.1}  {}",
            self.pick_number,
            self.team,
            self.player_name,
            self.position,
            self.dollars,
            self.rationale
        )
    }
}

/// A multi-pick run that stopped on an error. `picks` holds the picks
/// committed during the run before it stopped.
#[derive(Debug, Error)]
#[error("{error} (after {} picks this run)", .picks.len())]
pub struct SimulationHalted {
    pub picks: Vec<PickLogEntry>,
    #[source]
    pub error: DraftError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    Running,
    /// Waiting on `make_user_pick`.
    Paused,
    /// Every pick in the order has been made. Terminal.
    Completed,
}

/// Plays out a draft order on a private copy of an engine.
///
/// Every team other than the human team is driven by a seeded, weighted
/// random choice over scored candidates. Two simulators built from the same
/// engine state, order and seed make identical picks.
#[derive(Debug, Clone)]
pub struct DraftSimulator {
    engine: DraftEngine,
    order: Vec<DraftOrderEntry>,
    user_team: String,
    current: usize,
    pick_log: Vec<PickLogEntry>,
    paused: bool,
    completed: bool,
    rng: ChaCha8Rng,
}

impl DraftSimulator {
    /// Validate the order and take a snapshot of `engine`, including any
    /// keepers already assigned.
    pub fn new(
        engine: &DraftEngine,
        order: Vec<DraftOrderEntry>,
        user_team: &str,
        seed: u64,
    ) -> Result<Self, DraftError> {
        validate_order(&order)?;
        if !order.iter().any(|e| e.team == user_team) {
            return Err(DraftError::Validation(format!(
                "user team `{user_team}` does not appear in the draft order"
            )));
        }
        if let Some(missing) = order.iter().find(|e| engine.team(&e.team).is_none()) {
            return Err(DraftError::Validation(format!(
                "draft order pick {} names unknown team `{}`",
                missing.pick_number, missing.team
            )));
        }

        info!(
            "Simulator ready: {} picks, user team '{}', seed {}",
            order.len(),
            user_team,
            seed
        );

        Ok(DraftSimulator {
            engine: engine.snapshot(),
            order,
            user_team: user_team.to_string(),
            current: 0,
            pick_log: Vec::new(),
            paused: false,
            completed: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn current_pick(&self) -> Option<&DraftOrderEntry> {
        if self.completed {
            None
        } else {
            self.order.get(self.current)
        }
    }

    pub fn is_user_turn(&self) -> bool {
        self.current_pick().is_some_and(|e| e.team == self.user_team)
    }

    pub fn status(&self) -> SimulationStatus {
        if self.completed {
            SimulationStatus::Completed
        } else if self.paused {
            SimulationStatus::Paused
        } else {
            SimulationStatus::Running
        }
    }

    pub fn user_team(&self) -> &str {
        &self.user_team
    }

    pub fn order(&self) -> &[DraftOrderEntry] {
        &self.order
    }

    pub fn pick_log(&self) -> &[PickLogEntry] {
        &self.pick_log
    }

    /// The simulator's private engine.
    pub fn engine(&self) -> &DraftEngine {
        &self.engine
    }

    pub fn standings(&self) -> Vec<StandingsRow> {
        self.engine.get_standings()
    }

    pub fn team_roster(&self, name: &str) -> Result<RosterView<'_>, DraftError> {
        self.engine.team_roster(name)
    }

    fn advance(&mut self) {
        self.current += 1;
        if self.current >= self.order.len() {
            self.completed = true;
            info!("Simulation complete after {} picks", self.pick_log.len());
        }
    }

    /// Make the human team's pick. Fails with `OutOfTurn` unless the current
    /// pick belongs to the human team.
    pub fn make_user_pick(
        &mut self,
        player_id: &str,
        player_type: PlayerType,
    ) -> Result<PickLogEntry, DraftError> {
        let pick = match self.current_pick() {
            Some(pick) if pick.team == self.user_team => pick.clone(),
            other => {
                return Err(DraftError::OutOfTurn {
                    pick_number: other.map(|p| p.pick_number),
                    team: self.user_team.clone(),
                })
            }
        };

        self.engine.process_pick(player_id, &pick.team, player_type)?;
        let player = self
            .engine
            .pool(player_type)
            .get(player_id)
            .map(|e| e.player().clone())
            .ok_or_else(|| DraftError::player_not_found(player_id))?;

        let entry = log_entry(&pick, &player, PickSource::User, "User selection".to_string());
        info!("Pick {}: {} (user) takes {}", pick.pick_number, pick.team, player.name);
        self.pick_log.push(entry.clone());
        self.paused = false;
        self.advance();
        Ok(entry)
    }

    /// Make the next AI pick.
    ///
    /// Returns `Ok(None)` without picking when the draft is complete or when
    /// the current pick is the human team's; the latter pauses the simulator.
    /// A pick with no legal candidates fails with `NoCandidates` and leaves
    /// the simulator unchanged.
    pub fn simulate_next_pick(&mut self) -> Result<Option<PickLogEntry>, DraftError> {
        let Some(pick) = self.current_pick().cloned() else {
            return Ok(None);
        };
        if pick.team == self.user_team {
            self.paused = true;
            debug!("Paused at pick {} for user team", pick.pick_number);
            return Ok(None);
        }

        let team = self
            .engine
            .team(&pick.team)
            .ok_or_else(|| DraftError::team_not_found(&pick.team))?;
        let candidates = candidate_pool(&self.engine, team);
        if candidates.is_empty() {
            return Err(DraftError::NoCandidates {
                pick_number: pick.pick_number,
                team: pick.team.clone(),
            });
        }

        let settings = self.engine.settings();
        let ctx = ScoringContext {
            team,
            slots: &settings.slots,
            categories: &settings.categories,
            needs: scoring::category_needs(&self.engine.get_standings(), &pick.team),
            tendency: pick.tendency,
        };
        let scores: Vec<f64> = candidates.iter().map(|p| composite_score(p, &ctx)).collect();
        let weights = selection_weights(&scores);
        let dist = WeightedIndex::new(&weights).map_err(|e| {
            DraftError::Validation(format!("cannot weight candidates for pick {}: {e}", pick.pick_number))
        })?;

        let chosen = candidates[dist.sample(&mut self.rng)].clone();
        let rationale = pick_rationale(&chosen, team, &settings.slots, pick.tendency);

        self.engine
            .process_pick(&chosen.player_id, &pick.team, chosen.player_type)?;
        info!(
            "Pick {}: {} takes {} ({}, ${:.0})",
            pick.pick_number,
            pick.team,
            chosen.name,
            chosen.position_display(),
            chosen.dollars
        );

        let entry = log_entry(&pick, &chosen, PickSource::Ai, rationale);
        self.pick_log.push(entry.clone());
        self.advance();
        Ok(Some(entry))
    }

    /// Run AI picks until the human team is up or the order is exhausted.
    /// Returns the picks made during this call. On a failed pick the run
    /// stops and the error carries the picks already made.
    pub fn simulate_until_user_or_complete(&mut self) -> Result<Vec<PickLogEntry>, SimulationHalted> {
        let mut picks = Vec::new();
        while !self.paused && !self.completed {
            match self.simulate_next_pick() {
                Ok(Some(entry)) => picks.push(entry),
                Ok(None) => {}
                Err(error) => return Err(SimulationHalted { picks, error }),
            }
        }
        Ok(picks)
    }
}

fn log_entry(pick: &DraftOrderEntry, player: &Player, source: PickSource, rationale: String) -> PickLogEntry {
    PickLogEntry {
        pick_number: pick.pick_number,
        team: pick.team.clone(),
        player_id: player.player_id.clone(),
        player_name: player.name.clone(),
        position: player.position_display(),
        player_type: player.player_type,
        source,
        rationale,
        dollars: player.dollars,
    }
}

/// Highest-value entries first, keeping load order among equal values.
fn top_by_value(players: &mut Vec<&Player>, n: usize) {
    players.sort_by(|a, b| b.dollars.total_cmp(&a.dollars));
    players.truncate(n);
}

/// Legal AI candidates for `team`, batters first.
///
/// Players with no name or no natal team are dropped. Once the team has no
/// open Util, P or BN slot, only players eligible for a still-open exclusive
/// slot are kept, unless that would leave nobody. Each type is then capped at
/// `TOP_N_PLAYERS` by dollar value.
fn candidate_pool<'a>(engine: &'a DraftEngine, team: &Team) -> Vec<&'a Player> {
    let usable = |p: &&Player| !p.name.trim().is_empty() && !p.team.trim().is_empty();
    let mut batters: Vec<&Player> = engine
        .batters()
        .available()
        .map(|e| e.player())
        .filter(usable)
        .collect();
    let mut pitchers: Vec<&Player> = engine
        .pitchers()
        .available()
        .map(|e| e.player())
        .filter(usable)
        .collect();

    let slots = &engine.settings().slots;
    if !team.has_open_flex_slot(slots) {
        let open = team.open_exclusive_slots(slots);
        let fits = |p: &&Player| {
            p.positions
                .iter()
                .filter_map(|tag| Slot::from_str_pos(tag))
                .any(|s| open.contains(&s))
        };
        let needed_batters: Vec<&Player> = batters.iter().copied().filter(fits).collect();
        let needed_pitchers: Vec<&Player> = pitchers.iter().copied().filter(fits).collect();
        if !needed_batters.is_empty() || !needed_pitchers.is_empty() {
            batters = needed_batters;
            pitchers = needed_pitchers;
        } else {
            debug!("No players fit open slots for '{}'; positional filter skipped", team.name());
        }
    }

    top_by_value(&mut batters, TOP_N_PLAYERS);
    top_by_value(&mut pitchers, TOP_N_PLAYERS);
    batters.extend(pitchers);
    batters
}
