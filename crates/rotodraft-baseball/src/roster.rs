// Roster slots, slot capacities, and greedy slot assignment.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::player::{Player, PlayerType};

/// Roster slot designations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    Outfield,
    Utility,
    StartingPitcher,
    ReliefPitcher,
    Pitcher,
    Bench,
    InjuredList,
    Minors,
}

/// Slots tied to one specific position.
pub const EXCLUSIVE_SLOTS: &[Slot] = &[
    Slot::Catcher,
    Slot::FirstBase,
    Slot::SecondBase,
    Slot::ThirdBase,
    Slot::ShortStop,
    Slot::Outfield,
    Slot::StartingPitcher,
    Slot::ReliefPitcher,
];

/// Generic slots that absorb any player of their broad type.
pub const FLEX_SLOTS: &[Slot] = &[Slot::Utility, Slot::Pitcher, Slot::Bench];

impl Slot {
    /// Parse a position or slot tag.
    ///
    /// - "LF"/"CF"/"RF"/"OF" -> Outfield
    /// - "UTIL" -> Utility, "P" -> Pitcher
    /// - "BN"/"BE" -> Bench, "IL"/"DL" -> InjuredList, "NA" -> Minors
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Some(Slot::Catcher),
            "1B" => Some(Slot::FirstBase),
            "2B" => Some(Slot::SecondBase),
            "3B" => Some(Slot::ThirdBase),
            "SS" => Some(Slot::ShortStop),
            "OF" | "LF" | "CF" | "RF" => Some(Slot::Outfield),
            "UTIL" => Some(Slot::Utility),
            "SP" => Some(Slot::StartingPitcher),
            "RP" => Some(Slot::ReliefPitcher),
            "P" => Some(Slot::Pitcher),
            "BN" | "BE" => Some(Slot::Bench),
            "IL" | "DL" => Some(Slot::InjuredList),
            "NA" => Some(Slot::Minors),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Slot::Catcher => "C",
            Slot::FirstBase => "1B",
            Slot::SecondBase => "2B",
            Slot::ThirdBase => "3B",
            Slot::ShortStop => "SS",
            Slot::Outfield => "OF",
            Slot::Utility => "Util",
            Slot::StartingPitcher => "SP",
            Slot::ReliefPitcher => "RP",
            Slot::Pitcher => "P",
            Slot::Bench => "BN",
            Slot::InjuredList => "IL",
            Slot::Minors => "NA",
        }
    }

    pub fn is_exclusive(&self) -> bool {
        EXCLUSIVE_SLOTS.contains(self)
    }

    pub fn is_flex(&self) -> bool {
        FLEX_SLOTS.contains(self)
    }

    /// IL and NA are never filled by the allocator.
    pub fn is_reserve(&self) -> bool {
        matches!(self, Slot::InjuredList | Slot::Minors)
    }

    /// Whether this is an exclusive slot for hitters.
    pub fn is_batting_position(&self) -> bool {
        matches!(
            self,
            Slot::Catcher
                | Slot::FirstBase
                | Slot::SecondBase
                | Slot::ThirdBase
                | Slot::ShortStop
                | Slot::Outfield
        )
    }

    /// The flex slot a player of `player_type` falls back to.
    pub fn flex_for(player_type: PlayerType) -> Slot {
        match player_type {
            PlayerType::Batter => Slot::Utility,
            PlayerType::Pitcher => Slot::Pitcher,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Slot capacities
// ---------------------------------------------------------------------------

/// Capacity per slot, shared by every team in a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    capacities: BTreeMap<Slot, usize>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        let capacities = [
            (Slot::Catcher, 1),
            (Slot::FirstBase, 1),
            (Slot::SecondBase, 1),
            (Slot::ThirdBase, 1),
            (Slot::ShortStop, 1),
            (Slot::Outfield, 3),
            (Slot::Utility, 1),
            (Slot::StartingPitcher, 3),
            (Slot::ReliefPitcher, 2),
            (Slot::Pitcher, 2),
            (Slot::Bench, 6),
            (Slot::InjuredList, 2),
            (Slot::Minors, 1),
        ]
        .into_iter()
        .collect();
        SlotConfig { capacities }
    }
}

impl SlotConfig {
    pub fn new(capacities: BTreeMap<Slot, usize>) -> Self {
        SlotConfig { capacities }
    }

    /// Build from a config mapping slot strings to counts, e.g.
    /// `{"C": 1, "OF": 3, "Util": 1, "BN": 6}`. Slots not listed get zero.
    pub fn from_config(roster_config: &HashMap<String, usize>) -> Result<Self, DraftError> {
        let mut capacities = BTreeMap::new();
        for (slot_str, &count) in roster_config {
            let slot = Slot::from_str_pos(slot_str).ok_or_else(|| {
                DraftError::Validation(format!("unknown roster slot `{slot_str}`"))
            })?;
            *capacities.entry(slot).or_insert(0) += count;
        }
        Ok(SlotConfig { capacities })
    }

    pub fn capacity(&self, slot: Slot) -> usize {
        self.capacities.get(&slot).copied().unwrap_or(0)
    }

    /// Slots with a nonzero capacity, in display order.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, usize)> + '_ {
        self.capacities
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(&s, &c)| (s, c))
    }

    /// Sum of all non-reserve capacities.
    pub fn draftable_count(&self) -> usize {
        self.slots()
            .filter(|(s, _)| !s.is_reserve())
            .map(|(_, c)| c)
            .sum()
    }
}

/// Ordered list of slots a player may occupy, most specific first.
///
/// Batters: each eligible exclusive batting slot in tag order, then Util.
/// Pitchers: SP if eligible, RP if eligible, then P.
/// Unknown positions go straight to their type's flex slot. Bench is always
/// the last resort. The allocator takes the first entry with room; it never
/// revisits earlier placements.
pub fn slot_priority(player: &Player) -> Vec<Slot> {
    let mut order = Vec::new();

    if !player.positions.is_empty() {
        match player.player_type {
            PlayerType::Batter => {
                for tag in &player.positions {
                    if let Some(slot) = Slot::from_str_pos(tag) {
                        if slot.is_batting_position() && !order.contains(&slot) {
                            order.push(slot);
                        }
                    }
                }
            }
            PlayerType::Pitcher => {
                if player.is_eligible("SP") {
                    order.push(Slot::StartingPitcher);
                }
                if player.is_eligible("RP") {
                    order.push(Slot::ReliefPitcher);
                }
            }
        }
    }

    order.push(Slot::flex_for(player.player_type));
    order.push(Slot::Bench);
    order
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// A player on a team, with the slot the allocator charged for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: Player,
    /// `None` when every eligible slot was already full at acquisition time.
    pub slot: Option<Slot>,
}

/// Fill level for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotUsage {
    pub slot: Slot,
    pub filled: usize,
    pub capacity: usize,
}

/// A fantasy team: its acquisitions in order and per-slot fill counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    name: String,
    roster: Vec<RosterEntry>,
    slots_filled: BTreeMap<Slot, usize>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Team {
            name: name.into(),
            roster: Vec::new(),
            slots_filled: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquisitions in the order they happened.
    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.roster.iter().map(|e| &e.player)
    }

    pub fn filled(&self, slot: Slot) -> usize {
        self.slots_filled.get(&slot).copied().unwrap_or(0)
    }

    pub fn has_open(&self, slot: Slot, config: &SlotConfig) -> bool {
        self.filled(slot) < config.capacity(slot)
    }

    /// Whether any of Util, P or BN still has room.
    pub fn has_open_flex_slot(&self, config: &SlotConfig) -> bool {
        FLEX_SLOTS.iter().any(|&s| self.has_open(s, config))
    }

    /// Exclusive slots with remaining capacity.
    pub fn open_exclusive_slots(&self, config: &SlotConfig) -> Vec<Slot> {
        EXCLUSIVE_SLOTS
            .iter()
            .copied()
            .filter(|&s| self.has_open(s, config))
            .collect()
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.roster.iter().any(|e| e.player.player_id == player_id)
    }

    pub fn entry(&self, player_id: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|e| e.player.player_id == player_id)
    }

    /// Add a player, charging the first slot in `slot_priority` that has room.
    ///
    /// The player is always appended to the roster. If nothing has room no
    /// count changes and `None` is returned.
    pub(crate) fn add_player(&mut self, player: Player, config: &SlotConfig) -> Option<Slot> {
        let slot = slot_priority(&player)
            .into_iter()
            .find(|&s| self.has_open(s, config));

        if let Some(s) = slot {
            *self.slots_filled.entry(s).or_insert(0) += 1;
        }
        self.roster.push(RosterEntry { player, slot });
        slot
    }

    /// Remove a player and give back the exact slot they were charged to.
    pub(crate) fn remove_player(&mut self, player_id: &str) -> Option<RosterEntry> {
        let idx = self
            .roster
            .iter()
            .position(|e| e.player.player_id == player_id)?;
        let entry = self.roster.remove(idx);
        if let Some(slot) = entry.slot {
            if let Some(count) = self.slots_filled.get_mut(&slot) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.slots_filled.remove(&slot);
                }
            }
        }
        Some(entry)
    }

    /// Fill-vs-capacity for every configured slot.
    pub fn slot_summary(&self, config: &SlotConfig) -> Vec<SlotUsage> {
        config
            .slots()
            .map(|(slot, capacity)| SlotUsage {
                slot,
                filled: self.filled(slot),
                capacity,
            })
            .collect()
    }
}
