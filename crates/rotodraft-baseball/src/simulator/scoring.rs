// Composite scoring for AI picks.
//
// A candidate's score is a weighted sum of four factors: dollar value
// (dominant), positional need (distant second), category need and draft
// tendency (both minor). Scores are then sharpened with a power law before
// being turned into selection weights.

use std::collections::BTreeMap;

use crate::order::Tendency;
use crate::player::{Player, PlayerType};
use crate::roster::{Slot, SlotConfig, Team};
use crate::standings::{Category, CategoryConfig, StandingsRow, ALL_CATEGORIES};

// ---------------------------------------------------------------------------
// Tuning constants
// ---------------------------------------------------------------------------

pub const WEIGHT_MARKET_VALUE: f64 = 20.0;
pub const WEIGHT_POSITIONAL_NEED: f64 = 0.5;
pub const WEIGHT_CATEGORY_NEED: f64 = 0.1;
pub const WEIGHT_TENDENCY: f64 = 0.1;

pub const TENDENCY_BONUS: f64 = 50.0;
/// Added to every score so each candidate keeps a nonzero chance.
pub const EPSILON: f64 = 0.01;
pub const SCORE_EXPONENT: f64 = 3.0;
/// Candidates considered per player type, by dollar value.
pub const TOP_N_PLAYERS: usize = 50;

const BENCH_NEED: f64 = 10.0;
const UNKNOWN_POSITION_NEED: f64 = 10.0;
const UTIL_NEED_SCALE: f64 = 50.0;
const HIGH_VALUE_DOLLARS: f64 = 20.0;

/// Scarcity multiplier applied to exclusive-slot need.
pub fn position_priority(slot: Slot) -> f64 {
    match slot {
        Slot::FirstBase => 1.30,
        Slot::Outfield => 1.25,
        Slot::ShortStop => 1.20,
        Slot::ThirdBase => 1.15,
        Slot::SecondBase => 1.10,
        Slot::Catcher => 0.85,
        Slot::StartingPitcher => 1.35,
        _ => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Factors
// ---------------------------------------------------------------------------

/// `scale * (1 - filled/limit)` if the slot has room, else 0.
fn open_need(team: &Team, slots: &SlotConfig, slot: Slot, scale: f64) -> f64 {
    let limit = slots.capacity(slot);
    let filled = team.filled(slot);
    if filled < limit {
        scale * (1.0 - filled as f64 / limit as f64)
    } else {
        0.0
    }
}

/// How much `team` needs a player with these position tags.
///
/// Best exclusive-slot need over the player's tags, scaled by
/// `position_priority`. Batters fall back to Util need when nothing scores
/// 50 or more; pitchers fall back to P need. Bench gives a floor of 10 when
/// nothing else is open.
pub fn positional_need(player: &Player, team: &Team, slots: &SlotConfig) -> f64 {
    if player.positions.is_empty() {
        return UNKNOWN_POSITION_NEED;
    }

    let mut best = 0.0_f64;
    for tag in &player.positions {
        let slot = Slot::from_str_pos(tag);
        match player.player_type {
            PlayerType::Pitcher => {
                if let Some(s @ (Slot::StartingPitcher | Slot::ReliefPitcher | Slot::Pitcher)) = slot {
                    best = best.max(open_need(team, slots, s, 100.0) * position_priority(s));
                }
                if best == 0.0 {
                    best = open_need(team, slots, Slot::Pitcher, 100.0);
                }
            }
            PlayerType::Batter => {
                if let Some(s) = slot.filter(Slot::is_batting_position) {
                    best = best.max(open_need(team, slots, s, 100.0) * position_priority(s));
                }
                if best < UTIL_NEED_SCALE {
                    best = best.max(open_need(team, slots, Slot::Utility, UTIL_NEED_SCALE));
                }
            }
        }
    }

    if best == 0.0 && team.has_open(Slot::Bench, slots) {
        best = BENCH_NEED;
    }
    best
}

/// Weakness per category for `team`: its min-rank among all teams over the
/// number of teams, times 100. Rank 1 is best, so a last-place team scores
/// 100. ERA and WHIP rank ascending.
pub fn category_needs(standings: &[StandingsRow], team: &str) -> BTreeMap<Category, f64> {
    let mut needs = BTreeMap::new();
    let Some(own) = standings.iter().find(|row| row.team == team) else {
        return needs;
    };
    let num_teams = standings.len() as f64;

    for category in ALL_CATEGORIES {
        let value = own.totals.get(category);
        let better = standings
            .iter()
            .filter(|row| {
                let other = row.totals.get(category);
                if category.lower_is_better() {
                    other < value
                } else {
                    other > value
                }
            })
            .count();
        let rank = (better + 1) as f64;
        needs.insert(category, rank / num_teams * 100.0);
    }
    needs
}

/// The player's normalized help in one category, roughly 0-10.
fn contribution(player: &Player, category: Category, config: &CategoryConfig) -> f64 {
    match category {
        Category::OnBasePct => player.stat_or("OBP", 0.300) * 100.0,
        Category::Era => ((5.0 - player.stat_or("ERA", 5.0)) / 5.0).max(0.0) * 10.0,
        Category::Whip => ((1.5 - player.stat_or("WHIP", 1.5)) / 1.5).max(0.0) * 10.0,
        counting => (player.stat(counting.stat_key(config)) / 10.0).min(10.0),
    }
}

/// Sum over the player's categories of weakness times contribution.
pub fn category_score(
    player: &Player,
    needs: &BTreeMap<Category, f64>,
    config: &CategoryConfig,
) -> f64 {
    ALL_CATEGORIES
        .iter()
        .filter(|c| c.player_type() == player.player_type)
        .filter_map(|&c| needs.get(&c).map(|need| need * contribution(player, c, config) / 100.0))
        .sum()
}

pub fn tendency_score(tendency: Tendency, player_type: PlayerType) -> f64 {
    if tendency.matches(player_type) {
        TENDENCY_BONUS
    } else {
        0.0
    }
}

/// Everything a score needs besides the player.
pub struct ScoringContext<'a> {
    pub team: &'a Team,
    pub slots: &'a SlotConfig,
    pub categories: &'a CategoryConfig,
    pub needs: BTreeMap<Category, f64>,
    pub tendency: Tendency,
}

/// Weighted sum of all factors, clamped to be non-negative.
pub fn composite_score(player: &Player, ctx: &ScoringContext<'_>) -> f64 {
    let score = positional_need(player, ctx.team, ctx.slots) * WEIGHT_POSITIONAL_NEED
        + category_score(player, &ctx.needs, ctx.categories) * WEIGHT_CATEGORY_NEED
        + tendency_score(ctx.tendency, player.player_type) * WEIGHT_TENDENCY
        + player.dollars * WEIGHT_MARKET_VALUE;
    // f64::max also maps NaN to 0.
    score.max(0.0)
}

/// Turn scores into unnormalized sampling weights: `(score + EPSILON)^SCORE_EXPONENT`.
pub fn selection_weights(scores: &[f64]) -> Vec<f64> {
    scores
        .iter()
        .map(|s| (s.max(0.0) + EPSILON).powf(SCORE_EXPONENT))
        .collect()
}

// ---------------------------------------------------------------------------
// Rationale
// ---------------------------------------------------------------------------

/// Whether the player would land in an open position slot on `team`.
fn fills_positional_need(player: &Player, team: &Team, slots: &SlotConfig) -> bool {
    match player.player_type {
        PlayerType::Pitcher => {
            (player.is_eligible("SP") && team.has_open(Slot::StartingPitcher, slots))
                || (player.is_eligible("RP") && team.has_open(Slot::ReliefPitcher, slots))
                || (!player.positions.is_empty() && team.has_open(Slot::Pitcher, slots))
        }
        PlayerType::Batter => player.positions.iter().any(|tag| {
            Slot::from_str_pos(tag)
                .filter(Slot::is_batting_position)
                .is_some_and(|s| team.has_open(s, slots))
        }),
    }
}

/// Short explanation for an AI pick, e.g.
/// `AI: fills positional need, matches hitting preference, high value ($34)`.
///
/// Call with the team state from before the pick is applied.
pub fn pick_rationale(
    player: &Player,
    team: &Team,
    slots: &SlotConfig,
    tendency: Tendency,
) -> String {
    let mut reasons = Vec::new();
    if fills_positional_need(player, team, slots) {
        reasons.push("fills positional need".to_string());
    }
    if tendency.matches(player.player_type) {
        reasons.push(format!("matches {tendency} preference"));
    }
    if player.dollars > HIGH_VALUE_DOLLARS {
        reasons.push(format!("high value (${:.0})", player.dollars));
    }
    if reasons.is_empty() {
        reasons.push("best available".to_string());
    }
    format!("AI: {}", reasons.join(", "))
}
