// Roto category totals computed from a team's rostered players.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerType};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// League-level category settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Stat column used for the fifth pitching counting category.
    pub pitching_extra: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        CategoryConfig {
            pitching_extra: "QS".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Runs,
    HomeRuns,
    RunsBattedIn,
    StolenBases,
    OnBasePct,
    Strikeouts,
    Saves,
    PitchingExtra,
    Era,
    Whip,
}

pub const ALL_CATEGORIES: [Category; 10] = [
    Category::Runs,
    Category::HomeRuns,
    Category::RunsBattedIn,
    Category::StolenBases,
    Category::OnBasePct,
    Category::Strikeouts,
    Category::Saves,
    Category::PitchingExtra,
    Category::Era,
    Category::Whip,
];

impl Category {
    /// Stat column this category reads from a player's projections.
    pub fn stat_key<'a>(&self, config: &'a CategoryConfig) -> &'a str {
        match self {
            Category::Runs => "R",
            Category::HomeRuns => "HR",
            Category::RunsBattedIn => "RBI",
            Category::StolenBases => "SB",
            Category::OnBasePct => "OBP",
            Category::Strikeouts => "SO",
            Category::Saves => "SV",
            Category::PitchingExtra => config.pitching_extra.as_str(),
            Category::Era => "ERA",
            Category::Whip => "WHIP",
        }
    }

    /// Column label used in standings output.
    pub fn label<'a>(&self, config: &'a CategoryConfig) -> &'a str {
        match self {
            Category::Strikeouts => "K",
            other => other.stat_key(config),
        }
    }

    pub fn player_type(&self) -> PlayerType {
        match self {
            Category::Runs
            | Category::HomeRuns
            | Category::RunsBattedIn
            | Category::StolenBases
            | Category::OnBasePct => PlayerType::Batter,
            _ => PlayerType::Pitcher,
        }
    }

    /// ERA and WHIP are won by the lowest value.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Category::Era | Category::Whip)
    }

    pub fn is_rate(&self) -> bool {
        matches!(self, Category::OnBasePct | Category::Era | Category::Whip)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label(&CategoryConfig::default()))
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Live category values for one roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub r: f64,
    pub hr: f64,
    pub rbi: f64,
    pub sb: f64,
    pub obp: f64,
    pub k: f64,
    pub sv: f64,
    pub extra: f64,
    pub era: f64,
    pub whip: f64,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Runs => self.r,
            Category::HomeRuns => self.hr,
            Category::RunsBattedIn => self.rbi,
            Category::StolenBases => self.sb,
            Category::OnBasePct => self.obp,
            Category::Strikeouts => self.k,
            Category::Saves => self.sv,
            Category::PitchingExtra => self.extra,
            Category::Era => self.era,
            Category::Whip => self.whip,
        }
    }
}

/// One team's line in the standings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsRow {
    pub team: String,
    pub totals: CategoryTotals,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Sum a roster into category totals.
///
/// Rate stats are rebuilt from their components so they weight by volume:
/// OBP by at-bats, ERA through an earned-run estimate (`ERA * IP / 9`), WHIP
/// through a walks-plus-hits estimate (`WHIP * IP`). Players with no AB (or
/// no IP) add nothing to the rate components. A rate with a zero denominator
/// stays at 0.
///
/// Players are summed in `player_id` order so floating-point totals do not
/// depend on the order players joined the roster.
pub fn aggregate<'a, I>(players: I, config: &CategoryConfig) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut totals = CategoryTotals::default();

    let mut ab = 0.0;
    let mut on_base = 0.0;
    let mut ip = 0.0;
    let mut earned_runs = 0.0;
    let mut walks_hits = 0.0;

    let mut players: Vec<&Player> = players.into_iter().collect();
    players.sort_by(|a, b| a.player_id.cmp(&b.player_id));

    for player in players {
        match player.player_type {
            PlayerType::Batter => {
                totals.r += player.stat("R");
                totals.hr += player.stat("HR");
                totals.rbi += player.stat("RBI");
                totals.sb += player.stat("SB");

                let player_ab = player.stat("AB");
                if player_ab > 0.0 {
                    ab += player_ab;
                    on_base += player.stat("OBP") * player_ab;
                }
            }
            PlayerType::Pitcher => {
                totals.k += player.stat("SO");
                totals.sv += player.stat("SV");
                totals.extra += player.stat(&config.pitching_extra);

                let player_ip = player.stat("IP");
                if player_ip > 0.0 {
                    ip += player_ip;
                    earned_runs += player.stat("ERA") * player_ip / 9.0;
                    walks_hits += player.stat("WHIP") * player_ip;
                }
            }
        }
    }

    if ab > 0.0 {
        totals.obp = round_to(on_base / ab, 3);
    }
    if ip > 0.0 {
        totals.era = round_to(earned_runs * 9.0 / ip, 2);
        totals.whip = round_to(walks_hits / ip, 2);
    }

    totals
}
