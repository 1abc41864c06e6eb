// Draft order: who picks when, and the declared leaning for each pick.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DraftError, LoadError};
use crate::player::PlayerType;

/// Soft per-pick bias toward hitters or pitchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tendency {
    Hitting,
    Pitching,
}

impl Tendency {
    pub fn matches(&self, player_type: PlayerType) -> bool {
        matches!(
            (self, player_type),
            (Tendency::Hitting, PlayerType::Batter) | (Tendency::Pitching, PlayerType::Pitcher)
        )
    }
}

impl FromStr for Tendency {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hitting" => Ok(Tendency::Hitting),
            "pitching" => Ok(Tendency::Pitching),
            other => Err(DraftError::Validation(format!(
                "invalid tendency `{other}` (expected hitting or pitching)"
            ))),
        }
    }
}

impl fmt::Display for Tendency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tendency::Hitting => write!(f, "hitting"),
            Tendency::Pitching => write!(f, "pitching"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrderEntry {
    pub pick_number: u32,
    pub team: String,
    pub tendency: Tendency,
}

impl DraftOrderEntry {
    pub fn new(pick_number: u32, team: impl Into<String>, tendency: Tendency) -> Self {
        DraftOrderEntry {
            pick_number,
            team: team.into(),
            tendency,
        }
    }
}

/// Check that pick numbers run 1, 2, 3, ... with no gaps or repeats.
pub fn validate_order(entries: &[DraftOrderEntry]) -> Result<(), DraftError> {
    if entries.is_empty() {
        return Err(DraftError::Validation("draft order is empty".into()));
    }
    for (i, entry) in entries.iter().enumerate() {
        let expected = i as u32 + 1;
        if entry.pick_number != expected {
            return Err(DraftError::Validation(format!(
                "pick numbers must start at 1 and increase by one: expected {expected}, found {}",
                entry.pick_number
            )));
        }
        if entry.team.trim().is_empty() {
            return Err(DraftError::Validation(format!(
                "pick {} has no team",
                entry.pick_number
            )));
        }
    }
    Ok(())
}

/// Snake order over `teams` for `rounds` rounds, alternating tendencies by
/// round starting with hitting.
pub fn snake_order(teams: &[String], rounds: u32) -> Vec<DraftOrderEntry> {
    let mut entries = Vec::with_capacity(teams.len() * rounds as usize);
    for round in 0..rounds {
        let tendency = if round % 2 == 0 {
            Tendency::Hitting
        } else {
            Tendency::Pitching
        };
        let mut round_teams: Vec<&String> = teams.iter().collect();
        if round % 2 == 1 {
            round_teams.reverse();
        }
        for team in round_teams {
            let pick_number = entries.len() as u32 + 1;
            entries.push(DraftOrderEntry::new(pick_number, team.clone(), tendency));
        }
    }
    entries
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawOrderRow {
    #[serde(alias = "player_name", alias = "team_name")]
    team: String,
    pick_number: u32,
    tendency: String,
}

fn read_order_from_reader<R: Read>(rdr: R, source: &str) -> Result<Vec<DraftOrderEntry>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut entries = Vec::new();
    for result in reader.deserialize::<RawOrderRow>() {
        let raw = result.map_err(|e| LoadError::Csv {
            path: source.to_string(),
            source: e,
        })?;
        let tendency = raw
            .tendency
            .parse::<Tendency>()
            .map_err(|e| LoadError::Validation(format!("{source}: pick {}: {e}", raw.pick_number)))?;
        entries.push(DraftOrderEntry::new(raw.pick_number, raw.team, tendency));
    }

    validate_order(&entries).map_err(|e| LoadError::Validation(format!("{source}: {e}")))?;
    Ok(entries)
}

/// Read a draft order CSV with `team`, `pick_number` and `tendency` columns.
///
/// Unlike player pools, a malformed draft order is rejected as a whole.
pub fn read_draft_order(path: &Path) -> Result<Vec<DraftOrderEntry>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let entries = read_order_from_reader(file, &path.display().to_string())?;
    info!("Loaded draft order with {} picks", entries.len());
    Ok(entries)
}
