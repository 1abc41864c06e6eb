// Player pool loading from merged projection CSVs.
//
// Each file carries the identity columns (PlayerId, Name, POS, Team, Dollars);
// every other column that parses as a number becomes a stat on the player.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::error::LoadError;
use crate::player::{parse_positions, Player, PlayerType};

const REQUIRED_COLUMNS: [&str; 5] = ["PlayerId", "Name", "POS", "Team", "Dollars"];

/// Column positions of the identity fields within a header row.
struct Columns {
    id: usize,
    name: usize,
    pos: usize,
    team: usize,
    dollars: usize,
    stats: Vec<(usize, String)>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, source: &str) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| {
                    LoadError::Validation(format!("{source}: missing required column `{name}`"))
                })
        };

        let stats = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (i, h.trim().to_string()))
            .filter(|(_, h)| !h.is_empty() && !REQUIRED_COLUMNS.contains(&h.as_str()))
            .collect();

        Ok(Columns {
            id: find("PlayerId")?,
            name: find("Name")?,
            pos: find("POS")?,
            team: find("Team")?,
            dollars: find("Dollars")?,
            stats,
        })
    }
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).map(str::trim).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(
    rdr: R,
    source: &str,
    player_type: PlayerType,
) -> Result<Vec<Player>, LoadError> {
    let csv_err = |e: csv::Error| LoadError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns = Columns::from_headers(&headers, source)?;

    let mut players = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping malformed {} row {}: {}", player_type, row + 1, e);
                continue;
            }
        };

        let player_id = field(&record, columns.id);
        let name = field(&record, columns.name);
        if player_id.is_empty() || name.is_empty() {
            warn!("skipping {} row {}: missing PlayerId or Name", player_type, row + 1);
            continue;
        }

        let dollars = match field(&record, columns.dollars).parse::<f64>() {
            Ok(d) if d.is_finite() => d,
            _ => {
                warn!("skipping {} '{}': invalid Dollars value", player_type, name);
                continue;
            }
        };

        let positions = parse_positions(field(&record, columns.pos));

        let stats: BTreeMap<String, f64> = columns
            .stats
            .iter()
            .filter_map(|(i, key)| {
                let value = field(&record, *i).parse::<f64>().ok()?;
                value.is_finite().then(|| (key.clone(), value))
            })
            .collect();

        players.push(Player {
            player_id: player_id.to_string(),
            name: name.to_string(),
            positions,
            team: field(&record, columns.team).to_string(),
            dollars,
            stats,
            player_type,
        });
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load one player pool from a CSV file.
pub fn load_players(path: &Path, player_type: PlayerType) -> Result<Vec<Player>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file, &path.display().to_string(), player_type)
}

/// Load both pools. Fails if either file produced no valid rows.
pub fn load_pools(
    batters_path: &Path,
    pitchers_path: &Path,
) -> Result<(Vec<Player>, Vec<Player>), LoadError> {
    let batters = load_players(batters_path, PlayerType::Batter)?;
    let pitchers = load_players(pitchers_path, PlayerType::Pitcher)?;

    if batters.is_empty() {
        return Err(LoadError::Validation("batter CSV produced zero valid rows".into()));
    }
    if pitchers.is_empty() {
        return Err(LoadError::Validation("pitcher CSV produced zero valid rows".into()));
    }

    info!("Loaded {} batters and {} pitchers", batters.len(), pitchers.len());
    Ok((batters, pitchers))
}
