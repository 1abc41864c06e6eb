// Named keeper configurations saved as JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, info, warn};

use rotodraft_baseball::{KeeperConfig, KeeperEntry};

/// Listing metadata for one saved keeper config.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedConfigInfo {
    pub name: String,
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// `saves/` under the platform data directory, or `./saves` when the
/// platform has no home directory.
pub fn default_saves_dir() -> PathBuf {
    ProjectDirs::from("", "", "rotodraft")
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from("saves"))
}

/// Turn a config name into a file stem: characters other than word
/// characters, whitespace and `-` are dropped, then each whitespace run
/// becomes a single `_`.
pub fn sanitize_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
        .collect();

    let mut out = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Write `config` to `<dir>/<sanitized name>.json`, creating `dir` if needed.
/// An existing file with the same name is overwritten.
pub fn save_keeper_config(dir: &Path, config: &KeeperConfig) -> Result<PathBuf> {
    let mut stem = sanitize_name(&config.name);
    if stem.is_empty() {
        stem = "keepers".to_string();
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create saves directory {}", dir.display()))?;

    let path = dir.join(format!("{stem}.json"));
    let json = config.to_json().context("failed to serialize keeper config")?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        "Saved keeper config '{}' ({} keepers) to {}",
        config.name,
        config.keeper_count(),
        path.display()
    );
    Ok(path)
}

pub fn load_keeper_config(path: &Path) -> Result<KeeperConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    KeeperConfig::from_json(&text)
        .with_context(|| format!("{} is not a valid keeper config", path.display()))
}

/// Every readable keeper config in `dir`, most recently created first.
///
/// A missing directory yields an empty list. Files that fail to parse are
/// skipped.
pub fn list_saved_configs(dir: &Path) -> Result<Vec<SavedConfigInfo>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut configs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        match load_keeper_config(&path) {
            Ok(config) => configs.push(SavedConfigInfo {
                name: config.name,
                filename,
                path,
                created_at: config.created_at,
            }),
            Err(e) => debug!("Skipping {}: {e:#}", path.display()),
        }
    }

    configs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(configs)
}

/// Remove a saved config. Returns whether a file was actually deleted.
pub fn delete_keeper_config(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Deleted keeper config {}", path.display());
            true
        }
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to delete {}: {e}", path.display());
            }
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Keeper CSV input
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct KeeperRow {
    #[serde(alias = "team_name")]
    team: String,
    #[serde(alias = "PlayerId")]
    player_id: String,
    #[serde(default)]
    cost: f64,
}

/// Build a keeper config from CSV text with `team`, `player_id` and `cost`
/// columns. Rows naming teams outside `team_names` are kept; the engine
/// reports them as skipped on import.
pub fn keeper_config_from_csv<R: std::io::Read>(
    rdr: R,
    name: &str,
    team_names: Vec<String>,
) -> Result<KeeperConfig> {
    let mut config = KeeperConfig::new(name, team_names);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    for (i, row) in reader.deserialize::<KeeperRow>().enumerate() {
        // Header is line 1.
        let row = row.with_context(|| format!("invalid keeper row at line {}", i + 2))?;
        config.keepers.entry(row.team).or_default().push(KeeperEntry {
            player_id: row.player_id,
            cost: row.cost,
        });
    }
    Ok(config)
}

pub fn read_keeper_csv(path: &Path, name: &str, team_names: Vec<String>) -> Result<KeeperConfig> {
    let file =
        fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    keeper_config_from_csv(file, name, team_names)
        .with_context(|| format!("failed to read keepers from {}", path.display()))
}
