// Configuration loading and parsing (league.toml, draft.toml).

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use rotodraft_baseball::roster::EXCLUSIVE_SLOTS;
use rotodraft_baseball::{CategoryConfig, EngineSettings, SlotConfig};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub simulation: SimulationConfig,
    pub data_paths: DataPaths,
    pub saves: SavesConfig,
}

impl Config {
    /// Slot capacities and category settings for the draft engine.
    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        let slots = SlotConfig::from_config(&self.league.roster).map_err(|e| {
            ConfigError::ValidationError {
                field: "league.roster".into(),
                message: e.to_string(),
            }
        })?;
        Ok(EngineSettings {
            slots,
            categories: CategoryConfig {
                pitching_extra: self.league.categories.pitching_extra.clone(),
            },
        })
    }

    /// Directory keeper configs are saved to. Falls back to the platform
    /// data directory when `[saves] dir` is not set.
    pub fn saves_dir(&self) -> PathBuf {
        match &self.saves.dir {
            Some(dir) => PathBuf::from(dir),
            None => crate::saves::default_saves_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Team names in first-round draft order.
    pub teams: Vec<String>,
    /// The team the human drafts for.
    pub user_team: String,
    /// Slot name (`C`, `OF`, `Util`, `BN`, ...) to capacity.
    pub roster: HashMap<String, usize>,
    #[serde(default)]
    pub categories: CategoriesSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesSection {
    /// Stat column scored as the fifth pitching category.
    #[serde(default = "default_pitching_extra")]
    pub pitching_extra: String,
}

impl Default for CategoriesSection {
    fn default() -> Self {
        CategoriesSection {
            pitching_extra: default_pitching_extra(),
        }
    }
}

fn default_pitching_extra() -> String {
    "QS".to_string()
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    #[serde(default)]
    simulation: SimulationConfig,
    data_paths: DataPaths,
    #[serde(default)]
    saves: SavesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// RNG seed. A random seed is drawn when omitted.
    pub seed: Option<u64>,
    /// Rounds of the generated snake order, used when no draft order file is set.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: None,
            rounds: default_rounds(),
        }
    }
}

fn default_rounds() -> u32 {
    22
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub batters: String,
    pub pitchers: String,
    #[serde(default)]
    pub draft_order: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavesConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/draft.toml`, relative to the given `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let draft_path = config_dir.join("draft.toml");
    let draft_text = read_file(&draft_path)?;
    let draft_file: DraftFile =
        toml::from_str(&draft_text).map_err(|e| ConfigError::ParseError {
            path: draft_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: league_file.league,
        simulation: draft_file.simulation,
        data_paths: draft_file.data_paths,
        saves: draft_file.saves,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a user's edited config.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load configuration relative to the current directory, initializing
/// `config/` from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.teams.is_empty() {
        return Err(invalid("league.teams", "must list at least one team"));
    }
    let mut seen = HashSet::new();
    for team in &league.teams {
        if team.trim().is_empty() {
            return Err(invalid("league.teams", "team names must not be empty"));
        }
        if !seen.insert(team.as_str()) {
            return Err(invalid("league.teams", format!("duplicate team `{team}`")));
        }
    }
    if !league.teams.contains(&league.user_team) {
        return Err(invalid(
            "league.user_team",
            format!("`{}` is not one of league.teams", league.user_team),
        ));
    }

    let slots = SlotConfig::from_config(&league.roster)
        .map_err(|e| invalid("league.roster", e.to_string()))?;
    if let Some(missing) = EXCLUSIVE_SLOTS.iter().find(|s| slots.capacity(**s) == 0) {
        return Err(invalid(
            "league.roster",
            format!("missing capacity for slot {missing}"),
        ));
    }

    if league.categories.pitching_extra.trim().is_empty() {
        return Err(invalid("league.categories.pitching_extra", "must not be empty"));
    }

    if config.simulation.rounds == 0 {
        return Err(invalid("simulation.rounds", "must be greater than 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
