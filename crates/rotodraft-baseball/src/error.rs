// Error types shared by the draft engine and simulator.

use thiserror::Error;

use crate::player::PlayerStatus;

/// What kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Team,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Team => write!(f, "team"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// Malformed external input. Raised before any state is touched.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("player {player_id} is {actual}, expected {expected}")]
    IllegalTransition {
        player_id: String,
        expected: PlayerStatus,
        actual: PlayerStatus,
    },

    /// A human pick was attempted while the current pick belongs to someone else
    /// (or the draft is over).
    #[error("pick {pick_number:?} does not belong to {team}")]
    OutOfTurn {
        pick_number: Option<u32>,
        team: String,
    },

    /// The AI could not find a single legal candidate for this pick.
    #[error("no draftable candidates left for pick {pick_number} ({team})")]
    NoCandidates { pick_number: u32, team: String },
}

impl DraftError {
    pub(crate) fn player_not_found(id: &str) -> Self {
        DraftError::NotFound {
            kind: EntityKind::Player,
            id: id.to_string(),
        }
    }

    pub(crate) fn team_not_found(name: &str) -> Self {
        DraftError::NotFound {
            kind: EntityKind::Team,
            id: name.to_string(),
        }
    }
}

/// Failure reading a player pool or draft order file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}
