// Rotisserie baseball draft engine and simulator.

pub mod engine;
pub mod error;
pub mod keepers;
pub mod order;
pub mod player;
pub mod projections;
pub mod roster;
pub mod simulator;
pub mod standings;

pub use engine::{DraftEngine, EngineSettings, ImportSummary, RosterView, SkipReason, SkippedKeeper};
pub use error::{DraftError, EntityKind, LoadError};
pub use keepers::{KeeperConfig, KeeperEntry};
pub use order::{DraftOrderEntry, Tendency};
pub use player::{Player, PlayerPool, PlayerStatus, PlayerType, PoolEntry};
pub use roster::{RosterEntry, Slot, SlotConfig, SlotUsage, Team};
pub use simulator::{DraftSimulator, PickLogEntry, PickSource, SimulationHalted, SimulationStatus};
pub use standings::{Category, CategoryConfig, CategoryTotals, StandingsRow};
