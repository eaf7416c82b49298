pub mod config;
pub mod ecosystem;
pub mod engine;
pub mod field;
pub mod grid;
pub mod rng;
pub mod snapshot;
pub mod tribe;

pub use config::{Scenario, ScenarioError};
pub use ecosystem::{Ecosystem, EventKind, Season};
pub use engine::{Engine, TickSummary};
pub use grid::{Grid, Position};
pub use snapshot::{MetricsSnapshot, SnapshotWriter, TribeRow};
pub use tribe::{DominantTrait, Tribe};
