//! Per-tick metric snapshots: the read-only reporting surface hosts
//! (CLIs, visualizers, exporters) consume, plus an interval-gated JSON
//! writer for offline analysis.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecosystem::Season;
use crate::tribe::{DominantTrait, Tribe, TribeId};

/// One tribe's row in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TribeRow {
    pub id: TribeId,
    pub health: f64,
    pub population: f64,
    pub aggression: f64,
    pub trust: f64,
    pub food_supply: f64,
    pub water_supply: f64,
    pub dominant_trait: DominantTrait,
    pub wars_won: u32,
}

impl TribeRow {
    pub fn from_tribe(tribe: &Tribe) -> Self {
        Self {
            id: tribe.id,
            health: tribe.health,
            population: tribe.population,
            aggression: tribe.aggression,
            trust: tribe.trust,
            food_supply: tribe.food_supply,
            water_supply: tribe.water_supply,
            dominant_trait: tribe.dominant_trait,
            wars_won: tribe.wars_won,
        }
    }
}

/// Aggregate view of one tick. Averages report 0 when no tribes remain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub tick: u64,
    pub season: Season,
    pub weather: f64,
    pub tribe_count: usize,
    pub total_population: f64,
    pub avg_health: f64,
    pub avg_population: f64,
    pub avg_aggression: f64,
    pub avg_trust: f64,
    pub avg_hunger: f64,
    pub avg_thirst: f64,
    pub avg_age: f64,
    pub avg_food_supply: f64,
    pub avg_water_supply: f64,
    pub conflicts: u32,
    pub mergers: u32,
    pub tribes: Vec<TribeRow>,
}

impl MetricsSnapshot {
    pub fn collect(
        tick: u64,
        season: Season,
        weather: f64,
        tribes: &[Tribe],
        conflicts: u32,
        mergers: u32,
    ) -> Self {
        let average = |select: fn(&Tribe) -> f64| -> f64 {
            if tribes.is_empty() {
                0.0
            } else {
                tribes.iter().map(select).sum::<f64>() / tribes.len() as f64
            }
        };

        Self {
            tick,
            season,
            weather,
            tribe_count: tribes.len(),
            total_population: tribes.iter().map(|t| t.population).sum(),
            avg_health: average(|t| t.health),
            avg_population: average(|t| t.population),
            avg_aggression: average(|t| t.aggression),
            avg_trust: average(|t| t.trust),
            avg_hunger: average(|t| t.hunger),
            avg_thirst: average(|t| t.thirst),
            avg_age: average(|t| t.age),
            avg_food_supply: average(|t| t.food_supply),
            avg_water_supply: average(|t| t.water_supply),
            conflicts,
            mergers,
            tribes: tribes.iter().map(TribeRow::from_tribe).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk record wrapping a snapshot with its wall-clock write time.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    written_at: String,
    snapshot: MetricsSnapshot,
}

/// Writes snapshots as pretty JSON every `interval_ticks`. An interval of
/// 0 disables writing entirely.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P, interval_ticks: u64) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn should_write(&self, tick: u64) -> bool {
        self.interval_ticks > 0 && tick > 0 && tick % self.interval_ticks == 0
    }

    /// Writes the snapshot when its tick lands on the interval. Returns the
    /// path written, if any.
    pub fn maybe_write(
        &self,
        snapshot: &MetricsSnapshot,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        if !self.should_write(snapshot.tick) {
            return Ok(None);
        }
        fs::create_dir_all(&self.output_dir)?;
        let record = SnapshotRecord {
            written_at: chrono::Local::now().to_rfc3339(),
            snapshot: snapshot.clone(),
        };
        let path = self
            .output_dir
            .join(format!("snapshot_{:08}.json", snapshot.tick));
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        Ok(Some(path))
    }
}
