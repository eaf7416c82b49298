//! Seasons, weather, and the random events that perturb the grid.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::tribe::Tribe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn next(self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Drought,
    Flood,
    Plague,
    AbundantHarvest,
    Migration,
    NaturalDisaster,
}

impl EventKind {
    /// Draw order for the per-season probability tables.
    const ALL: [EventKind; 6] = [
        EventKind::Drought,
        EventKind::Flood,
        EventKind::Plague,
        EventKind::AbundantHarvest,
        EventKind::Migration,
        EventKind::NaturalDisaster,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Drought => "drought",
            EventKind::Flood => "flood",
            EventKind::Plague => "plague",
            EventKind::AbundantHarvest => "abundant_harvest",
            EventKind::Migration => "migration",
            EventKind::NaturalDisaster => "natural_disaster",
        }
    }
}

/// Event likelihoods per season, in [`EventKind::ALL`] order. Each row sums
/// to 1: winters breed plague and scarcity, summers drought, springs and
/// autumns mostly good harvests.
fn event_weights(season: Season) -> [f64; 6] {
    match season {
        Season::Spring => [0.05, 0.20, 0.10, 0.40, 0.15, 0.10],
        Season::Summer => [0.30, 0.05, 0.15, 0.30, 0.10, 0.10],
        Season::Autumn => [0.10, 0.15, 0.20, 0.35, 0.10, 0.10],
        Season::Winter => [0.05, 0.10, 0.30, 0.05, 0.30, 0.20],
    }
}

/// Owns season and weather state and drives the terrain the tribes live on.
/// The grid itself is owned by the engine and passed in per call.
pub struct Ecosystem {
    season: Season,
    weather_condition: f64,
    food_modifier: f64,
}

impl Ecosystem {
    pub fn new(food_modifier: f64) -> Self {
        Self {
            season: Season::Spring,
            weather_condition: 50.0,
            food_modifier,
        }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Current weather severity in [0, 100]; high values are harsh.
    pub fn weather(&self) -> f64 {
        self.weather_condition
    }

    pub fn food_modifier(&self) -> f64 {
        self.food_modifier
    }

    /// Regenerates every cell under the current season and weather.
    pub fn update_resources(&self, grid: &mut Grid) {
        for field in grid.fields_mut() {
            field.regenerate(self.season, self.weather_condition, self.food_modifier);
        }
    }

    /// Lets each tribe's current cell act on it. Tribes standing outside
    /// the grid are left untouched.
    pub fn apply_pressure(&self, grid: &Grid, tribes: &mut [Tribe]) {
        for tribe in tribes {
            if let Some(field) = grid.field_at(tribe.position) {
                field.apply_to(tribe);
            }
        }
    }

    /// Draws one random event from the season-conditioned distribution and
    /// applies its global effect to every cell. Returns the event so hosts
    /// can log it.
    pub fn trigger_random_event(&mut self, grid: &mut Grid, rng: &mut RandomSource) -> EventKind {
        let event = EventKind::ALL[rng.pick_weighted(&event_weights(self.season))];
        match event {
            EventKind::Drought => {
                for field in grid.fields_mut() {
                    field.water_availability = (field.water_availability - 20.0).max(0.0);
                }
                self.weather_condition = (self.weather_condition + 25.0).min(100.0);
            }
            EventKind::Flood => {
                for field in grid.fields_mut() {
                    field.water_availability = (field.water_availability + 30.0).min(100.0);
                    field.danger = (field.danger + 15.0).min(100.0);
                    field.terrain_difficulty = (field.terrain_difficulty + 20.0).min(100.0);
                }
            }
            EventKind::Plague => {
                for field in grid.fields_mut() {
                    field.danger = (field.danger + 25.0).min(100.0);
                }
            }
            EventKind::AbundantHarvest => {
                for field in grid.fields_mut() {
                    field.food_availability = (field.food_availability + 30.0).min(100.0);
                }
            }
            EventKind::Migration => {
                // Herds wander: food shifts unevenly across the map.
                for field in grid.fields_mut() {
                    let change = rng.uniform_int(-20, 40) as f64;
                    field.food_availability = (field.food_availability + change).clamp(0.0, 100.0);
                }
            }
            EventKind::NaturalDisaster => {
                for field in grid.fields_mut() {
                    field.danger = (field.danger + 35.0).min(100.0);
                    field.terrain_difficulty = (field.terrain_difficulty + 25.0).min(100.0);
                    field.food_availability = (field.food_availability - 15.0).max(0.0);
                    field.water_availability = (field.water_availability - 15.0).max(0.0);
                }
                self.weather_condition = (self.weather_condition + 40.0).min(100.0);
            }
        }
        event
    }

    /// Rolls over to the next season and redraws the weather.
    pub fn advance_season(&mut self, rng: &mut RandomSource) {
        self.season = self.season.next();
        self.update_weather(rng);
    }

    /// Mean-reverting random walk: a normal step, a seasonal bias, and a
    /// pull back toward the middle after extremes.
    pub fn update_weather(&mut self, rng: &mut RandomSource) {
        let mut change = rng.normal(0.0, 10.0);
        change += match self.season {
            Season::Spring => -5.0,
            Season::Summer => rng.uniform_int(-10, 15) as f64,
            Season::Autumn => rng.uniform_int(-5, 10) as f64,
            Season::Winter => 5.0,
        };

        if self.weather_condition > 80.0 {
            change -= 15.0;
        } else if self.weather_condition < 20.0 {
            change += 15.0;
        }

        self.weather_condition = (self.weather_condition + change).clamp(0.0, 100.0);
    }
}
