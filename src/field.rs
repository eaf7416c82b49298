//! Terrain cells: per-cell resource state, seasonal regeneration, and the
//! pressure a cell exerts on the tribe camped on it.

use serde::{Deserialize, Serialize};

use crate::ecosystem::Season;
use crate::tribe::Tribe;

/// Upper bound on what a single harvest can take from a cell, before the
/// gatherer's efficiency is applied.
pub const HARVEST_CAP: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    Water,
}

/// One grid cell. All scalar parameters live in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub terrain_difficulty: f64,
    pub danger: f64,
    pub water_availability: f64,
    pub food_availability: f64,
    pub can_build: bool,
}

impl Field {
    pub fn new(
        terrain_difficulty: f64,
        danger: f64,
        water_availability: f64,
        food_availability: f64,
        can_build: bool,
    ) -> Self {
        Self {
            terrain_difficulty,
            danger,
            water_availability,
            food_availability,
            can_build,
        }
    }

    /// Seasonal and weather-driven resource drift, applied once per tick.
    pub fn regenerate(&mut self, season: Season, weather: f64, food_modifier: f64) {
        let water_delta = match season {
            Season::Spring => 5.0,
            Season::Summer => -3.0,
            Season::Autumn => 2.0,
            Season::Winter => -5.0,
        };
        self.water_availability = clamp_scalar(self.water_availability + water_delta);

        let base_food_delta = match season {
            Season::Spring => 3.0,
            Season::Summer => 7.0,
            Season::Autumn => 1.0,
            Season::Winter => -7.0,
        };
        self.food_availability = clamp_scalar(self.food_availability + base_food_delta * food_modifier);

        // Extreme weather strips the cell; calm weather restores it.
        if weather > 80.0 {
            self.water_availability = clamp_scalar(self.water_availability - 10.0);
            self.food_availability = clamp_scalar(self.food_availability - 10.0);
            self.danger = clamp_scalar(self.danger + 15.0);
        } else if weather < 20.0 {
            self.water_availability = clamp_scalar(self.water_availability + 5.0);
            self.food_availability = clamp_scalar(self.food_availability + 5.0);
            self.danger = clamp_scalar(self.danger - 5.0);
        }

        // Baseline regeneration independent of season.
        self.water_availability = clamp_scalar(self.water_availability + 1.0);
        self.food_availability = clamp_scalar(self.food_availability + 1.0 * food_modifier);
    }

    /// Pressure the cell exerts on a tribe camped here. Mutates only the
    /// tribe; the cell itself is read-only for this.
    pub fn apply_to(&self, tribe: &mut Tribe) {
        if self.danger > 60.0 {
            tribe.health = (tribe.health - 2.0).max(0.0);
            tribe.mortality = (tribe.mortality + 3.0).min(100.0);
        } else if self.danger < 30.0 {
            tribe.health = (tribe.health + 1.0).min(100.0);
            tribe.mortality = (tribe.mortality - 1.0).max(0.0);
        }

        if self.terrain_difficulty > 70.0 {
            tribe.endurance = (tribe.endurance - 3.0).max(0.0);
        }

        if self.water_availability < 30.0 {
            tribe.thirst = (tribe.thirst + 3.0).min(100.0);
        }
        if self.food_availability < 30.0 {
            tribe.hunger = (tribe.hunger + 3.0).min(100.0);
        }
    }

    /// Takes up to [`HARVEST_CAP`] of the resource, scaled by the gatherer's
    /// efficiency in [0, 1]. Returns the amount taken; the cell's
    /// availability drops by exactly that amount.
    pub fn harvest(&mut self, kind: ResourceKind, efficiency: f64) -> f64 {
        let available = match kind {
            ResourceKind::Food => &mut self.food_availability,
            ResourceKind::Water => &mut self.water_availability,
        };
        let taken = available.min(HARVEST_CAP) * efficiency;
        *available = (*available - taken).max(0.0);
        taken
    }
}

fn clamp_scalar(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    fn cell() -> Field {
        Field::new(50.0, 50.0, 50.0, 50.0, true)
    }

    #[test]
    fn spring_raises_water() {
        let mut field = cell();
        field.regenerate(Season::Spring, 50.0, 1.0);
        // +5 seasonal, +1 baseline
        assert_eq!(field.water_availability, 56.0);
    }

    #[test]
    fn winter_starves_the_cell() {
        let mut field = cell();
        field.regenerate(Season::Winter, 50.0, 1.0);
        assert!(field.water_availability < 50.0);
        assert!(field.food_availability < 50.0);
    }

    #[test]
    fn food_modifier_scales_growth() {
        let mut plain = cell();
        let mut rich = cell();
        plain.regenerate(Season::Summer, 50.0, 1.0);
        rich.regenerate(Season::Summer, 50.0, 2.0);
        assert!(rich.food_availability > plain.food_availability);
    }

    #[test]
    fn harsh_weather_raises_danger() {
        let mut field = cell();
        field.regenerate(Season::Spring, 90.0, 1.0);
        assert_eq!(field.danger, 65.0);
        assert!(field.water_availability < 50.0);
    }

    #[test]
    fn calm_weather_soothes_danger() {
        let mut field = cell();
        field.regenerate(Season::Spring, 10.0, 1.0);
        assert_eq!(field.danger, 45.0);
    }

    #[test]
    fn regeneration_stays_in_bounds() {
        let mut field = Field::new(50.0, 99.0, 99.0, 99.0, true);
        for _ in 0..50 {
            field.regenerate(Season::Summer, 90.0, 3.0);
            assert!((0.0..=100.0).contains(&field.water_availability));
            assert!((0.0..=100.0).contains(&field.food_availability));
            assert!((0.0..=100.0).contains(&field.danger));
        }
    }

    #[test]
    fn harvest_scales_with_efficiency_and_depletes() {
        let mut field = cell();
        let taken = field.harvest(ResourceKind::Food, 0.5);
        assert_eq!(taken, 10.0); // min(20, 50) * 0.5
        assert_eq!(field.food_availability, 40.0);
    }

    #[test]
    fn harvest_never_overdraws_a_scarce_cell() {
        let mut field = Field::new(50.0, 50.0, 50.0, 4.0, true);
        let taken = field.harvest(ResourceKind::Food, 1.0);
        assert_eq!(taken, 4.0);
        assert_eq!(field.food_availability, 0.0);
    }

    #[test]
    fn dangerous_cell_wears_down_a_tribe() {
        let mut field = cell();
        field.danger = 80.0;
        field.terrain_difficulty = 80.0;
        field.water_availability = 10.0;
        field.food_availability = 10.0;
        let mut tribe = Tribe::new(0, Position::new(0, 0));
        field.apply_to(&mut tribe);
        assert_eq!(tribe.health, 48.0);
        assert_eq!(tribe.mortality, 53.0);
        assert_eq!(tribe.endurance, 47.0);
        assert_eq!(tribe.thirst, 53.0);
        assert_eq!(tribe.hunger, 53.0);
    }

    #[test]
    fn safe_cell_restores_a_tribe() {
        let mut field = cell();
        field.danger = 20.0;
        let mut tribe = Tribe::new(0, Position::new(0, 0));
        field.apply_to(&mut tribe);
        assert_eq!(tribe.health, 51.0);
        assert_eq!(tribe.mortality, 49.0);
    }
}
