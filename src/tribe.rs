//! Tribes: the simulated societies, their per-tick needs and social rules,
//! and the attack/merge resolution between co-located tribes.
//!
//! The threshold/constant pairs in the update rules are the behavioral
//! contract of the simulation; they are tuned once and frozen. Each rule
//! starts from the current value, applies its ordered adjustments, and
//! clamps back into [1, 100].

use serde::{Deserialize, Serialize};

use crate::field::{Field, ResourceKind};
use crate::grid::{Grid, Position};
use crate::rng::RandomSource;

pub type TribeId = u64;

/// How far (Chebyshev) a migrating tribe scans for better land.
pub const MIGRATION_RADIUS: i32 = 4;

/// A categorical summary of a tribe's history, recomputed every 25 ticks
/// from the memory counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominantTrait {
    Stable,
    Warlike,
    Survivor,
    Prosperous,
    Nomadic,
    Established,
}

impl DominantTrait {
    pub fn name(self) -> &'static str {
        match self {
            DominantTrait::Stable => "stable",
            DominantTrait::Warlike => "warlike",
            DominantTrait::Survivor => "survivor",
            DominantTrait::Prosperous => "prosperous",
            DominantTrait::Nomadic => "nomadic",
            DominantTrait::Established => "established",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tribe {
    pub id: TribeId,
    pub position: Position,

    // Vital attributes
    pub health: f64,
    pub age: f64,
    pub population: f64,
    pub fertility: f64,
    pub mortality: f64,

    // Social attributes
    pub aggression: f64,
    pub trust: f64,
    pub resourcefulness: f64,

    // Needs and stores
    pub hunger: f64,
    pub thirst: f64,
    pub water_supply: f64,
    pub food_supply: f64,

    // Mobility
    pub endurance: f64,
    /// Tick of the last migration; -1 when the tribe has never moved.
    pub last_migrated: i64,

    // Memory counters
    pub wars_won: u32,
    pub wars_lost: u32,
    pub crises_survived: u32,
    pub migrations_count: u32,
    pub prosperity_periods: u32,
    pub dominant_trait: DominantTrait,
}

impl Tribe {
    pub fn new(id: TribeId, position: Position) -> Self {
        Self {
            id,
            position,
            health: 50.0,
            age: 40.0,
            population: 50.0,
            fertility: 50.0,
            mortality: 50.0,
            aggression: 50.0,
            trust: 50.0,
            resourcefulness: 50.0,
            hunger: 50.0,
            thirst: 50.0,
            water_supply: 50.0,
            food_supply: 50.0,
            endurance: 50.0,
            last_migrated: -1,
            wars_won: 0,
            wars_lost: 0,
            crises_survived: 0,
            migrations_count: 0,
            prosperity_periods: 0,
            dominant_trait: DominantTrait::Stable,
        }
    }

    pub fn in_crisis(&self) -> bool {
        self.hunger > 80.0 || self.thirst > 80.0 || self.health < 20.0
    }

    pub fn is_prosperous(&self) -> bool {
        self.food_supply > 80.0 && self.water_supply > 80.0 && self.health > 80.0
    }

    /// Counts time spent in crisis or prosperity; runs first each tick so
    /// the counters reflect the state the tribe woke up in.
    pub fn record_wellbeing(&mut self) {
        if self.in_crisis() {
            self.crises_survived += 1;
        }
        if self.is_prosperous() {
            self.prosperity_periods += 1;
        }
    }

    // ---- needs -----------------------------------------------------------

    pub fn update_hunger(&mut self, weather: f64) {
        let mut base = self.hunger + 1.0;
        if self.food_supply < 30.0 {
            base += 7.0;
        }
        if self.endurance < 40.0 {
            base += 2.0;
        }
        if self.population > 70.0 {
            base += 2.0;
        }
        if weather > 70.0 {
            base += 1.0;
        }
        if self.food_supply > 50.0 {
            base -= 5.0;
        }
        if self.resourcefulness > 70.0 {
            base -= 3.0;
        }
        self.hunger = clamp_attr(base);
    }

    pub fn update_thirst(&mut self, weather: f64) {
        let mut base = self.thirst + 1.0;
        if self.water_supply < 30.0 {
            base += 9.0;
        }
        if self.endurance < 40.0 {
            base += 2.0;
        }
        if self.population > 70.0 {
            base += 2.0;
        }
        if weather > 70.0 {
            base += 2.0;
        }
        if self.water_supply > 50.0 {
            base -= 7.0;
        }
        if self.resourcefulness > 70.0 {
            base -= 3.0;
        }
        if weather < 30.0 {
            base -= 2.0;
        }
        self.thirst = clamp_attr(base);
    }

    pub fn update_health(&mut self, field: Option<&Field>, weather: f64) {
        let mut base = self.health;
        if self.hunger < 30.0 {
            base += 5.0;
        }
        if self.thirst < 30.0 {
            base += 5.0;
        }
        if self.food_supply > 50.0 && self.water_supply > 50.0 {
            base += 4.0;
        }
        if field.is_some_and(|f| f.danger < 40.0) {
            base += 2.0;
        }
        if self.age < 35.0 {
            base += 2.0;
        }
        if self.hunger > 70.0 {
            base -= 4.0;
        }
        if self.thirst > 70.0 {
            base -= 6.0;
        }
        if field.is_some_and(|f| f.danger > 60.0) {
            base -= 3.0;
        }
        if self.mortality > 60.0 {
            base -= 3.0;
        }
        if self.age > 45.0 {
            base -= 2.0;
        }
        if weather > 80.0 {
            base -= 2.0;
        }
        self.health = clamp_attr(base);
    }

    /// Births and deaths, then the age blend that newborns pull down.
    pub fn update_population(&mut self) {
        let next = self.population + self.population * (self.fertility / 200.0)
            - self.population * (self.mortality / 200.0);
        self.population = next.clamp(1.0, 100.0);
        self.update_age();
    }

    fn update_age(&mut self) {
        let growth = (self.population * self.fertility / 200.0).max(0.0);
        if self.population + growth > 0.0 {
            self.age = (self.age * self.population + growth) / (self.population + growth);
        }
        self.age = (self.age + 0.1).min(100.0);
    }

    // ---- resources -------------------------------------------------------

    pub fn collect_food(&mut self, field: &mut Field) {
        if field.food_availability > 0.0 {
            let amount = field.harvest(ResourceKind::Food, self.resourcefulness / 100.0);
            self.food_supply = (self.food_supply + amount).min(100.0);
        }
    }

    pub fn collect_water(&mut self, field: &mut Field) {
        if field.water_availability > 0.0 {
            let amount = field.harvest(ResourceKind::Water, self.resourcefulness / 100.0);
            self.water_supply = (self.water_supply + amount).min(100.0);
        }
    }

    pub fn consume_food_supply(&mut self) {
        self.food_supply = (self.food_supply - self.population / 300.0).max(0.0);
    }

    pub fn consume_water_supply(&mut self) {
        self.water_supply = (self.water_supply - self.population / 300.0).max(0.0);
    }

    // ---- migration -------------------------------------------------------

    /// Moves to the most favorable cell in range if endurance covers the
    /// travel cost. A move drains one extra ration of each supply.
    pub fn migrate(&mut self, grid: &Grid, tick: u64) {
        if self.endurance < 6.0 {
            return;
        }
        let candidates = grid.best_terrain(self.position, MIGRATION_RADIUS);
        let Some(&target) = candidates.first() else {
            return;
        };
        let Some(current) = grid.field_at(self.position) else {
            return;
        };
        let cost = 5.0 * (1.0 + current.terrain_difficulty / 100.0);
        if self.endurance >= cost {
            self.position = target;
            self.endurance -= cost;
            self.consume_food_supply();
            self.consume_water_supply();
            self.last_migrated = tick as i64;
            self.migrations_count += 1;
        }
    }

    // ---- trait recalculation ---------------------------------------------

    pub fn calculate_fertility(&mut self, field: Option<&Field>) {
        let mut base = self.fertility;
        if self.health > 70.0 {
            base += 5.0;
        }
        if self.hunger < 40.0 {
            base += 3.0;
        }
        if self.thirst < 40.0 {
            base += 3.0;
        }
        if self.population > 30.0 && self.population < 90.0 {
            base += 2.0;
        }
        if self.age < 35.0 {
            base += 4.0;
        }
        if self.hunger > 60.0 {
            base -= 5.0;
        }
        if self.thirst > 60.0 {
            base -= 5.0;
        }
        if self.health < 40.0 {
            base -= 5.0;
        }
        if field.is_some_and(|f| f.danger > 70.0) {
            base -= 4.0;
        }
        if self.population > 90.0 || self.population < 30.0 {
            base -= 6.0;
        }
        if self.age > 50.0 {
            base -= 4.0;
        }
        self.fertility = clamp_attr(base);
    }

    pub fn calculate_mortality(&mut self, field: Option<&Field>, weather: f64) {
        let mut base = self.mortality;
        if self.health < 40.0 {
            base += 7.0;
        }
        if self.hunger > 80.0 {
            base += 9.0;
        }
        if self.thirst > 80.0 {
            base += 11.0;
        }
        if self.age > 45.0 {
            base += (self.age - 45.0) / 5.0;
        }
        if field.is_some_and(|f| f.danger > 70.0) {
            base += 7.0;
        }
        if weather > 80.0 {
            base += 5.0;
        }
        if self.aggression > 80.0 {
            base += 3.0;
        }
        if self.health > 70.0 {
            base -= 5.0;
        }
        if self.hunger < 40.0 {
            base -= 3.0;
        }
        if self.thirst < 40.0 {
            base -= 3.0;
        }
        if field.is_some_and(|f| f.danger < 30.0) {
            base -= 2.0;
        }
        if self.age < 35.0 {
            base -= 4.0;
        }
        self.mortality = clamp_attr(base);
    }

    pub fn calculate_aggression(&mut self) {
        let mut base = self.aggression;
        if self.hunger > 70.0 {
            base += 7.0;
        }
        if self.thirst > 70.0 {
            base += 7.0;
        }
        if self.population > 80.0 {
            base += 5.0;
        }
        if self.trust < 30.0 {
            base += 6.0;
        }
        if self.resourcefulness < 30.0 {
            base += 4.0;
        }
        if self.food_supply < 30.0 {
            base += 5.0;
        }
        if self.water_supply < 30.0 {
            base += 5.0;
        }
        if self.trust > 70.0 {
            base -= 6.0;
        }
        if self.food_supply > 80.0 {
            base -= 5.0;
        }
        if self.water_supply > 80.0 {
            base -= 5.0;
        }
        if self.population < 30.0 {
            base -= 3.0;
        }
        if self.health < 30.0 {
            base -= 4.0;
        }
        if self.resourcefulness > 70.0 {
            base -= 6.0;
        }
        self.aggression = clamp_attr(base);
    }

    pub fn calculate_trust(&mut self, field: Option<&Field>, weather: f64) {
        let mut base = self.trust;
        if self.food_supply > 80.0 {
            base += 6.0;
        }
        if self.water_supply > 80.0 {
            base += 6.0;
        }
        if field.is_some_and(|f| f.danger < 40.0) {
            base += 4.0;
        }
        if self.resourcefulness > 70.0 {
            base += 5.0;
        }
        if self.health > 70.0 {
            base += 4.0;
        }
        if field.is_some_and(|f| f.danger > 60.0) {
            base -= 6.0;
        }
        if self.hunger > 70.0 {
            base -= 5.0;
        }
        if self.thirst > 70.0 {
            base -= 5.0;
        }
        if self.aggression > 70.0 {
            base -= 6.0;
        }
        if weather > 80.0 {
            base -= 4.0;
        }
        self.trust = clamp_attr(base);
    }

    pub fn calculate_resourcefulness(&mut self, weather: f64) {
        let mut base = self.resourcefulness;
        if self.age > 40.0 {
            base += ((self.age - 40.0) / 4.0).min(15.0);
        }
        if self.health > 60.0 {
            base += 4.0;
        }
        if self.hunger < 50.0 {
            base += 2.0;
        }
        if self.thirst < 50.0 {
            base += 2.0;
        }
        if self.population > 40.0 {
            base += 3.0;
        }
        if self.health < 40.0 {
            base -= 5.0;
        }
        if self.hunger > 70.0 {
            base -= 6.0;
        }
        if self.thirst > 70.0 {
            base -= 6.0;
        }
        if self.population < 30.0 {
            base -= 4.0;
        }
        if weather > 80.0 {
            base -= 5.0;
        }
        self.resourcefulness = clamp_attr(base);
    }

    pub fn calculate_endurance(&mut self, field: Option<&Field>, weather: f64, tick: u64) {
        let mut base = self.endurance;
        // A tribe that has rested at least one full tick recovers strongly.
        if self.last_migrated == -1 || tick as i64 - self.last_migrated > 1 {
            base += 10.0;
        }
        if self.health > 70.0 {
            base += 4.0;
        }
        if self.resourcefulness > 60.0 {
            base += 3.0;
        }
        if self.food_supply > 60.0 {
            base += 2.0;
        }
        if self.water_supply > 60.0 {
            base += 2.0;
        }
        if self.health < 50.0 {
            base -= 2.0;
        }
        if self.hunger > 60.0 {
            base -= 3.0;
        }
        if self.thirst > 60.0 {
            base -= 4.0;
        }
        if field.is_some_and(|f| f.terrain_difficulty > 70.0) {
            base -= 2.0;
        }
        if weather > 80.0 {
            base -= 4.0;
        }
        if self.population > 90.0 {
            base -= 3.0;
        }
        self.endurance = clamp_attr(base);
    }

    /// Runs the six social recalculations in their fixed order.
    pub fn recalculate_traits(&mut self, field: Option<&Field>, weather: f64, tick: u64) {
        self.calculate_fertility(field);
        self.calculate_mortality(field, weather);
        self.calculate_aggression();
        self.calculate_trust(field, weather);
        self.calculate_resourcefulness(weather);
        self.calculate_endurance(field, weather, tick);
    }

    pub fn advance_age(&mut self) {
        self.age = (self.age + 0.1).min(100.0);
    }

    /// Picks the memory counter with the highest value above the threshold
    /// of 3; old tribes with no standout history become Established.
    pub fn refresh_dominant_trait(&mut self) {
        let counters = [
            (DominantTrait::Warlike, self.wars_won),
            (DominantTrait::Survivor, self.crises_survived),
            (DominantTrait::Nomadic, self.migrations_count),
            (DominantTrait::Prosperous, self.prosperity_periods),
        ];

        let mut best = DominantTrait::Stable;
        let mut best_value = 3;
        for (trait_kind, value) in counters {
            if value > best_value {
                best_value = value;
                best = trait_kind;
            }
        }

        if best == DominantTrait::Stable && self.age > 60.0 {
            best = DominantTrait::Established;
        }
        self.dominant_trait = best;
    }
}

// ---- interactions --------------------------------------------------------

/// What a tribe decides to do about a co-located neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Attack,
    Merge,
}

/// Attack outweighed-neighbors when aggressive; merge with trusting peers.
pub fn interaction_intent(actor: &Tribe, other: &Tribe) -> Option<Intent> {
    if actor.aggression > 70.0 && other.population < actor.population {
        Some(Intent::Attack)
    } else if actor.trust > 70.0 && other.trust > 50.0 {
        Some(Intent::Merge)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    AttackerWon,
    DefenderHeld,
}

/// Resolves a raid. Success odds scale with the population ratio and the
/// attacker's aggression. Returns `None` when the defender has no
/// population to contest (no battle takes place).
pub fn resolve_attack(
    attacker: &mut Tribe,
    defender: &mut Tribe,
    rng: &mut RandomSource,
) -> Option<AttackOutcome> {
    if defender.population <= 0.0 {
        return None;
    }
    let success_prob = (attacker.population / defender.population) * (attacker.aggression / 100.0);
    if rng.chance(success_prob) {
        defender.health = (defender.health - 20.0).max(1.0);
        attacker.food_supply = (attacker.food_supply + defender.food_supply * 0.5).min(100.0);
        attacker.water_supply = (attacker.water_supply + defender.water_supply * 0.5).min(100.0);
        defender.food_supply *= 0.5;
        defender.water_supply *= 0.5;
        attacker.wars_won += 1;
        defender.wars_lost += 1;
        Some(AttackOutcome::AttackerWon)
    } else {
        // A repelled raid counts as a win for the defender.
        attacker.wars_lost += 1;
        defender.wars_won += 1;
        Some(AttackOutcome::DefenderHeld)
    }
}

/// Attempts to fold `absorbed` into `absorber`. On success the populations
/// sum exactly; blended attributes use the pre-merge populations as
/// weights. The caller removes `absorbed` from the live set.
pub fn resolve_merge(absorber: &mut Tribe, absorbed: &mut Tribe, rng: &mut RandomSource) -> bool {
    if !rng.chance((absorber.trust + absorbed.trust) / 200.0) {
        return false;
    }

    let weight_a = absorber.population;
    let weight_b = absorbed.population;
    let total = weight_a + weight_b;

    absorber.population = total;
    absorber.health = (absorber.health + absorbed.health) / 2.0;
    absorber.fertility = (absorber.fertility + absorbed.fertility) / 2.0;
    absorber.mortality = (absorber.mortality + absorbed.mortality) / 2.0;
    absorber.age = (absorber.age * weight_a + absorbed.age * weight_b) / total;
    absorber.aggression = (absorber.aggression * weight_a + absorbed.aggression * weight_b) / total;
    absorber.trust = (absorber.trust * weight_a + absorbed.trust * weight_b) / total;
    absorber.resourcefulness =
        (absorber.resourcefulness * weight_a + absorbed.resourcefulness * weight_b) / total;
    absorber.food_supply = (absorber.food_supply + absorbed.food_supply).min(100.0);
    absorber.water_supply = (absorber.water_supply + absorbed.water_supply).min(100.0);
    true
}

fn clamp_attr(value: f64) -> f64 {
    value.clamp(1.0, 100.0)
}
