//! Tick orchestration: environment update, randomized tribe activation,
//! interaction resolution, random events, seasonal rollover, and metrics.

use std::collections::HashMap;

use crate::config::Scenario;
use crate::ecosystem::{Ecosystem, EventKind};
use crate::grid::{Grid, Position};
use crate::rng::RandomSource;
use crate::snapshot::MetricsSnapshot;
use crate::tribe::{
    interaction_intent, resolve_attack, resolve_merge, Intent, Tribe, TribeId,
};

/// What one call to [`Engine::tick`] produced.
#[derive(Debug, Clone)]
pub struct TickSummary {
    pub tick: u64,
    pub event: Option<EventKind>,
    pub metrics: MetricsSnapshot,
}

pub struct Engine {
    grid: Grid,
    ecosystem: Ecosystem,
    tribes: Vec<Tribe>,
    rng: RandomSource,
    current_period: u64,
    event_frequency: f64,
    conflicts_this_tick: u32,
    mergers_this_tick: u32,
}

impl Engine {
    /// Builds the world: randomized terrain and tribes dropped at uniform
    /// random positions. The same scenario always builds the same world.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let mut rng = RandomSource::new(scenario.random_seed);
        let grid = Grid::generate(scenario.map.width, scenario.map.height, &mut rng);
        let tribes = (0..scenario.tribes.count)
            .map(|index| {
                let position = Position::new(
                    rng.uniform_int(0, scenario.map.width),
                    rng.uniform_int(0, scenario.map.height),
                );
                Tribe::new(index as TribeId, position)
            })
            .collect();

        Self {
            grid,
            ecosystem: Ecosystem::new(scenario.food_modifier),
            tribes,
            rng,
            current_period: 0,
            event_frequency: scenario.event_frequency,
            conflicts_this_tick: 0,
            mergers_this_tick: 0,
        }
    }

    /// Advances the world by exactly one period. Never fails: all arithmetic
    /// is clamped and all grid lookups are bounds-safe.
    pub fn tick(&mut self) -> TickSummary {
        self.conflicts_this_tick = 0;
        self.mergers_this_tick = 0;

        self.ecosystem.update_resources(&mut self.grid);
        self.ecosystem.apply_pressure(&self.grid, &mut self.tribes);

        // Fresh random permutation every tick; activation order matters for
        // interaction outcomes.
        let mut order: Vec<usize> = (0..self.tribes.len()).collect();
        self.rng.shuffle(&mut order);
        let mut alive = vec![true; self.tribes.len()];
        for index in order {
            if alive[index] {
                self.activate(index, &mut alive);
            }
        }
        // Tribes absorbed by a merge leave the live set here.
        let mut keep = alive.into_iter();
        self.tribes.retain(|_| keep.next().unwrap_or(true));

        self.sweep_colocated();

        let event = if self.rng.chance(self.event_frequency) {
            let event = self
                .ecosystem
                .trigger_random_event(&mut self.grid, &mut self.rng);
            tracing::info!(tick = self.current_period, event = event.name(), "environmental event");
            Some(event)
        } else {
            None
        };

        if self.current_period % 10 == 0 && self.current_period > 0 {
            self.ecosystem.advance_season(&mut self.rng);
            tracing::debug!(
                tick = self.current_period,
                season = self.ecosystem.season().name(),
                "season changed"
            );
        }

        let metrics = self.metrics();
        self.current_period += 1;

        TickSummary {
            tick: metrics.tick,
            event,
            metrics,
        }
    }

    /// One tribe's full turn, in the fixed order the rules depend on:
    /// wellbeing bookkeeping, needs, gathering, consumption, migration,
    /// interactions, trait recalculation, aging.
    fn activate(&mut self, index: usize, alive: &mut [bool]) {
        let tick = self.current_period;
        let weather = self.ecosystem.weather();

        {
            let tribe = &mut self.tribes[index];
            tribe.record_wellbeing();
            tribe.update_hunger(weather);
            tribe.update_thirst(weather);
            let field = self.grid.field_at(tribe.position);
            tribe.update_health(field, weather);
            tribe.update_population();
        }

        {
            let tribe = &mut self.tribes[index];
            if tribe.hunger > 45.0 {
                if let Some(field) = self.grid.field_at_mut(tribe.position) {
                    tribe.collect_food(field);
                }
            }
            if tribe.thirst > 45.0 {
                if let Some(field) = self.grid.field_at_mut(tribe.position) {
                    tribe.collect_water(field);
                }
            }
            tribe.consume_food_supply();
            tribe.consume_water_supply();

            if (tribe.hunger > 40.0 || tribe.thirst > 40.0) && tribe.endurance > 6.0 {
                tribe.migrate(&self.grid, tick);
            }
        }

        self.resolve_interactions(index, alive);

        {
            let tribe = &mut self.tribes[index];
            let field = self.grid.field_at(tribe.position);
            tribe.recalculate_traits(field, weather, tick);
            tribe.advance_age();
            if tick % 25 == 0 {
                tribe.refresh_dominant_trait();
            }
        }
    }

    /// Resolves this tribe's intent toward every other live tribe on its
    /// cell. The co-located group is snapshotted up front: a merge removes
    /// the absorbed tribe, and the scan must not observe that mid-flight.
    fn resolve_interactions(&mut self, index: usize, alive: &mut [bool]) {
        let position = self.tribes[index].position;
        let cohabitants: Vec<usize> = (0..self.tribes.len())
            .filter(|&other| other != index && alive[other] && self.tribes[other].position == position)
            .collect();

        for other in cohabitants {
            let (actor, target) = pair_mut(&mut self.tribes, index, other);
            let (actor_id, target_id) = (actor.id, target.id);
            match interaction_intent(actor, target) {
                Some(Intent::Attack) => {
                    // One increment per resolved raid, whichever side wins.
                    if resolve_attack(actor, target, &mut self.rng).is_some() {
                        self.conflicts_this_tick += 1;
                    }
                }
                Some(Intent::Merge) => {
                    if resolve_merge(actor, target, &mut self.rng) {
                        alive[other] = false;
                        self.mergers_this_tick += 1;
                        tracing::debug!(
                            tick = self.current_period,
                            absorber = actor_id,
                            absorbed = target_id,
                            "tribes merged"
                        );
                    }
                }
                None => {}
            }
        }
    }

    /// Post-activation sweep over shared cells. Pairwise attack/merge is
    /// already settled during each tribe's own turn; this is the seam for
    /// rules that need a whole co-located group at once.
    fn sweep_colocated(&self) {
        let mut occupancy: HashMap<Position, usize> = HashMap::new();
        for tribe in &self.tribes {
            *occupancy.entry(tribe.position).or_default() += 1;
        }
        let contested = occupancy.values().filter(|&&count| count > 1).count();
        if contested > 0 {
            tracing::trace!(tick = self.current_period, contested, "contested cells");
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::collect(
            self.current_period,
            self.ecosystem.season(),
            self.ecosystem.weather(),
            &self.tribes,
            self.conflicts_this_tick,
            self.mergers_this_tick,
        )
    }

    pub fn current_period(&self) -> u64 {
        self.current_period
    }

    pub fn tribes(&self) -> &[Tribe] {
        &self.tribes
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable terrain access for hosts that stage bespoke conditions
    /// (tests, scripted scenarios).
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn ecosystem(&self) -> &Ecosystem {
        &self.ecosystem
    }
}

/// Two distinct mutable tribes out of the same slice.
fn pair_mut(tribes: &mut [Tribe], a: usize, b: usize) -> (&mut Tribe, &mut Tribe) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = tribes.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = tribes.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfig, TribesConfig};

    fn small_scenario(seed: u64, tribes: usize) -> Scenario {
        Scenario {
            random_seed: seed,
            map: MapConfig {
                width: 10,
                height: 10,
            },
            tribes: TribesConfig { count: tribes },
            event_frequency: 0.1,
            ..Scenario::default()
        }
    }

    /// Parks two tribes on the same cell with calm needs so neither
    /// migrates or gathers before the interaction fires.
    fn co_located_pair(engine: &mut Engine) {
        for tribe in &mut engine.tribes {
            tribe.position = Position::new(2, 2);
            tribe.hunger = 1.0;
            tribe.thirst = 1.0;
            tribe.food_supply = 90.0;
            tribe.water_supply = 90.0;
        }
    }

    #[test]
    fn world_building_places_tribes_in_bounds() {
        let engine = Engine::from_scenario(&small_scenario(3, 8));
        assert_eq!(engine.tribes().len(), 8);
        for tribe in engine.tribes() {
            assert!(engine.grid().field_at(tribe.position).is_some());
        }
    }

    #[test]
    fn counters_reset_every_tick() {
        let mut engine = Engine::from_scenario(&small_scenario(3, 2));
        co_located_pair(&mut engine);
        engine.tribes[0].trust = 100.0;
        engine.tribes[1].trust = 100.0;
        let first = engine.tick();
        assert_eq!(first.metrics.mergers, 1);

        let second = engine.tick();
        assert_eq!(second.metrics.mergers, 0);
    }

    #[test]
    fn raid_counts_one_conflict() {
        let mut engine = Engine::from_scenario(&small_scenario(5, 2));
        co_located_pair(&mut engine);
        engine.tribes[0].aggression = 100.0;
        engine.tribes[0].population = 90.0;
        engine.tribes[0].trust = 1.0;
        engine.tribes[1].aggression = 1.0;
        engine.tribes[1].population = 10.0;
        engine.tribes[1].trust = 1.0;

        let summary = engine.tick();
        assert_eq!(summary.metrics.conflicts, 1);
        assert_eq!(summary.metrics.mergers, 0);
        assert_eq!(engine.tribes().len(), 2);
    }

    #[test]
    fn merge_removes_the_absorbed_tribe() {
        let mut engine = Engine::from_scenario(&small_scenario(9, 2));
        co_located_pair(&mut engine);
        engine.tribes[0].trust = 100.0;
        engine.tribes[1].trust = 100.0;
        engine.tribes[0].population = 70.0;
        engine.tribes[1].population = 20.0;

        let summary = engine.tick();
        assert_eq!(summary.metrics.mergers, 1);
        assert_eq!(engine.tribes().len(), 1);
        assert_eq!(engine.tribes()[0].population, 90.0);
    }

    #[test]
    fn period_advances_once_per_tick() {
        let mut engine = Engine::from_scenario(&small_scenario(1, 3));
        assert_eq!(engine.current_period(), 0);
        let summary = engine.tick();
        assert_eq!(summary.tick, 0);
        assert_eq!(engine.current_period(), 1);
    }

    #[test]
    fn barren_world_starves_a_lone_tribe() {
        let mut scenario = small_scenario(13, 1);
        scenario.food_modifier = 0.0;
        scenario.event_frequency = 0.0;
        let mut engine = Engine::from_scenario(&scenario);
        engine.tribes[0].food_supply = 0.0;
        engine.tribes[0].water_supply = 0.0;
        let start = engine.tribes[0].clone();

        for _ in 0..20 {
            // Hold the whole map barren so migration cannot escape it.
            for field in engine.grid.fields_mut() {
                field.food_availability = 0.0;
                field.water_availability = 0.0;
                field.danger = 50.0;
                field.terrain_difficulty = 50.0;
            }
            engine.tick();
        }

        let tribe = &engine.tribes[0];
        assert!(tribe.hunger > 80.0, "hunger stalled at {}", tribe.hunger);
        assert!(tribe.thirst > 80.0, "thirst stalled at {}", tribe.thirst);
        assert!(tribe.health < start.health);
        assert!(tribe.crises_survived > 0);
    }

    #[test]
    fn spent_tribes_stay_put_for_the_tick() {
        let mut engine = Engine::from_scenario(&small_scenario(21, 1));
        engine.tribes[0].endurance = 1.0;
        engine.tribes[0].hunger = 90.0;
        engine.tribes[0].thirst = 90.0;
        let position = engine.tribes[0].position;

        engine.tick();
        assert_eq!(engine.tribes[0].position, position);
    }

    #[test]
    fn pair_mut_returns_distinct_tribes() {
        let mut tribes = vec![
            Tribe::new(0, Position::new(0, 0)),
            Tribe::new(1, Position::new(1, 1)),
        ];
        let (a, b) = pair_mut(&mut tribes, 1, 0);
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 0);
    }
}
