//! The world grid: a fixed rectangle of terrain cells with bounds-safe
//! lookup and the favorable-terrain search that drives migration.

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::rng::RandomSource;

/// How many candidate destinations a terrain search returns.
const TOP_CANDIDATES: usize = 3;

/// Penalty per step of Chebyshev distance when scoring a candidate cell.
const DISTANCE_PENALTY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: diagonal steps count as one.
    pub fn distance(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

pub struct Grid {
    width: i32,
    height: i32,
    fields: Vec<Field>,
}

impl Grid {
    /// Builds a width x height grid with uniformly random cells: every
    /// scalar drawn from [20, 80), seven in ten cells buildable.
    pub fn generate(width: i32, height: i32, rng: &mut RandomSource) -> Self {
        let mut fields = Vec::with_capacity((width * height) as usize);
        for _ in 0..width * height {
            fields.push(Field::new(
                rng.uniform_int(20, 80) as f64,
                rng.uniform_int(20, 80) as f64,
                rng.uniform_int(20, 80) as f64,
                rng.uniform_int(20, 80) as f64,
                rng.chance(0.7),
            ));
        }
        Self {
            width,
            height,
            fields,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn in_bounds(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    fn index(&self, position: Position) -> usize {
        (position.y * self.width + position.x) as usize
    }

    /// The cell at `position`, or `None` when out of bounds. Callers treat
    /// absence as a no-op rather than an error.
    pub fn field_at(&self, position: Position) -> Option<&Field> {
        if self.in_bounds(position) {
            Some(&self.fields[self.index(position)])
        } else {
            None
        }
    }

    pub fn field_at_mut(&mut self, position: Position) -> Option<&mut Field> {
        if self.in_bounds(position) {
            let index = self.index(position);
            Some(&mut self.fields[index])
        } else {
            None
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }

    /// The 8-connected Moore neighborhood, clipped to the grid.
    pub fn neighbors(&self, position: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let candidate = Position::new(position.x + dx, position.y + dy);
                if self.in_bounds(candidate) {
                    neighbors.push(candidate);
                }
            }
        }
        neighbors
    }

    /// Scores every in-bounds cell within Chebyshev distance `radius` of
    /// `origin` (excluding the origin itself) and returns the best three
    /// positions, richest first. The score trades resource abundance
    /// against danger, difficulty, and travel distance. Ties keep scan
    /// order (y-major, then x), so results are stable for a given grid.
    pub fn best_terrain(&self, origin: Position, radius: i32) -> Vec<Position> {
        let mut scored: Vec<(Position, f64)> = Vec::new();
        let y_lo = (origin.y - radius).max(0);
        let y_hi = (origin.y + radius).min(self.height - 1);
        let x_lo = (origin.x - radius).max(0);
        let x_hi = (origin.x + radius).min(self.width - 1);

        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let position = Position::new(x, y);
                if position == origin {
                    continue;
                }
                let Some(field) = self.field_at(position) else {
                    continue;
                };
                let score = field.water_availability + field.food_availability
                    - field.danger
                    - field.terrain_difficulty
                    - DISTANCE_PENALTY * origin.distance(position) as f64;
                scored.push((position, score));
            }
        }

        // Stable sort keeps scan order for equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(TOP_CANDIDATES)
            .map(|(position, _)| position)
            .collect()
    }

    /// Whether a settlement could be built at `position`; false out of bounds.
    pub fn can_build(&self, position: Position) -> bool {
        self.field_at(position).map(|f| f.can_build).unwrap_or(false)
    }
}
