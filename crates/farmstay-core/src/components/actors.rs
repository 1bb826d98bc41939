//! Actor-related components: identity, position, mobility, behavior table.

use farmstay_logic::grid::{CellMetrics, GridPos};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::{Facing, Vec2};

/// How many redraws the weighted table makes before giving up and idling
/// when the no-repeat rule keeps rejecting the special state.
const MAX_DRAW_ATTEMPTS: u32 = 4;

/// Behavior state names shared by every archetype.
pub mod states {
    pub const IDLE: &str = "idle";
    pub const WALK: &str = "walk";
    pub const RUN: &str = "run";
    pub const JUMP: &str = "jump";
}

/// Marker component identifying an entity as a mobile actor
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Actor;

/// Which archetype's behavior table, fallbacks and custom states apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archetype(pub String);

/// Spatial position: the logical grid cell plus the renderable world point.
///
/// `world` tracks the cell center except mid-step; `hop` is the vertical
/// offset a renderer applies while the actor is mid-leap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub cell: GridPos,
    pub world: Vec2,
    pub hop: f32,
}

impl Position {
    pub fn at_cell(cell: GridPos, metrics: &CellMetrics) -> Self {
        let (x, y) = metrics.cell_center(cell);
        Self {
            cell,
            world: Vec2::new(x, y),
            hop: 0.0,
        }
    }
}

/// Motion ownership state.
///
/// `overridden` is true exactly while a directed move owns the actor's
/// movement; the autonomous loop never issues motion while it is set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Mobility {
    pub facing: Facing,
    pub overridden: bool,
}

/// A logical behavior state an actor can be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviorState {
    Idle,
    Walk,
    Run,
    Jump,
    Custom(String),
}

impl BehaviorState {
    pub fn from_name(name: &str) -> Self {
        match name {
            states::IDLE => BehaviorState::Idle,
            states::WALK => BehaviorState::Walk,
            states::RUN => BehaviorState::Run,
            states::JUMP => BehaviorState::Jump,
            other => BehaviorState::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BehaviorState::Idle => states::IDLE,
            BehaviorState::Walk => states::WALK,
            BehaviorState::Run => states::RUN,
            BehaviorState::Jump => states::JUMP,
            BehaviorState::Custom(name) => name,
        }
    }
}

/// Weighted state table driving the autonomous loop.
///
/// Weights are re-normalized at every draw — the table may be edited
/// between draws. The optional `special` state is never drawn twice in a
/// row; `last_drawn` is per-actor memory, not shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorTable {
    pub entries: Vec<(String, f32)>,
    pub special: Option<String>,
    pub last_drawn: Option<String>,
}

impl BehaviorTable {
    pub fn new(entries: Vec<(String, f32)>, special: Option<String>) -> Self {
        Self {
            entries,
            special,
            last_drawn: None,
        }
    }

    fn weighted_pick(&self, rng: &mut impl Rng) -> Option<String> {
        let total: f32 = self.entries.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = rng.gen_range(0.0..total);
        for (name, weight) in &self.entries {
            let weight = weight.max(0.0);
            if roll < weight {
                return Some(name.clone());
            }
            roll -= weight;
        }
        // Float drift past the last bucket.
        self.entries.last().map(|(name, _)| name.clone())
    }

    /// Draw the next behavior state. Resamples a bounded number of times
    /// when the special state would repeat, then falls back to idle.
    pub fn draw(&mut self, rng: &mut impl Rng) -> String {
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let Some(name) = self.weighted_pick(rng) else {
                break;
            };
            let barred = self.special.as_deref() == Some(name.as_str())
                && self.last_drawn.as_deref() == Some(name.as_str());
            if !barred {
                self.last_drawn = Some(name.clone());
                return name;
            }
        }
        self.last_drawn = Some(states::IDLE.to_string());
        states::IDLE.to_string()
    }
}

/// Which animation the actor is currently playing, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Animating {
    pub current: Option<String>,
}
