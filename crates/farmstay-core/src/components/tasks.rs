//! Cooperative task components — explicit state machines advanced once per
//! simulation tick instead of language-level coroutines.
//!
//! An actor owns at most one state-loop task and at most one directed move
//! at any time; starting either cancels whatever was running. Cancellation
//! is non-transactional: a task removed mid-flight leaves the actor
//! mid-tile with no rollback.

use farmstay_logic::grid::GridPos;
use serde::{Deserialize, Serialize};

use super::common::Vec2;

/// Per-tick motion toward one target cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionTask {
    pub from_world: Vec2,
    pub target_cell: GridPos,
    pub target_world: Vec2,
    pub mode: MotionMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum MotionMode {
    /// Straight approach at a fixed speed until within the arrival epsilon.
    Linear { speed: f32 },
    /// Timed parabolic hop over a blocked cell; the grid cell commits on
    /// landing.
    Leap { elapsed: f32, duration: f32 },
}

/// One autonomous handler run to completion as a short cooperative task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BehaviorTask {
    /// Idle for a randomized duration.
    Wait { remaining: f32 },
    /// Walk or run one cell (or onto a leap landing).
    Step { motion: MotionTask },
    /// Timed jump animation, no displacement.
    Jump { remaining: f32 },
    /// Archetype-specific timed state.
    Custom { name: String, remaining: f32 },
}

/// Where the autonomous loop currently is for one actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoopPhase {
    /// Draw the next behavior state on the coming tick.
    Choosing,
    /// A handler's task is in flight.
    Running(BehaviorTask),
    /// Short randomized pause between handlers.
    Cooldown { remaining: f32 },
    /// Parked; stays parked until explicitly resumed.
    Suspended,
}

/// Autonomous loop bookkeeping. Present on every actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutonomousState {
    pub phase: LoopPhase,
}

impl Default for AutonomousState {
    fn default() -> Self {
        Self {
            phase: LoopPhase::Choosing,
        }
    }
}

/// Caller-supplied completion callback, invoked exactly once per request.
pub type MoveCallback = Box<dyn FnOnce(bool) + Send + Sync>;

/// Externally directed path-following. Present only while the actor's
/// `Mobility::overridden` flag is true; at most one per actor.
pub struct DirectedMove {
    /// Remaining waypoint cells (the start cell is not included).
    pub steps: Vec<GridPos>,
    pub next: usize,
    pub motion: Option<MotionTask>,
    /// Restart the autonomous loop after completion?
    pub continue_after: bool,
    pub on_complete: Option<MoveCallback>,
}
