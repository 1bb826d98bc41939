//! ECS components for the simulation.
//!
//! Components are pure data; all logic lives in the systems that query them.

pub mod actors;
pub mod common;
pub mod tasks;

pub use farmstay_logic::grid::{CellMetrics, GridPos};

pub use actors::{
    states, Actor, Animating, Archetype, BehaviorState, BehaviorTable, Mobility, Position,
};
pub use common::{Facing, Name, Vec2};
pub use tasks::{
    AutonomousState, BehaviorTask, DirectedMove, LoopPhase, MotionMode, MotionTask, MoveCallback,
};
