//! Per-tick motion advancement shared by the autonomous loop and directed
//! moves.

use crate::components::{Facing, Mobility, MotionMode, MotionTask, Position};
use crate::config::SimConfig;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Advance a motion task by `dt` seconds.
///
/// Returns true when the target cell was reached and committed. Facing
/// follows the sign of the horizontal displacement, keeping the previous
/// facing when it is ~0.
pub fn advance_motion(
    position: &mut Position,
    mobility: &mut Mobility,
    task: &mut MotionTask,
    dt: f32,
    config: &SimConfig,
) -> bool {
    match &mut task.mode {
        MotionMode::Linear { speed } => {
            let delta = task.target_world - position.world;
            mobility.facing = Facing::from_dx(delta.x, mobility.facing);

            let distance = delta.length();
            let step = *speed * dt;
            if distance <= config.arrive_epsilon || step >= distance {
                position.world = task.target_world;
                position.cell = task.target_cell;
                position.hop = 0.0;
                true
            } else {
                position.world = position.world + delta * (step / distance);
                false
            }
        }
        MotionMode::Leap { elapsed, duration } => {
            *elapsed += dt;
            let t = if *duration > 0.0 {
                (*elapsed / *duration).min(1.0)
            } else {
                1.0
            };
            mobility.facing =
                Facing::from_dx(task.target_world.x - task.from_world.x, mobility.facing);
            position.world.x = lerp(task.from_world.x, task.target_world.x, t);
            position.world.y = lerp(task.from_world.y, task.target_world.y, t);
            position.hop = config.leap_arc_height * 4.0 * t * (1.0 - t);

            if t >= 1.0 {
                position.world = task.target_world;
                position.cell = task.target_cell;
                position.hop = 0.0;
                true
            } else {
                false
            }
        }
    }
}
