//! Motion and behavior tuning.
//!
//! All waits and durations are bounded design-time values; nothing here is
//! negotiated at runtime.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Autonomous walk speed, world units per second.
    pub walk_speed: f32,
    /// Autonomous run speed, world units per second.
    pub run_speed: f32,
    /// Speed used for directed path-following steps.
    pub directed_speed: f32,
    /// Fixed duration of a timed leap over a blocked cell.
    pub leap_duration: f32,
    /// Peak of the parabolic hop, world units.
    pub leap_arc_height: f32,
    /// Distance at which a motion step counts as arrived.
    pub arrive_epsilon: f32,
    /// Idle handler wait range, seconds.
    pub idle_wait: (f32, f32),
    /// Pause between autonomous handlers, seconds.
    pub cooldown_wait: (f32, f32),
    /// Fixed duration of the jump animation state.
    pub jump_duration: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            walk_speed: 1.2,
            run_speed: 2.4,
            directed_speed: 1.8,
            leap_duration: 0.6,
            leap_arc_height: 0.5,
            arrive_epsilon: 0.05,
            idle_wait: (1.0, 3.0),
            cooldown_wait: (0.5, 1.5),
            jump_duration: 0.8,
        }
    }
}
