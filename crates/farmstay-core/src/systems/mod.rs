//! Simulation systems — logic that queries and updates components.

pub mod behavior;
pub mod directed;
pub mod motion;

pub use behavior::behavior_system;
pub use directed::{cancel_active_tasks, directed_system, start_directed_move, MoveError};
pub use motion::advance_motion;

use farmstay_logic::animation::FallbackChain;
use hecs::Entity;

use crate::components::Animating;
use crate::engine::AnimationHost;

/// Resolve `requested` through the archetype's fallback chain and play the
/// result when it differs from what the actor already plays. A chain that
/// exhausts leaves the current animation untouched.
pub(crate) fn play_resolved(
    entity: Entity,
    requested: &str,
    fallbacks: &FallbackChain,
    animations: &mut dyn AnimationHost,
    animating: &mut Animating,
) {
    match fallbacks.resolve(requested, |name| animations.has_animation(entity, name)) {
        Some(resolved) => {
            if animating.current.as_deref() != Some(resolved.as_str()) {
                animations.play_animation(entity, &resolved);
                animating.current = Some(resolved);
            }
        }
        None => {
            log::warn!("animation '{}' did not resolve, keeping current", requested);
        }
    }
}
