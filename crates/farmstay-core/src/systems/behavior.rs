//! Autonomous behavior loop — weighted random states for actors nobody is
//! directing.
//!
//! Each actor cycles choose → run-to-completion → cooldown. The loop never
//! issues motion while a directed move owns the actor, and a suspended loop
//! stays suspended until explicitly resumed.

use farmstay_logic::grid::{CellMetrics, Walkability};
use hecs::World;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::motion::advance_motion;
use super::play_resolved;
use crate::archetypes::{ArchetypeLibrary, CustomTaskFn};
use crate::components::{
    Animating, Archetype, AutonomousState, BehaviorState, BehaviorTable, BehaviorTask, LoopPhase,
    Mobility, MotionMode, MotionTask, Position, Vec2,
};
use crate::config::SimConfig;
use crate::engine::AnimationHost;

/// Advance every actor's autonomous loop by one tick.
#[allow(clippy::too_many_arguments)]
pub fn behavior_system(
    world: &mut World,
    dt: f32,
    rng: &mut StdRng,
    archetypes: &ArchetypeLibrary,
    terrain: &dyn Walkability,
    animations: &mut dyn AnimationHost,
    metrics: &CellMetrics,
    config: &SimConfig,
) {
    for (entity, (archetype, position, mobility, table, auto, animating)) in world
        .query::<(
            &Archetype,
            &mut Position,
            &mut Mobility,
            &mut BehaviorTable,
            &mut AutonomousState,
            &mut Animating,
        )>()
        .iter()
    {
        if mobility.overridden {
            // A directed move owns this actor.
            continue;
        }

        let next_phase = match &mut auto.phase {
            LoopPhase::Suspended => None,
            LoopPhase::Cooldown { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    Some(LoopPhase::Choosing)
                } else {
                    None
                }
            }
            LoopPhase::Choosing => match archetypes.get(&archetype.0) {
                Some(spec) => {
                    let drawn = table.draw(rng);
                    play_resolved(entity, &drawn, &spec.fallbacks, animations, animating);
                    let task =
                        build_task(&drawn, spec.custom, position, terrain, metrics, config, rng);
                    Some(LoopPhase::Running(task))
                }
                None => {
                    log::warn!("unknown archetype '{}', actor stays idle", archetype.0);
                    Some(LoopPhase::Cooldown {
                        remaining: config.cooldown_wait.1,
                    })
                }
            },
            LoopPhase::Running(task) => {
                let done = match task {
                    BehaviorTask::Wait { remaining }
                    | BehaviorTask::Jump { remaining }
                    | BehaviorTask::Custom { remaining, .. } => {
                        *remaining -= dt;
                        *remaining <= 0.0
                    }
                    BehaviorTask::Step { motion } => {
                        advance_motion(position, mobility, motion, dt, config)
                    }
                };
                if done {
                    Some(LoopPhase::Cooldown {
                        remaining: rng.gen_range(config.cooldown_wait.0..config.cooldown_wait.1),
                    })
                } else {
                    None
                }
            }
        };
        if let Some(phase) = next_phase {
            auto.phase = phase;
        }
    }
}

fn build_task(
    drawn: &str,
    custom: Option<CustomTaskFn>,
    position: &Position,
    terrain: &dyn Walkability,
    metrics: &CellMetrics,
    config: &SimConfig,
    rng: &mut StdRng,
) -> BehaviorTask {
    match BehaviorState::from_name(drawn) {
        BehaviorState::Idle => BehaviorTask::Wait {
            remaining: rng.gen_range(config.idle_wait.0..config.idle_wait.1),
        },
        BehaviorState::Walk => wander_step(position, terrain, metrics, config.walk_speed, rng),
        BehaviorState::Run => wander_step(position, terrain, metrics, config.run_speed, rng),
        BehaviorState::Jump => BehaviorTask::Jump {
            remaining: config.jump_duration,
        },
        BehaviorState::Custom(name) => custom
            .and_then(|factory| factory(&name, rng, config))
            .unwrap_or_else(|| {
                log::debug!("no handler for custom state '{}', idling instead", name);
                BehaviorTask::Wait {
                    remaining: config.idle_wait.0,
                }
            }),
    }
}

/// Pick a random walkable neighbor — or the leap landing two cells out when
/// the direct neighbor is blocked — and step onto it.
fn wander_step(
    position: &Position,
    terrain: &dyn Walkability,
    metrics: &CellMetrics,
    speed: f32,
    rng: &mut StdRng,
) -> BehaviorTask {
    let mut directions: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    directions.shuffle(rng);

    for (dx, dy) in directions {
        let step = position.cell.offset(dx, dy);
        let target = if terrain.is_walkable(step) {
            Some(step)
        } else {
            let landing = position.cell.offset(dx * 2, dy * 2);
            terrain.is_walkable(landing).then_some(landing)
        };
        if let Some(cell) = target {
            let (x, y) = metrics.cell_center(cell);
            return BehaviorTask::Step {
                motion: MotionTask {
                    from_world: position.world,
                    target_cell: cell,
                    target_world: Vec2::new(x, y),
                    mode: MotionMode::Linear { speed },
                },
            };
        }
    }

    // Boxed in on all four sides.
    BehaviorTask::Wait { remaining: 0.0 }
}
