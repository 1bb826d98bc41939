//! Externally directed path-following, mutually exclusive with the
//! autonomous loop.
//!
//! A directed move owns the actor for its whole duration: `overridden` goes
//! true when it starts, the autonomous task is cancelled outright (never
//! queued behind), and the caller's completion callback fires exactly once.

use std::fmt;

use farmstay_logic::grid::{CellMetrics, GridPos, Walkability};
use farmstay_logic::pathfinding::find_path;
use hecs::{Entity, World};

use super::motion::advance_motion;
use super::play_resolved;
use crate::archetypes::ArchetypeLibrary;
use crate::components::{
    states, Animating, Archetype, AutonomousState, DirectedMove, LoopPhase, Mobility, MotionMode,
    MotionTask, MoveCallback, Position, Vec2,
};
use crate::config::SimConfig;
use crate::engine::AnimationHost;

/// Why a directed-move request was rejected. By the time the caller sees
/// this, the completion callback has already fired with `success = false`
/// and the actor has not moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The destination cell fails the walkability check.
    InvalidDestination,
    /// The search exhausted without reaching the destination.
    NoPathFound,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidDestination => write!(f, "destination is not walkable"),
            MoveError::NoPathFound => write!(f, "no path to destination"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Cancel whatever cooperative task is currently running for the actor.
///
/// Two motion tasks must never mutate the same actor concurrently, so this
/// runs before any new task starts. A cancelled directed move fires its
/// callback once with `success = false`; the interrupted position stays
/// where it is — mid-tile is fine.
pub fn cancel_active_tasks(world: &mut World, entity: Entity) {
    if let Ok(mut auto) = world.get::<&mut AutonomousState>(entity) {
        auto.phase = LoopPhase::Suspended;
    }
    if let Ok(mut previous) = world.remove_one::<DirectedMove>(entity) {
        if let Some(callback) = previous.on_complete.take() {
            callback(false);
        }
    }
    if let Ok(mut mobility) = world.get::<&mut Mobility>(entity) {
        mobility.overridden = false;
    }
}

/// Ask an actor to walk to `destination`.
///
/// Validation failures report through the callback immediately, with no
/// movement and the autonomous loop left untouched. On success the actor is
/// overridden until the path completes; `continue_after` decides whether the
/// autonomous loop restarts afterwards.
pub fn start_directed_move(
    world: &mut World,
    terrain: &dyn Walkability,
    entity: Entity,
    destination: GridPos,
    continue_after: bool,
    on_complete: MoveCallback,
) -> Result<(), MoveError> {
    let current = match world.get::<&Position>(entity) {
        Ok(position) => position.cell,
        Err(_) => {
            // Despawned or non-actor target: nothing can move.
            on_complete(false);
            return Err(MoveError::InvalidDestination);
        }
    };

    if !terrain.is_walkable(destination) {
        log::debug!("move rejected, {:?} is not walkable", destination);
        on_complete(false);
        return Err(MoveError::InvalidDestination);
    }

    let Some(path) = find_path(terrain, current, destination) else {
        log::debug!("move rejected, no path {:?} -> {:?}", current, destination);
        on_complete(false);
        return Err(MoveError::NoPathFound);
    };

    cancel_active_tasks(world, entity);

    if path.len() <= 1 {
        // Already standing on the destination: zero steps, immediate success.
        finish_move(world, entity, continue_after, Some(on_complete), true);
        return Ok(());
    }

    if let Ok(mut mobility) = world.get::<&mut Mobility>(entity) {
        mobility.overridden = true;
    }
    let _ = world.insert_one(
        entity,
        DirectedMove {
            steps: path[1..].to_vec(),
            next: 0,
            motion: None,
            continue_after,
            on_complete: Some(on_complete),
        },
    );
    Ok(())
}

/// Advance every in-flight directed move by one tick.
pub fn directed_system(
    world: &mut World,
    dt: f32,
    archetypes: &ArchetypeLibrary,
    animations: &mut dyn AnimationHost,
    metrics: &CellMetrics,
    config: &SimConfig,
) {
    let mut finished: Vec<(Entity, bool, Option<MoveCallback>)> = Vec::new();

    for (entity, (archetype, position, mobility, directed, animating)) in world
        .query::<(
            &Archetype,
            &mut Position,
            &mut Mobility,
            &mut DirectedMove,
            &mut Animating,
        )>()
        .iter()
    {
        if directed.motion.is_none() {
            if directed.next >= directed.steps.len() {
                finished.push((
                    entity,
                    directed.continue_after,
                    directed.on_complete.take(),
                ));
                continue;
            }
            let step = directed.steps[directed.next];
            directed.next += 1;

            // A step further than adjacency is a leap over a blocked cell.
            let leap = position.cell.manhattan_distance(step) > 1;
            let (x, y) = metrics.cell_center(step);
            let motion = MotionTask {
                from_world: position.world,
                target_cell: step,
                target_world: Vec2::new(x, y),
                mode: if leap {
                    MotionMode::Leap {
                        elapsed: 0.0,
                        duration: config.leap_duration,
                    }
                } else {
                    MotionMode::Linear {
                        speed: config.directed_speed,
                    }
                },
            };
            if let Some(spec) = archetypes.get(&archetype.0) {
                let animation = if leap { states::JUMP } else { states::WALK };
                play_resolved(entity, animation, &spec.fallbacks, animations, animating);
            }
            directed.motion = Some(motion);
        }

        let mut arrived = false;
        if let Some(motion) = &mut directed.motion {
            arrived = advance_motion(position, mobility, motion, dt, config);
        }
        if arrived {
            directed.motion = None;
            if directed.next >= directed.steps.len() {
                finished.push((
                    entity,
                    directed.continue_after,
                    directed.on_complete.take(),
                ));
            }
        }
    }

    for (entity, continue_after, callback) in finished {
        let _ = world.remove_one::<DirectedMove>(entity);
        finish_move(world, entity, continue_after, callback, true);
    }
}

fn finish_move(
    world: &mut World,
    entity: Entity,
    continue_after: bool,
    on_complete: Option<MoveCallback>,
    success: bool,
) {
    if let Ok(mut mobility) = world.get::<&mut Mobility>(entity) {
        mobility.overridden = false;
    }
    if let Ok(mut auto) = world.get::<&mut AutonomousState>(entity) {
        auto.phase = if continue_after {
            LoopPhase::Choosing
        } else {
            LoopPhase::Suspended
        };
    }
    if let Some(callback) = on_complete {
        callback(success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Actor, BehaviorTable, Facing};
    use crate::engine::NullAnimations;
    use std::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Arc;

    // Callback outcome: 0 = not called, 1 = failure, 2 = success.
    fn recording_callback() -> (Arc<AtomicU8>, MoveCallback) {
        let flag = Arc::new(AtomicU8::new(0));
        let inner = flag.clone();
        let callback: MoveCallback =
            Box::new(move |success| inner.store(if success { 2 } else { 1 }, Ordering::SeqCst));
        (flag, callback)
    }

    fn open_terrain(cell: GridPos) -> bool {
        (0..10).contains(&cell.x) && (0..10).contains(&cell.y) && cell != GridPos::new(2, 0)
    }

    fn spawn_actor(world: &mut World, cell: GridPos) -> Entity {
        let metrics = CellMetrics::default();
        world.spawn((
            Actor,
            Archetype("porter".into()),
            Position::at_cell(cell, &metrics),
            Mobility::default(),
            BehaviorTable::new(vec![("idle".into(), 1.0)], None),
            AutonomousState::default(),
            Animating::default(),
        ))
    }

    fn run_until_done(world: &mut World, flag: &AtomicU8, max_ticks: u32) {
        let archetypes = ArchetypeLibrary::builtin();
        let metrics = CellMetrics::default();
        let config = SimConfig::default();
        let mut animations = NullAnimations;
        let mut ticks = 0;
        while flag.load(Ordering::SeqCst) == 0 && ticks < max_ticks {
            directed_system(world, 0.05, &archetypes, &mut animations, &metrics, &config);
            ticks += 1;
        }
    }

    #[test]
    fn test_move_completes_and_reports_success() {
        let mut world = World::new();
        let entity = spawn_actor(&mut world, GridPos::new(0, 0));
        let (flag, callback) = recording_callback();

        start_directed_move(
            &mut world,
            &open_terrain,
            entity,
            GridPos::new(4, 0),
            false,
            callback,
        )
        .unwrap();
        assert!(world.get::<&Mobility>(entity).unwrap().overridden);

        run_until_done(&mut world, &flag, 10_000);

        assert_eq!(flag.load(Ordering::SeqCst), 2);
        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.cell, GridPos::new(4, 0));
        let mobility = world.get::<&Mobility>(entity).unwrap();
        assert!(!mobility.overridden);
        assert_eq!(mobility.facing, Facing::Right);
        // The route leapt over the blocked cell (2,0).
        assert!(world.get::<&DirectedMove>(entity).is_err());
    }

    #[test]
    fn test_unwalkable_destination_rejected() {
        let mut world = World::new();
        let entity = spawn_actor(&mut world, GridPos::new(0, 0));
        let (flag, callback) = recording_callback();

        let result = start_directed_move(
            &mut world,
            &open_terrain,
            entity,
            GridPos::new(2, 0),
            true,
            callback,
        );

        assert_eq!(result, Err(MoveError::InvalidDestination));
        assert_eq!(flag.load(Ordering::SeqCst), 1);
        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.cell, GridPos::new(0, 0));
        // Validation failure leaves the autonomous loop untouched.
        let auto = world.get::<&AutonomousState>(entity).unwrap();
        assert!(matches!(auto.phase, LoopPhase::Choosing));
    }

    #[test]
    fn test_unreachable_destination_rejected() {
        let mut world = World::new();
        let entity = spawn_actor(&mut world, GridPos::new(0, 0));
        let (flag, callback) = recording_callback();

        // Two islands: (0,0) and (5,5) only.
        let islands =
            |cell: GridPos| cell == GridPos::new(0, 0) || cell == GridPos::new(5, 5);
        let result = start_directed_move(
            &mut world,
            &islands,
            entity,
            GridPos::new(5, 5),
            true,
            callback,
        );

        assert_eq!(result, Err(MoveError::NoPathFound));
        assert_eq!(flag.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_destination_equals_current_cell() {
        let mut world = World::new();
        let entity = spawn_actor(&mut world, GridPos::new(3, 3));
        let (flag, callback) = recording_callback();

        let result = start_directed_move(
            &mut world,
            &open_terrain,
            entity,
            GridPos::new(3, 3),
            true,
            callback,
        );

        assert_eq!(result, Ok(()));
        assert_eq!(flag.load(Ordering::SeqCst), 2);
        let mobility = world.get::<&Mobility>(entity).unwrap();
        assert!(!mobility.overridden);
        // Continuation requested: the loop restarts.
        let auto = world.get::<&AutonomousState>(entity).unwrap();
        assert!(matches!(auto.phase, LoopPhase::Choosing));
    }

    #[test]
    fn test_new_move_cancels_previous() {
        let mut world = World::new();
        let entity = spawn_actor(&mut world, GridPos::new(0, 0));
        let (first_flag, first_callback) = recording_callback();
        let (second_flag, second_callback) = recording_callback();

        start_directed_move(
            &mut world,
            &open_terrain,
            entity,
            GridPos::new(9, 9),
            false,
            first_callback,
        )
        .unwrap();
        start_directed_move(
            &mut world,
            &open_terrain,
            entity,
            GridPos::new(0, 1),
            false,
            second_callback,
        )
        .unwrap();

        // The first move was cancelled outright, not queued.
        assert_eq!(first_flag.load(Ordering::SeqCst), 1);

        run_until_done(&mut world, &second_flag, 10_000);
        assert_eq!(second_flag.load(Ordering::SeqCst), 2);
        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.cell, GridPos::new(0, 1));
    }

    #[test]
    fn test_completion_without_continuation_suspends() {
        let mut world = World::new();
        let entity = spawn_actor(&mut world, GridPos::new(0, 0));
        let (flag, callback) = recording_callback();

        start_directed_move(
            &mut world,
            &open_terrain,
            entity,
            GridPos::new(1, 0),
            false,
            callback,
        )
        .unwrap();
        run_until_done(&mut world, &flag, 10_000);

        let auto = world.get::<&AutonomousState>(entity).unwrap();
        assert!(matches!(auto.phase, LoopPhase::Suspended));
    }
}
