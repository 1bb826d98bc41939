//! Engine-level scenarios: directed moves and the autonomous loop working
//! against each other on real terrain.
//!
//! All tests run headless with seeded RNGs — no rendering, no timers.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use farmstay_core::components::{
    Actor, Animating, Archetype, AutonomousState, BehaviorTable, GridPos, LoopPhase, Mobility,
    Position,
};
use farmstay_core::engine::{NullAnimations, SimulationEngine};
use farmstay_core::systems::MoveError;
use farmstay_core::terrain::TileTerrain;
use farmstay_logic::grid::CellMetrics;
use hecs::Entity;

// Callback outcome: 0 = pending, 1 = failure, 2 = success.
fn recording_callback() -> (Arc<AtomicU8>, impl FnOnce(bool) + Send + Sync + 'static) {
    let flag = Arc::new(AtomicU8::new(0));
    let inner = flag.clone();
    (flag, move |success: bool| {
        inner.store(if success { 2 } else { 1 }, Ordering::SeqCst)
    })
}

fn spawn_walker(engine: &mut SimulationEngine, cell: GridPos) -> Entity {
    let metrics = CellMetrics::default();
    engine.world.spawn((
        Actor,
        Archetype("farmer".into()),
        Position::at_cell(cell, &metrics),
        Mobility::default(),
        BehaviorTable::new(vec![("walk".into(), 1.0)], None),
        AutonomousState::default(),
        Animating::default(),
    ))
}

#[test]
fn directed_move_owns_the_actor_until_arrival() {
    let mut engine = SimulationEngine::with_seed(TileTerrain::new(12, 12), NullAnimations, 8);
    let actor = spawn_walker(&mut engine, GridPos::new(0, 0));
    let (flag, callback) = recording_callback();

    engine
        .move_actor_to(actor, GridPos::new(8, 0), true, callback)
        .unwrap();

    let mut ticks = 0;
    while flag.load(Ordering::SeqCst) == 0 && ticks < 10_000 {
        engine.update(0.05);
        ticks += 1;

        if flag.load(Ordering::SeqCst) == 0 {
            // Mid-move: the directed task owns motion and the autonomous
            // loop is parked, so it cannot drive any position change.
            let mobility = engine.world.get::<&Mobility>(actor).unwrap();
            assert!(mobility.overridden);
            let auto = engine.world.get::<&AutonomousState>(actor).unwrap();
            assert!(matches!(auto.phase, LoopPhase::Suspended));
        }
    }

    assert_eq!(flag.load(Ordering::SeqCst), 2);
    assert_eq!(
        engine.world.get::<&Position>(actor).unwrap().cell,
        GridPos::new(8, 0)
    );
    assert!(!engine.world.get::<&Mobility>(actor).unwrap().overridden);

    // Continuation was requested: the walker picks wandering back up.
    let arrival = GridPos::new(8, 0);
    let mut moved = false;
    for _ in 0..2_000 {
        engine.update(0.05);
        if engine.world.get::<&Position>(actor).unwrap().cell != arrival {
            moved = true;
            break;
        }
    }
    assert!(moved, "autonomous loop never resumed after continuation");
}

#[test]
fn directed_move_leaps_over_blocked_cell() {
    let mut terrain = TileTerrain::new(5, 5);
    terrain.set_walkable(GridPos::new(2, 2), false);
    let mut engine = SimulationEngine::with_seed(terrain, NullAnimations, 8);
    let actor = spawn_walker(&mut engine, GridPos::new(0, 2));
    let (flag, callback) = recording_callback();

    engine
        .move_actor_to(actor, GridPos::new(4, 2), false, callback)
        .unwrap();

    let mut peak_hop = 0.0f32;
    let mut ticks = 0;
    while flag.load(Ordering::SeqCst) == 0 && ticks < 10_000 {
        engine.update(0.05);
        ticks += 1;
        let position = engine.world.get::<&Position>(actor).unwrap();
        peak_hop = peak_hop.max(position.hop);
        // The blocked cell is never stood on.
        assert_ne!(position.cell, GridPos::new(2, 2));
    }

    assert_eq!(flag.load(Ordering::SeqCst), 2);
    assert_eq!(
        engine.world.get::<&Position>(actor).unwrap().cell,
        GridPos::new(4, 2)
    );
    assert!(peak_hop > 0.0, "route never left the ground");
}

#[test]
fn rejected_moves_leave_the_actor_alone() {
    let mut terrain = TileTerrain::new(6, 6);
    terrain.set_walkable(GridPos::new(5, 5), false);
    let mut engine = SimulationEngine::with_seed(terrain, NullAnimations, 8);
    let actor = spawn_walker(&mut engine, GridPos::new(1, 1));

    let (flag, callback) = recording_callback();
    let result = engine.move_actor_to(actor, GridPos::new(5, 5), true, callback);
    assert_eq!(result, Err(MoveError::InvalidDestination));
    assert_eq!(flag.load(Ordering::SeqCst), 1);

    let position = engine.world.get::<&Position>(actor).unwrap();
    assert_eq!(position.cell, GridPos::new(1, 1));
    assert!(!engine.world.get::<&Mobility>(actor).unwrap().overridden);
}

#[test]
fn move_to_current_cell_succeeds_with_zero_steps() {
    let mut engine = SimulationEngine::with_seed(TileTerrain::new(6, 6), NullAnimations, 8);
    let actor = spawn_walker(&mut engine, GridPos::new(2, 2));
    let (flag, callback) = recording_callback();

    let result = engine.move_actor_to(actor, GridPos::new(2, 2), false, callback);

    assert_eq!(result, Ok(()));
    assert_eq!(flag.load(Ordering::SeqCst), 2);
    assert_eq!(
        engine.world.get::<&Position>(actor).unwrap().cell,
        GridPos::new(2, 2)
    );
}

#[test]
fn resume_autonomy_is_explicit() {
    let mut engine = SimulationEngine::with_seed(TileTerrain::new(12, 12), NullAnimations, 8);
    let actor = spawn_walker(&mut engine, GridPos::new(5, 5));
    let (flag, callback) = recording_callback();

    // Arrive without continuation: the loop stays parked.
    engine
        .move_actor_to(actor, GridPos::new(6, 5), false, callback)
        .unwrap();
    let mut ticks = 0;
    while flag.load(Ordering::SeqCst) == 0 && ticks < 10_000 {
        engine.update(0.05);
        ticks += 1;
    }
    let arrival = engine.world.get::<&Position>(actor).unwrap().cell;

    for _ in 0..500 {
        engine.update(0.05);
    }
    assert_eq!(engine.world.get::<&Position>(actor).unwrap().cell, arrival);

    // Explicit resume brings the wandering back.
    engine.resume_autonomy(actor);
    let mut moved = false;
    for _ in 0..2_000 {
        engine.update(0.05);
        if engine.world.get::<&Position>(actor).unwrap().cell != arrival {
            moved = true;
            break;
        }
    }
    assert!(moved, "resume_autonomy did not restart the loop");
}
