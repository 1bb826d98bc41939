//! Farmstay Headless Simulation Harness
//!
//! Validates the grid-walking logic and the simulation engine end to end.
//! Runs entirely in-process — no rendering, no timers, no asset loading.
//!
//! Usage:
//!   cargo run -p farmstay-simtest
//!   cargo run -p farmstay-simtest -- --verbose

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use farmstay_core::archetypes::ArchetypeLibrary;
use farmstay_core::components::{
    Actor, Animating, Archetype, AutonomousState, BehaviorTable, LoopPhase, Mobility, Position,
};
use farmstay_core::engine::{NullAnimations, SimulationEngine};
use farmstay_core::generation::PopulateConfig;
use farmstay_core::terrain::TileTerrain;
use farmstay_logic::animation::FallbackChain;
use farmstay_logic::grid::{CellMetrics, GridPos, Walkability};
use farmstay_logic::pathfinding::find_path;
use farmstay_logic::queue::OpenQueue;

// ── Archetype manifest (same JSON a client would ship) ──────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/archetypes.json");

#[derive(Debug, serde::Deserialize)]
struct ArchetypeRow {
    name: String,
    states: Vec<(String, f32)>,
    #[serde(default)]
    special: Option<String>,
    #[serde(default)]
    fallbacks: Vec<(String, String)>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn result(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Farmstay Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Archetype manifest validation
    results.extend(validate_manifest(verbose));

    // 2. Open-queue ordering and relax semantics
    results.extend(validate_queue(verbose));

    // 3. Pathfinding on synthetic terrain
    results.extend(validate_pathfinding(verbose));

    // 4. Animation fallback resolution
    results.extend(validate_animation(verbose));

    // 5. Behavior table draws
    results.extend(validate_behavior_table(verbose));

    // 6. Engine scenarios
    results.extend(validate_engine(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Archetype Manifest ───────────────────────────────────────────────

fn validate_manifest(verbose: bool) -> Vec<TestResult> {
    println!("--- Archetype Manifest ---");
    let mut results = Vec::new();

    let rows: Vec<ArchetypeRow> = match serde_json::from_str(MANIFEST_JSON) {
        Ok(rows) => rows,
        Err(e) => {
            results.push(result(
                "manifest_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };

    results.push(result(
        "manifest_archetype_count",
        rows.len() == 4,
        format!("{} archetypes listed", rows.len()),
    ));

    // Every archetype carries usable weights.
    let bad_weights: Vec<&str> = rows
        .iter()
        .filter(|row| row.states.iter().map(|(_, w)| w.max(0.0)).sum::<f32>() <= 0.0)
        .map(|row| row.name.as_str())
        .collect();
    results.push(result(
        "manifest_positive_weights",
        bad_weights.is_empty(),
        if bad_weights.is_empty() {
            "every archetype has positive total weight".to_string()
        } else {
            format!("zero-weight archetypes: {}", bad_weights.join(", "))
        },
    ));

    // A declared special state must appear in the same weight table.
    let orphaned_special: Vec<&str> = rows
        .iter()
        .filter(|row| {
            row.special
                .as_ref()
                .map(|special| !row.states.iter().any(|(s, _)| s == special))
                .unwrap_or(false)
        })
        .map(|row| row.name.as_str())
        .collect();
    results.push(result(
        "manifest_special_state_listed",
        orphaned_special.is_empty(),
        "special states appear in their own weight tables",
    ));

    // Fallback links must not point at themselves.
    let self_links = rows
        .iter()
        .flat_map(|row| row.fallbacks.iter())
        .filter(|(from, to)| from == to)
        .count();
    results.push(result(
        "manifest_no_self_fallbacks",
        self_links == 0,
        format!("{} self-referencing fallback links", self_links),
    ));

    // The engine-side loader accepts the same file and attaches factories
    // for every custom state.
    match ArchetypeLibrary::from_manifest_json(MANIFEST_JSON) {
        Ok(library) => {
            let mut missing = Vec::new();
            let known = ["idle", "walk", "run", "jump"];
            for name in library.names() {
                if let Some(spec) = library.get(name) {
                    for (state, _) in &spec.table {
                        if !known.contains(&state.as_str()) && spec.custom.is_none() {
                            missing.push(format!("{}:{}", name, state));
                        }
                    }
                }
            }
            results.push(result(
                "manifest_custom_states_handled",
                missing.is_empty(),
                if missing.is_empty() {
                    "all custom states have factories".to_string()
                } else {
                    format!("unhandled: {}", missing.join(", "))
                },
            ));
        }
        Err(e) => {
            results.push(result(
                "manifest_library_load",
                false,
                format!("library load failed: {}", e),
            ));
        }
    }

    if verbose {
        for row in &rows {
            println!("  {}: {} states", row.name, row.states.len());
        }
    }

    results
}

// ── 2. Open Queue ───────────────────────────────────────────────────────

fn validate_queue(_verbose: bool) -> Vec<TestResult> {
    println!("--- Open Queue ---");
    let mut results = Vec::new();

    // Round trip: N distinct items come out in non-decreasing priority.
    let mut q: OpenQueue<u32> = OpenQueue::new();
    for i in 0..100u32 {
        q.push(i, ((i * 7919) % 100) as f32);
    }
    let mut order_ok = true;
    let mut last = f32::NEG_INFINITY;
    let mut popped = 0;
    while let Some((_, p)) = q.pop() {
        if p < last {
            order_ok = false;
        }
        last = p;
        popped += 1;
    }
    results.push(result(
        "queue_round_trip_ordered",
        order_ok && popped == 100,
        format!("{} items popped in non-decreasing priority", popped),
    ));

    // Relax lowers, never raises.
    let mut q: OpenQueue<char> = OpenQueue::new();
    q.push('a', 5.0);
    q.push('a', 9.0);
    q.push('a', 2.0);
    let relaxed = q.pop() == Some(('a', 2.0)) && q.is_empty();
    results.push(result(
        "queue_relax_only_lowers",
        relaxed,
        "re-enqueue kept the lowest priority and a single entry",
    ));

    // Empty pop is a clean None.
    let mut q: OpenQueue<u32> = OpenQueue::new();
    results.push(result(
        "queue_empty_pop_none",
        q.pop().is_none(),
        "pop on empty queue returns None",
    ));

    results
}

// ── 3. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    // Leap corridor: the blocked middle cell is jumped, not skirted.
    let mut terrain = TileTerrain::new(5, 5);
    terrain.set_walkable(GridPos::new(2, 2), false);
    let path = find_path(&terrain, GridPos::new(0, 2), GridPos::new(4, 2));
    let expected = vec![
        GridPos::new(0, 2),
        GridPos::new(1, 2),
        GridPos::new(3, 2),
        GridPos::new(4, 2),
    ];
    results.push(result(
        "path_leap_corridor",
        path.as_deref() == Some(expected.as_slice()),
        format!("{:?}", path),
    ));

    // Thick walls force a detour.
    let mut terrain = TileTerrain::new(10, 8);
    for y in 1..8 {
        terrain.set_walkable(GridPos::new(4, y), false);
        terrain.set_walkable(GridPos::new(5, y), false);
    }
    let path = find_path(&terrain, GridPos::new(2, 4), GridPos::new(7, 4));
    let detoured = path
        .as_ref()
        .map(|p| p.iter().any(|c| c.y == 0) && p.iter().all(|c| terrain.is_walkable(*c)))
        .unwrap_or(false);
    results.push(result(
        "path_detours_thick_wall",
        detoured,
        "2-thick wall cannot be leapt; route uses the gap",
    ));

    // Disconnected terrain has no path.
    let islands = |cell: GridPos| cell == GridPos::new(0, 0) || cell == GridPos::new(4, 4);
    results.push(result(
        "path_unreachable_none",
        find_path(&islands, GridPos::new(0, 0), GridPos::new(4, 4)).is_none(),
        "disconnected cells → None",
    ));

    // Long corridor sanity.
    let corridor = TileTerrain::new(500, 1);
    let path = find_path(&corridor, GridPos::new(0, 0), GridPos::new(499, 0));
    results.push(result(
        "path_long_corridor",
        path.as_ref().map(|p| p.len()) == Some(500),
        "500-cell corridor walked end to end",
    ));

    if verbose {
        println!("  leap corridor path: {:?}", expected);
    }

    results
}

// ── 4. Animation Resolution ─────────────────────────────────────────────

fn validate_animation(_verbose: bool) -> Vec<TestResult> {
    println!("--- Animation Resolution ---");
    let mut results = Vec::new();

    let chain = FallbackChain::from_pairs(&[("fly", "run"), ("run", "walk"), ("walk", "idle")]);

    let has = |name: &str| name == "walk" || name == "idle";
    results.push(result(
        "anim_chain_falls_back",
        chain.resolve("fly", has) == Some("walk".to_string()),
        "fly → run → walk (first present name wins)",
    ));

    results.push(result(
        "anim_present_resolves_self",
        chain.resolve("walk", has) == Some("walk".to_string()),
        "present name resolves to itself",
    ));

    let cyclic = FallbackChain::from_pairs(&[("a", "b"), ("b", "a")]);
    results.push(result(
        "anim_cycle_fails_cleanly",
        cyclic.resolve("a", |_| false).is_none(),
        "cyclic chain terminates as failure",
    ));

    results
}

// ── 5. Behavior Table ───────────────────────────────────────────────────

fn validate_behavior_table(verbose: bool) -> Vec<TestResult> {
    println!("--- Behavior Table ---");
    let mut results = Vec::new();

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Even split within tolerance over 10k seeded draws.
    let mut rng = StdRng::seed_from_u64(1234);
    let mut table = BehaviorTable::new(vec![("idle".into(), 1.0), ("walk".into(), 1.0)], None);
    let draws = 10_000;
    let idles = (0..draws).filter(|_| table.draw(&mut rng) == "idle").count();
    let ratio = idles as f32 / draws as f32;
    results.push(result(
        "table_even_split",
        (0.47..=0.53).contains(&ratio),
        format!("idle ratio {:.3} over {} draws", ratio, draws),
    ));

    // The special state never repeats back to back.
    let mut rng = StdRng::seed_from_u64(77);
    let mut table = BehaviorTable::new(
        vec![("idle".into(), 1.0), ("visit_lobby".into(), 20.0)],
        Some("visit_lobby".into()),
    );
    let mut previous = table.draw(&mut rng);
    let mut repeats = 0;
    for _ in 0..5_000 {
        let drawn = table.draw(&mut rng);
        if drawn == "visit_lobby" && previous == "visit_lobby" {
            repeats += 1;
        }
        previous = drawn;
    }
    results.push(result(
        "table_special_no_repeat",
        repeats == 0,
        format!("{} consecutive special draws in 5k", repeats),
    ));

    if verbose {
        println!("  idle ratio: {:.3}", ratio);
    }

    results
}

// ── 6. Engine Scenarios ─────────────────────────────────────────────────

fn recording_callback() -> (Arc<AtomicU8>, impl FnOnce(bool) + Send + Sync + 'static) {
    let flag = Arc::new(AtomicU8::new(0));
    let inner = flag.clone();
    (flag, move |success: bool| {
        inner.store(if success { 2 } else { 1 }, Ordering::SeqCst)
    })
}

fn validate_engine(verbose: bool) -> Vec<TestResult> {
    println!("--- Engine Scenarios ---");
    let mut results = Vec::new();

    // Populate the default cast and let it wander.
    let mut engine = SimulationEngine::with_seed(TileTerrain::new(24, 24), NullAnimations, 1);
    let spawned = engine.populate(&PopulateConfig::default());
    results.push(result(
        "engine_populate",
        spawned.len() == 9 && engine.actor_count() == 9,
        format!("{} actors spawned", spawned.len()),
    ));

    for _ in 0..1_200 {
        engine.update(0.05);
    }
    results.push(result(
        "engine_minute_of_wandering",
        engine.actor_count() == 9,
        format!("{:.0}s simulated without losses", engine.sim_time()),
    ));

    // Directed move across the map, with mutual exclusion held throughout.
    let metrics = CellMetrics::default();
    let actor = engine.world.spawn((
        Actor,
        Archetype("porter".into()),
        Position::at_cell(GridPos::new(0, 0), &metrics),
        Mobility::default(),
        BehaviorTable::new(vec![("walk".into(), 1.0)], None),
        AutonomousState::default(),
        Animating::default(),
    ));
    let (flag, callback) = recording_callback();
    let started = engine
        .move_actor_to(actor, GridPos::new(20, 20), false, callback)
        .is_ok();

    let mut exclusive = true;
    let mut ticks = 0;
    while flag.load(Ordering::SeqCst) == 0 && ticks < 100_000 {
        engine.update(0.05);
        ticks += 1;
        if flag.load(Ordering::SeqCst) == 0 {
            let parked = engine
                .world
                .get::<&AutonomousState>(actor)
                .map(|a| matches!(a.phase, LoopPhase::Suspended))
                .unwrap_or(false);
            if !parked {
                exclusive = false;
            }
        }
    }
    let arrived = engine
        .world
        .get::<&Position>(actor)
        .map(|p| p.cell == GridPos::new(20, 20))
        .unwrap_or(false);
    results.push(result(
        "engine_directed_move",
        started && flag.load(Ordering::SeqCst) == 2 && arrived,
        format!("arrival in {} ticks", ticks),
    ));
    results.push(result(
        "engine_mutual_exclusion",
        exclusive,
        "autonomous loop parked for the whole directed move",
    ));

    // Seeded engines replay identically.
    let run = |seed: u64| {
        let mut engine = SimulationEngine::with_seed(TileTerrain::new(16, 16), NullAnimations, seed);
        let spawned = engine.populate(&PopulateConfig::default());
        for _ in 0..400 {
            engine.update(0.05);
        }
        spawned
            .iter()
            .filter_map(|&e| engine.world.get::<&Position>(e).ok().map(|p| p.cell))
            .collect::<Vec<_>>()
    };
    results.push(result(
        "engine_seeded_determinism",
        run(42) == run(42),
        "identical seeds give identical cells after 400 ticks",
    ));

    // Save/load round trip.
    let mut engine = SimulationEngine::with_seed(TileTerrain::new(16, 16), NullAnimations, 7);
    engine.populate(&PopulateConfig::default());
    for _ in 0..200 {
        engine.update(0.05);
    }
    let mut buffer = Vec::new();
    let saved = engine.save(&mut buffer).is_ok();
    let mut restored = SimulationEngine::with_seed(TileTerrain::new(16, 16), NullAnimations, 7);
    let loaded = restored.load(buffer.as_slice()).is_ok();
    results.push(result(
        "engine_save_load",
        saved && loaded && restored.actor_count() == engine.actor_count(),
        format!("{} bytes round-tripped", buffer.len()),
    ));

    if verbose {
        println!("  directed-move ticks: {}", ticks);
    }

    results
}
