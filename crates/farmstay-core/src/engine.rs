//! Simulation engine - main entry point for running the simulation

use farmstay_logic::grid::{CellMetrics, GridPos, Walkability};
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::archetypes::ArchetypeLibrary;
use crate::components::{Actor, Archetype, Mobility, Position};
use crate::config::SimConfig;
use crate::generation::{populate, PopulateConfig};
use crate::persistence::{self, SaveError};
use crate::systems::{
    behavior_system, directed_system, start_directed_move, MoveError,
};
use crate::components::tasks::MoveCallback;

/// Animation playback, supplied by the rendering subsystem.
///
/// The engine resolves names through archetype fallback chains and only then
/// asks the host to play; it never owns playback itself.
pub trait AnimationHost {
    /// Whether this actor's animation set contains `name`.
    fn has_animation(&self, entity: Entity, name: &str) -> bool;
    /// Start playing `name` on the actor.
    fn play_animation(&mut self, entity: Entity, name: &str);
}

/// Accepts every name and discards playback. For headless runs and tests.
pub struct NullAnimations;

impl AnimationHost for NullAnimations {
    fn has_animation(&self, _entity: Entity, _name: &str) -> bool {
        true
    }

    fn play_animation(&mut self, _entity: Entity, _name: &str) {}
}

/// Main simulation engine
///
/// Owns the ECS world and drives one cooperative tick per [`update`](Self::update)
/// call. Terrain and animation playback are injected collaborators — the
/// engine holds no globals, so it runs headless in tests.
pub struct SimulationEngine {
    /// ECS world containing all actors
    pub world: World,
    sim_time: f64,
    time_scale: f32,
    rng: StdRng,
    archetypes: ArchetypeLibrary,
    terrain: Box<dyn Walkability>,
    animations: Box<dyn AnimationHost>,
    metrics: CellMetrics,
    config: SimConfig,
}

impl SimulationEngine {
    /// Create an engine around the given collaborators, seeded from entropy.
    pub fn new(
        terrain: impl Walkability + 'static,
        animations: impl AnimationHost + 'static,
    ) -> Self {
        Self::build(terrain, animations, StdRng::from_entropy())
    }

    /// Create a deterministic engine: identical seeds and identical tick
    /// sequences reproduce identical worlds.
    pub fn with_seed(
        terrain: impl Walkability + 'static,
        animations: impl AnimationHost + 'static,
        seed: u64,
    ) -> Self {
        Self::build(terrain, animations, StdRng::seed_from_u64(seed))
    }

    fn build(
        terrain: impl Walkability + 'static,
        animations: impl AnimationHost + 'static,
        rng: StdRng,
    ) -> Self {
        Self {
            world: World::new(),
            sim_time: 0.0,
            time_scale: 1.0,
            rng,
            archetypes: ArchetypeLibrary::builtin(),
            terrain: Box::new(terrain),
            animations: Box::new(animations),
            metrics: CellMetrics::default(),
            config: SimConfig::default(),
        }
    }

    /// Replace the archetype registry (e.g. one loaded from a manifest).
    pub fn set_archetypes(&mut self, archetypes: ArchetypeLibrary) {
        self.archetypes = archetypes;
    }

    pub fn set_metrics(&mut self, metrics: CellMetrics) {
        self.metrics = metrics;
    }

    pub fn set_config(&mut self, config: SimConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Spawn the configured starting cast on walkable cells.
    pub fn populate(&mut self, config: &PopulateConfig) -> Vec<Entity> {
        populate(
            &mut self.world,
            config,
            &self.archetypes,
            self.terrain.as_ref(),
            &self.metrics,
            &mut self.rng,
        )
    }

    /// Advance the simulation by `delta_seconds`.
    ///
    /// Single-threaded and cooperative: directed moves advance first, then
    /// the autonomous loops. Every task yields each tick.
    pub fn update(&mut self, delta_seconds: f32) {
        let dt = delta_seconds * self.time_scale;
        self.sim_time += dt as f64;

        directed_system(
            &mut self.world,
            dt,
            &self.archetypes,
            self.animations.as_mut(),
            &self.metrics,
            &self.config,
        );

        behavior_system(
            &mut self.world,
            dt,
            &mut self.rng,
            &self.archetypes,
            self.terrain.as_ref(),
            self.animations.as_mut(),
            &self.metrics,
            &self.config,
        );
    }

    /// Send an actor to `destination`.
    ///
    /// `on_complete` fires exactly once: immediately with `false` on an
    /// unwalkable or unreachable destination (no movement happens), with
    /// `true` once the path is walked. `continue_after` restarts the
    /// autonomous loop after a successful arrival.
    pub fn move_actor_to(
        &mut self,
        entity: Entity,
        destination: GridPos,
        continue_after: bool,
        on_complete: impl FnOnce(bool) + Send + Sync + 'static,
    ) -> Result<(), MoveError> {
        let callback: MoveCallback = Box::new(on_complete);
        start_directed_move(
            &mut self.world,
            self.terrain.as_ref(),
            entity,
            destination,
            continue_after,
            callback,
        )
    }

    /// Restart a parked autonomous loop. No-op while a directed move owns
    /// the actor.
    pub fn resume_autonomy(&mut self, entity: Entity) {
        use crate::components::{AutonomousState, LoopPhase};

        let overridden = self
            .world
            .get::<&Mobility>(entity)
            .map(|mobility| mobility.overridden)
            .unwrap_or(true);
        if overridden {
            return;
        }
        if let Ok(mut auto) = self.world.get::<&mut AutonomousState>(entity) {
            if matches!(auto.phase, LoopPhase::Suspended) {
                auto.phase = LoopPhase::Choosing;
            }
        }
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Seconds of simulated time since start
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Count all actors in the simulation
    pub fn actor_count(&self) -> usize {
        self.world.query::<&Actor>().iter().count()
    }

    /// Count actors of one archetype
    pub fn actors_of(&self, archetype: &str) -> usize {
        self.world
            .query::<(&Actor, &Archetype)>()
            .iter()
            .filter(|(_, (_, a))| a.0 == archetype)
            .count()
    }

    /// All actors currently standing on (or stepping toward) a cell
    pub fn actors_at(&self, cell: GridPos) -> Vec<Entity> {
        self.world
            .query::<(&Actor, &Position)>()
            .iter()
            .filter(|(_, (_, position))| position.cell == cell)
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Save simulation state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_simulation(writer, &self.world, self.sim_time, self.time_scale)
    }

    /// Load simulation state from a reader, replacing the current world
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = persistence::load_simulation(reader, &self.metrics)?;
        self.world = loaded.world;
        self.sim_time = loaded.sim_time;
        self.time_scale = loaded.time_scale;
        Ok(())
    }
}
