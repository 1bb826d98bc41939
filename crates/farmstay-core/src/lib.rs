//! Farmstay Core - Grid-Walker Simulation Engine
//!
//! An ECS-based simulation of a farm-and-inn village where autonomous
//! actors (farmers, porters, pets, shopkeepers) wander a tile grid, perform
//! archetype-specific tasks, and follow externally directed routes.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Actors on the grid
//! - **Components**: Pure data attached to entities (Position, Mobility, BehaviorTable, etc.)
//! - **Systems**: Logic that queries and updates components once per tick
//!
//! Terrain walkability, animation playback, and grid↔world mapping are
//! injected collaborators, never globals — the whole engine runs headless.
//!
//! # Example
//!
//! ```rust,no_run
//! use farmstay_core::prelude::*;
//! use farmstay_core::generation::PopulateConfig;
//! use farmstay_core::terrain::TileTerrain;
//!
//! let terrain = TileTerrain::new(32, 32);
//! let mut engine = SimulationEngine::new(terrain, NullAnimations);
//!
//! // Spawn the starting cast
//! engine.populate(&PopulateConfig::default());
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod archetypes;
pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod systems;
pub mod terrain;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{AnimationHost, NullAnimations, SimulationEngine};
    pub use crate::systems::MoveError;
}
