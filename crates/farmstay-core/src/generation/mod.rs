//! World seeding — spawn a starting cast of actors on walkable cells.

pub mod names;

use farmstay_logic::grid::{CellMetrics, GridPos, Walkability};
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::archetypes::ArchetypeLibrary;
use crate::components::{Actor, Animating, Archetype, AutonomousState, Mobility, Position};
use self::names::{generate_name, generate_pet_name};

/// Attempts per actor to find a free walkable cell before giving up.
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// How many of each archetype to spawn, and where they may appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulateConfig {
    pub farmers: u32,
    pub porters: u32,
    pub pets: u32,
    pub shopkeepers: u32,
    /// Inclusive spawn rectangle.
    pub spawn_min: GridPos,
    pub spawn_max: GridPos,
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self {
            farmers: 4,
            porters: 2,
            pets: 2,
            shopkeepers: 1,
            spawn_min: GridPos::new(0, 0),
            spawn_max: GridPos::new(15, 15),
        }
    }
}

/// Spawn the configured cast. Every actor lands on a distinct walkable
/// cell; actors that can't be placed are skipped.
pub fn populate(
    world: &mut World,
    config: &PopulateConfig,
    archetypes: &ArchetypeLibrary,
    terrain: &dyn Walkability,
    metrics: &CellMetrics,
    rng: &mut StdRng,
) -> Vec<Entity> {
    let mut spawned = Vec::new();
    let mut occupied: HashSet<GridPos> = HashSet::new();

    let roster = [
        ("farmer", config.farmers),
        ("porter", config.porters),
        ("pet", config.pets),
        ("shopkeeper", config.shopkeepers),
    ];

    for (archetype_name, count) in roster {
        let Some(spec) = archetypes.get(archetype_name) else {
            log::warn!("archetype '{}' missing, skipping {} actors", archetype_name, count);
            continue;
        };
        for _ in 0..count {
            let Some(cell) = free_cell(config, terrain, &occupied, rng) else {
                log::debug!("no free cell for a '{}', skipping", archetype_name);
                continue;
            };
            occupied.insert(cell);

            let name = if archetype_name == "pet" {
                generate_pet_name(rng)
            } else {
                generate_name(rng)
            };

            let entity = world.spawn((
                Actor,
                name,
                Archetype(archetype_name.to_string()),
                Position::at_cell(cell, metrics),
                Mobility::default(),
                spec.behavior_table(),
                AutonomousState::default(),
                Animating::default(),
            ));
            spawned.push(entity);
        }
    }

    spawned
}

fn free_cell(
    config: &PopulateConfig,
    terrain: &dyn Walkability,
    occupied: &HashSet<GridPos>,
    rng: &mut StdRng,
) -> Option<GridPos> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let cell = GridPos::new(
            rng.gen_range(config.spawn_min.x..=config.spawn_max.x),
            rng.gen_range(config.spawn_min.y..=config.spawn_max.y),
        );
        if terrain.is_walkable(cell) && !occupied.contains(&cell) {
            return Some(cell);
        }
    }
    None
}
