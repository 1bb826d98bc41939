//! Save/Load functionality for persisting simulation state
//!
//! Uses bincode for binary serialization. Only durable actor state is
//! saved — in-flight motion tasks and directed-move callbacks are transient
//! and cannot round-trip, so loaded actors re-enter the autonomous loop at
//! its choosing step.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use farmstay_logic::grid::CellMetrics;

use crate::components::{
    Actor, Animating, Archetype, AutonomousState, BehaviorTable, Facing, Mobility, Name, Position,
};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Seconds of simulated time
    pub sim_time: f64,
    /// Time scale
    pub time_scale: f32,
    /// Durable per-actor state
    pub actors: Vec<SavedActor>,
}

/// One actor's durable state
#[derive(Serialize, Deserialize)]
pub struct SavedActor {
    pub name: Name,
    pub archetype: String,
    pub position: Position,
    pub facing: Facing,
    pub table: BehaviorTable,
}

/// Result of loading a save
pub struct LoadedSimulation {
    pub world: World,
    pub sim_time: f64,
    pub time_scale: f32,
}

/// Save a simulation to a writer
pub fn save_simulation<W: Write>(
    writer: W,
    world: &World,
    sim_time: f64,
    time_scale: f32,
) -> Result<(), SaveError> {
    let mut actors = Vec::new();
    for (_, (name, archetype, position, mobility, table)) in world
        .query::<(&Name, &Archetype, &Position, &Mobility, &BehaviorTable)>()
        .iter()
    {
        actors.push(SavedActor {
            name: name.clone(),
            archetype: archetype.0.clone(),
            position: *position,
            facing: mobility.facing,
            table: table.clone(),
        });
    }

    let save_data = SaveData {
        version: SAVE_VERSION,
        sim_time,
        time_scale,
        actors,
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(
    reader: R,
    metrics: &CellMetrics,
) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    for saved in save_data.actors {
        // Re-anchor the world position in case cell metrics changed.
        let position = Position::at_cell(saved.position.cell, metrics);
        world.spawn((
            Actor,
            saved.name,
            Archetype(saved.archetype),
            position,
            Mobility {
                facing: saved.facing,
                overridden: false,
            },
            saved.table,
            AutonomousState::default(),
            Animating::default(),
        ));
    }

    Ok(LoadedSimulation {
        world,
        sim_time: save_data.sim_time,
        time_scale: save_data.time_scale,
    })
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}
