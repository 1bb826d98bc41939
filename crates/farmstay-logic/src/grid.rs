//! Grid coordinates, walkability queries, and grid↔world mapping.
//!
//! Terrain stays behind the [`Walkability`] trait so the search and the
//! engine never reach for a global tile map — tests pass closures instead.

use serde::{Deserialize, Serialize};

/// Integer address of a tile cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbors, in +x, −x, +y, −y order.
    pub fn neighbors(self) -> [GridPos; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Boolean query over grid cells, owned by the terrain subsystem.
///
/// Answers must reflect current committed terrain state. Callers query fresh
/// on every expansion and every movement step — terrain can change between
/// calls, so results are never cached here.
pub trait Walkability {
    fn is_walkable(&self, cell: GridPos) -> bool;
}

impl<F: Fn(GridPos) -> bool> Walkability for F {
    fn is_walkable(&self, cell: GridPos) -> bool {
        self(cell)
    }
}

/// Grid↔world conversion parameters, supplied by the tile subsystem.
///
/// The engine works purely in grid coordinates; conversion happens only when
/// a renderable position has to be issued for a movement step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    pub cell_size: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl CellMetrics {
    /// World position of a cell's center.
    pub fn cell_center(&self, cell: GridPos) -> (f32, f32) {
        (
            self.origin_x + (cell.x as f32 + 0.5) * self.cell_size,
            self.origin_y + (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn world_to_cell(&self, x: f32, y: f32) -> GridPos {
        GridPos {
            x: ((x - self.origin_x) / self.cell_size).floor() as i32,
            y: ((y - self.origin_y) / self.cell_size).floor() as i32,
        }
    }
}
