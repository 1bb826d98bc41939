//! Bounded tile terrain — a walkable bitmap behind the [`Walkability`]
//! trait.
//!
//! The engine itself only ever sees the trait; this concrete grid backs the
//! headless harness and the tests, and any host that has no terrain
//! subsystem of its own. Out-of-bounds cells are unwalkable.

use farmstay_logic::grid::{GridPos, Walkability};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileTerrain {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl TileTerrain {
    /// Create a terrain with every in-bounds cell walkable.
    pub fn new(width: i32, height: i32) -> Self {
        let count = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width: width.max(0),
            height: height.max(0),
            cells: vec![true; count],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set_walkable(&mut self, cell: GridPos, walkable: bool) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = walkable;
        }
    }

    fn index(&self, cell: GridPos) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }
}

impl Walkability for TileTerrain {
    fn is_walkable(&self, cell: GridPos) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .copied()
            .unwrap_or(false)
    }
}
