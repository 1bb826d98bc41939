//! A* search over the walkable grid, with leap edges.
//!
//! Neighbors are generated on demand against the live walkability oracle —
//! terrain can change between calls, so no edge set is ever cached. A leap
//! edge jumps two cells in one orthogonal direction and is legal only when
//! the cell in between is blocked and the landing cell is open: characters
//! hop over a single obstacle instead of walking around it.

use std::collections::{HashMap, HashSet};

use crate::grid::{GridPos, Walkability};
use crate::queue::OpenQueue;

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Manhattan distance to the goal, scaled by 1.1 when the distance is even.
///
/// The even-distance scale is kept exactly as tuned: with leap edges also
/// costing 1 it is not an admissible bound, and changing it reshuffles which
/// of two equal-cost routes wins.
fn heuristic(from: GridPos, goal: GridPos) -> f32 {
    let d = from.manhattan_distance(goal);
    if d % 2 == 0 {
        d as f32 * 1.1
    } else {
        d as f32
    }
}

/// Find a cell path from `start` to `goal`.
///
/// Returns the full cell sequence including both endpoints; consecutive
/// cells are either orthogonal unit steps or leaps over a blocked cell, all
/// verified walkable at search time. Staleness after the call is the
/// caller's problem. Returns `None` when the open set empties without
/// reaching the goal.
pub fn find_path(
    oracle: &(impl Walkability + ?Sized),
    start: GridPos,
    goal: GridPos,
) -> Option<Vec<GridPos>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut open: OpenQueue<GridPos> = OpenQueue::new();
    let mut closed: HashSet<GridPos> = HashSet::new();
    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
    let mut g_score: HashMap<GridPos, f32> = HashMap::new();

    g_score.insert(start, 0.0);
    open.push(start, heuristic(start, goal));

    while let Some((current, _)) = open.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        if !closed.insert(current) {
            continue;
        }
        let current_g = g_score.get(&current).copied().unwrap_or(f32::INFINITY);

        for (dx, dy) in ORTHOGONAL {
            let step = current.offset(dx, dy);
            let next = if oracle.is_walkable(step) {
                step
            } else {
                let landing = current.offset(dx * 2, dy * 2);
                if oracle.is_walkable(landing) {
                    landing
                } else {
                    continue;
                }
            };
            if closed.contains(&next) {
                continue;
            }

            let tentative = current_g + 1.0;
            if tentative < g_score.get(&next).copied().unwrap_or(f32::INFINITY) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                open.push(next, tentative + heuristic(next, goal));
            }
        }
    }

    None
}

fn reconstruct(
    came_from: &HashMap<GridPos, GridPos>,
    start: GridPos,
    goal: GridPos,
) -> Vec<GridPos> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match came_from.get(&cursor) {
            Some(&prev) => {
                path.push(prev);
                cursor = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bounded all-walkable grid with a blocked-cell list.
    fn grid_oracle(width: i32, height: i32, blocked: Vec<GridPos>) -> impl Walkability {
        move |cell: GridPos| {
            cell.x >= 0
                && cell.y >= 0
                && cell.x < width
                && cell.y < height
                && !blocked.contains(&cell)
        }
    }

    fn assert_valid_steps(oracle: &impl Walkability, path: &[GridPos]) {
        for pair in path.windows(2) {
            let d = pair[0].manhattan_distance(pair[1]);
            assert!(
                d == 1 || d == 2,
                "step {:?} → {:?} is neither a walk nor a leap",
                pair[0],
                pair[1]
            );
            assert!(oracle.is_walkable(pair[1]));
            if d == 2 {
                // Leap steps are straight and only legal over a blocked cell.
                let mid = GridPos::new(
                    (pair[0].x + pair[1].x) / 2,
                    (pair[0].y + pair[1].y) / 2,
                );
                assert!(pair[0].x == pair[1].x || pair[0].y == pair[1].y);
                assert!(!oracle.is_walkable(mid));
            }
        }
    }

    #[test]
    fn test_straight_line() {
        let oracle = grid_oracle(10, 10, vec![]);
        let path = find_path(&oracle, GridPos::new(0, 0), GridPos::new(4, 0)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], GridPos::new(0, 0));
        assert_eq!(path[4], GridPos::new(4, 0));
        assert_valid_steps(&oracle, &path);
    }

    #[test]
    fn test_start_equals_goal() {
        let oracle = grid_oracle(5, 5, vec![]);
        let path = find_path(&oracle, GridPos::new(2, 2), GridPos::new(2, 2)).unwrap();
        assert_eq!(path, vec![GridPos::new(2, 2)]);
    }

    #[test]
    fn test_leaps_single_obstacle() {
        // 5×5, all walkable except (2,2). The leap over it beats any detour.
        let oracle = grid_oracle(5, 5, vec![GridPos::new(2, 2)]);
        let path = find_path(&oracle, GridPos::new(0, 2), GridPos::new(4, 2)).unwrap();
        assert_eq!(
            path,
            vec![
                GridPos::new(0, 2),
                GridPos::new(1, 2),
                GridPos::new(3, 2),
                GridPos::new(4, 2),
            ]
        );
        assert_valid_steps(&oracle, &path);
    }

    #[test]
    fn test_detours_around_thick_wall() {
        // A 2-thick wall across x=4..6 with a gap at y=0 cannot be leapt.
        let mut blocked = Vec::new();
        for y in 1..8 {
            blocked.push(GridPos::new(4, y));
            blocked.push(GridPos::new(5, y));
        }
        let oracle = grid_oracle(10, 8, blocked);
        let path = find_path(&oracle, GridPos::new(2, 4), GridPos::new(7, 4)).unwrap();
        assert_eq!(path[0], GridPos::new(2, 4));
        assert_eq!(*path.last().unwrap(), GridPos::new(7, 4));
        assert_valid_steps(&oracle, &path);
        // The route has to pass through the gap row.
        assert!(path.iter().any(|c| c.y == 0));
    }

    #[test]
    fn test_no_path_between_islands() {
        let open_cells = [GridPos::new(0, 0), GridPos::new(5, 5)];
        let oracle = move |cell: GridPos| open_cells.contains(&cell);
        assert_eq!(
            find_path(&oracle, GridPos::new(0, 0), GridPos::new(5, 5)),
            None
        );
    }

    #[test]
    fn test_unwalkable_goal_yields_none() {
        let oracle = grid_oracle(5, 5, vec![GridPos::new(3, 3)]);
        assert_eq!(
            find_path(&oracle, GridPos::new(0, 0), GridPos::new(3, 3)),
            None
        );
    }

    #[test]
    fn test_deterministic_on_symmetric_map() {
        let oracle = grid_oracle(7, 7, vec![GridPos::new(3, 3)]);
        let first = find_path(&oracle, GridPos::new(0, 3), GridPos::new(6, 3));
        let second = find_path(&oracle, GridPos::new(0, 3), GridPos::new(6, 3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_leap_requires_open_landing() {
        // Two blocked cells in a row: no leap, must go around.
        let oracle = grid_oracle(7, 3, vec![GridPos::new(3, 1), GridPos::new(4, 1)]);
        let path = find_path(&oracle, GridPos::new(0, 1), GridPos::new(6, 1)).unwrap();
        assert_valid_steps(&oracle, &path);
        assert!(path.iter().all(|c| *c != GridPos::new(3, 1) && *c != GridPos::new(4, 1)));
    }

    #[test]
    fn test_long_corridor() {
        let oracle = grid_oracle(200, 1, vec![]);
        let path = find_path(&oracle, GridPos::new(0, 0), GridPos::new(199, 0)).unwrap();
        assert_eq!(path.len(), 200);
    }
}
