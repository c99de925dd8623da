use pathfinding::prelude::astar;

use crate::algorithms::key::heuristic;
use crate::algorithms::ledger::is_blocking;
use crate::cell::{Bounds, Cell, Lattice};

/// Fixed-point scale, since `astar` needs totally ordered costs.
const SCALE: f64 = 1000.0;

fn to_fixed(cost: f64) -> u64 {
    (cost * SCALE).round() as u64
}

/// From-scratch A* over a bounded box, using the `pathfinding` crate.
///
/// Shares the planner's cost model (a move costs what the cell being left
/// costs) so its answer is the reference the incremental planner must match.
/// The heuristic is Manhattan distance times `unit_cost`, which must not
/// exceed the cheapest passable cost the cost function returns.
#[derive(Debug, Clone, Copy)]
pub struct AStar {
    pub lattice: Lattice,
    pub bounds: Bounds,
    pub unit_cost: f64,
}

impl AStar {
    pub fn new(lattice: Lattice, bounds: Bounds) -> Self {
        AStar {
            lattice,
            bounds,
            unit_cost: 1.0,
        }
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    /// Finds a cheapest path from `start` to `goal`.
    ///
    /// `cost` gives the traversal cost of a cell; negative or NaN means blocked.
    /// Returns the path (both endpoints included) and its cost, or `None` if
    /// the goal cannot be reached inside the bounds.
    pub fn find_path<F>(&self, start: Cell, goal: Cell, cost: F) -> Option<(Vec<Cell>, f64)>
    where
        F: Fn(Cell) -> f64,
    {
        if !self.bounds.contains(start) || !self.bounds.contains(goal) {
            return None;
        }

        let result = astar(
            &start,
            |&p| {
                let leave = cost(p);
                // A blocked cell has no way out.
                let moves: Vec<(Cell, u64)> = if is_blocking(leave) {
                    Vec::new()
                } else {
                    self.lattice
                        .neighbors(p)
                        .filter(|&n| self.bounds.contains(n) && !is_blocking(cost(n)))
                        .map(|n| (n, to_fixed(leave)))
                        .collect()
                };
                moves
            },
            |&p| to_fixed(heuristic(p, goal, self.unit_cost)),
            |&p| p == goal,
        );

        result.map(|(path, total)| (path, total as f64 / SCALE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_box() {
        let oracle = AStar::new(Lattice::Planar, Bounds::planar(5, 5));
        let (path, cost) = oracle
            .find_path(Cell::planar(0, 0), Cell::planar(4, 4), |_| 1.0)
            .unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(cost, 8.0);
    }

    #[test]
    fn test_walls_and_rough_terrain() {
        let oracle = AStar::new(Lattice::Planar, Bounds::planar(5, 3));
        let wall = Cell::planar(2, 0);
        let rough = Cell::planar(2, 1);
        let (path, cost) = oracle
            .find_path(Cell::planar(0, 0), Cell::planar(4, 0), |c| {
                if c == wall {
                    -1.0
                } else if c == rough {
                    4.0
                } else {
                    1.0
                }
            })
            .unwrap();
        assert!(!path.contains(&wall));
        assert!(!path.contains(&rough));
        assert_eq!(cost, 8.0);
    }

    #[test]
    fn test_cheap_cells_need_a_matching_unit_cost() {
        // Row y = 1 costs 0.1 per move; the straight line along y = 0 costs 1.0.
        let oracle = AStar::new(Lattice::Planar, Bounds::planar(6, 3)).with_unit_cost(0.1);
        let (path, cost) = oracle
            .find_path(Cell::planar(0, 0), Cell::planar(4, 0), |c| {
                if c.y == 1 {
                    0.1
                } else {
                    1.0
                }
            })
            .unwrap();
        assert_eq!(cost, 1.5);
        assert_eq!(path.len(), 7);
        assert_eq!(path[1], Cell::planar(0, 1));
    }

    #[test]
    fn test_nan_cost_is_a_wall() {
        let oracle = AStar::new(Lattice::Planar, Bounds::planar(3, 1));
        let result = oracle.find_path(Cell::planar(0, 0), Cell::planar(2, 0), |c| {
            if c == Cell::planar(1, 0) {
                f64::NAN
            } else {
                1.0
            }
        });
        assert!(result.is_none());
    }

    #[test]
    fn test_sealed_goal() {
        let oracle = AStar::new(Lattice::Planar, Bounds::planar(3, 1));
        let result = oracle.find_path(Cell::planar(0, 0), Cell::planar(2, 0), |c| {
            if c == Cell::planar(1, 0) {
                -1.0
            } else {
                1.0
            }
        });
        assert!(result.is_none());
        assert!(oracle
            .find_path(Cell::planar(0, 0), Cell::planar(7, 0), |_| 1.0)
            .is_none());
    }
}
