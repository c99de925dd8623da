use rustc_hash::FxHashMap;

use crate::algorithms::common::Occupancy;
use crate::algorithms::key::is_close;
use crate::cell::Cell;
use crate::error::Result;
use crate::grid::Grid;

/// The moving robot. It only learns about the map inside its field of view
/// and forwards what changed to the planner.
pub struct Agent {
    pub position: Cell,
    pub field_of_view: usize,
    /// Cost the agent assumes for any cell it has not been told about.
    pub unit_cost: f64,
    /// Costs the agent believes in, for cells that differ from the unit cost.
    known: FxHashMap<Cell, f64>,
}

impl Agent {
    pub fn new(start: Cell, field_of_view: usize, unit_cost: f64) -> Self {
        Agent {
            position: start,
            field_of_view,
            unit_cost,
            known: FxHashMap::default(),
        }
    }

    /// Records a cost the agent was told about up front.
    pub fn learn(&mut self, cell: Cell, cost: f64) {
        if is_close(cost, self.unit_cost) {
            self.known.remove(&cell);
        } else {
            self.known.insert(cell, cost);
        }
    }

    pub fn believed_cost(&self, cell: Cell) -> f64 {
        self.known.get(&cell).copied().unwrap_or(self.unit_cost)
    }

    /// Looks around and reports every visible cell whose cost differs from
    /// what the agent believed. Returns how many cells were reported.
    pub fn observe(&mut self, grid: &Grid, sink: &mut impl Occupancy) -> Result<usize> {
        let reach = self.field_of_view as i32;
        let bounds = grid.bounds();
        let mut reported = 0;

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let cell = self.position.offset(dx, dy, 0);
                if !bounds.contains(cell) {
                    continue;
                }
                let cost = grid.cost(cell);
                if !is_close(cost, self.believed_cost(cell)) {
                    sink.set_cost(cell, cost)?;
                    self.learn(cell, cost);
                    reported += 1;
                }
            }
        }
        Ok(reported)
    }

    pub fn move_to(&mut self, cell: Cell) {
        self.position = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use crate::{DStarLite, PlanError, PlannerConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Recorder(Vec<(Cell, f64)>);

    impl Occupancy for Recorder {
        fn is_blocked(&self, cell: Cell) -> bool {
            self.0.iter().any(|&(c, cost)| c == cell && cost < 0.0)
        }

        fn set_cost(&mut self, cell: Cell, cost: f64) -> Result<()> {
            self.0.push((cell, cost));
            Ok(())
        }
    }

    fn open_grid() -> Grid {
        Grid::generate(&mut StdRng::seed_from_u64(5), 8, 0, 0, 3.0, 1.0)
    }

    #[test]
    fn test_reports_only_changes_in_view() {
        let mut grid = open_grid();
        let near = Cell::planar(3, 4);
        let far = Cell::planar(7, 7);
        grid.set_tile(near, Tile::Obstacle);
        grid.set_tile(far, Tile::Obstacle);

        let mut agent = Agent::new(Cell::planar(2, 2), 2, 1.0);
        let mut sink = Recorder::default();
        assert_eq!(agent.observe(&grid, &mut sink).unwrap(), 1);
        assert_eq!(sink.0, vec![(near, -1.0)]);
        assert!(sink.is_blocked(near));

        // Nothing new the second time round.
        assert_eq!(agent.observe(&grid, &mut sink).unwrap(), 0);

        grid.set_tile(near, Tile::Empty);
        assert_eq!(agent.observe(&grid, &mut sink).unwrap(), 1);
        assert_eq!(sink.0.last(), Some(&(near, 1.0)));
        assert_eq!(agent.believed_cost(near), 1.0);
    }

    #[test]
    fn test_known_costs_are_not_reported() {
        let mut grid = open_grid();
        let rough = Cell::planar(1, 1);
        grid.set_tile(rough, Tile::Rough);

        let mut agent = Agent::new(Cell::planar(0, 0), 3, 1.0);
        agent.learn(rough, 3.0);
        let mut sink = Recorder::default();
        assert_eq!(agent.observe(&grid, &mut sink).unwrap(), 0);

        agent.move_to(Cell::planar(5, 5));
        assert_eq!(agent.position, Cell::planar(5, 5));
    }

    #[test]
    fn test_beliefs_follow_the_unit_cost() {
        let mut grid = Grid::generate(&mut StdRng::seed_from_u64(5), 8, 0, 0, 6.0, 2.0);
        let rough = Cell::planar(2, 3);
        grid.set_tile(rough, Tile::Rough);

        let mut agent = Agent::new(Cell::planar(2, 2), 2, 2.0);
        assert_eq!(agent.believed_cost(Cell::planar(0, 0)), 2.0);
        let mut sink = Recorder::default();
        assert_eq!(agent.observe(&grid, &mut sink).unwrap(), 1);
        assert_eq!(sink.0, vec![(rough, 6.0)]);

        agent.learn(rough, 2.0);
        assert_eq!(agent.believed_cost(rough), 2.0);
    }

    #[test]
    fn test_rejected_report_is_an_error() {
        let mut grid = open_grid();
        grid.rough_cost = 0.5;
        grid.set_tile(Cell::planar(1, 0), Tile::Rough);

        let mut planner = DStarLite::with_config(
            Cell::planar(0, 0),
            Cell::planar(7, 7),
            PlannerConfig::planar(),
        )
        .unwrap();
        let mut agent = Agent::new(Cell::planar(0, 0), 1, 1.0);
        assert!(matches!(
            agent.observe(&grid, &mut planner),
            Err(PlanError::CostBelowUnit { .. })
        ));
    }
}
