use rustc_hash::FxHashMap;
use std::f64::consts::SQRT_2;

use crate::algorithms::key::{heuristic, is_close};
use crate::cell::Cell;

/// A cost blocks its cell when it is negative or NaN.
pub fn is_blocking(cost: f64) -> bool {
    !(cost >= 0.0)
}

/// The D* Lite values kept for one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellInfo {
    /// Best known cost-to-goal.
    pub g: f64,
    /// One-step lookahead: min over successors of `g(s) + move_cost(cell, s)`.
    pub rhs: f64,
    /// Cost of leaving the cell. Negative (or NaN) means blocked.
    pub cost: f64,
}

impl CellInfo {
    pub fn is_blocked(&self) -> bool {
        is_blocking(self.cost)
    }

    pub fn is_consistent(&self) -> bool {
        is_close(self.g, self.rhs)
    }
}

/// Sparse per-cell store of `g`, `rhs` and traversal cost.
///
/// Absent cells are not missing data: they read as `g = rhs = h(cell, goal)`
/// with the unit cost. Reads never insert; writes materialize the entry first.
#[derive(Clone, Debug, PartialEq)]
pub struct Ledger {
    cells: FxHashMap<Cell, CellInfo>,
    goal: Cell,
    unit_cost: f64,
}

impl Ledger {
    /// An empty ledger relative to `goal`, with the goal entry pinned at zero.
    pub fn new(goal: Cell, unit_cost: f64) -> Self {
        let mut ledger = Ledger {
            cells: FxHashMap::default(),
            goal,
            unit_cost,
        };
        ledger.cells.insert(
            goal,
            CellInfo {
                g: 0.0,
                rhs: 0.0,
                cost: unit_cost,
            },
        );
        ledger
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    fn default_info(&self, cell: Cell) -> CellInfo {
        let to_goal = if cell == self.goal {
            0.0
        } else {
            heuristic(cell, self.goal, self.unit_cost)
        };
        CellInfo {
            g: to_goal,
            rhs: to_goal,
            cost: self.unit_cost,
        }
    }

    /// The entry for `cell`, synthesized from the heuristic when absent.
    pub fn info(&self, cell: Cell) -> CellInfo {
        let mut info = self
            .cells
            .get(&cell)
            .copied()
            .unwrap_or_else(|| self.default_info(cell));
        if cell == self.goal {
            info.rhs = 0.0;
        }
        info
    }

    pub fn g(&self, cell: Cell) -> f64 {
        self.info(cell).g
    }

    pub fn rhs(&self, cell: Cell) -> f64 {
        self.info(cell).rhs
    }

    pub fn cost(&self, cell: Cell) -> f64 {
        self.cells.get(&cell).map_or(self.unit_cost, |info| info.cost)
    }

    /// Absent cells are never blocked.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.cells.get(&cell).is_some_and(CellInfo::is_blocked)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    fn materialize(&mut self, cell: Cell) -> &mut CellInfo {
        let seed = self.default_info(cell);
        self.cells.entry(cell).or_insert(seed)
    }

    /// Makes sure `cell` has a stored entry, leaving existing values alone.
    pub fn seed(&mut self, cell: Cell) {
        self.materialize(cell);
    }

    pub fn set_g(&mut self, cell: Cell, g: f64) {
        self.materialize(cell).g = g;
    }

    /// The goal's rhs is pinned at zero; writes to it are ignored.
    pub fn set_rhs(&mut self, cell: Cell, rhs: f64) {
        if cell == self.goal {
            return;
        }
        self.materialize(cell).rhs = rhs;
    }

    pub fn set_cost(&mut self, cell: Cell, cost: f64) {
        self.materialize(cell).cost = cost;
    }

    /// Cost of moving from `a` to the adjacent `b`: the cost of leaving `a`,
    /// scaled by sqrt(2) when the move is not along a single axis.
    pub fn move_cost(&self, a: Cell, b: Cell) -> f64 {
        let scale = if a.manhattan(b) > 1 { SQRT_2 } else { 1.0 };
        scale * self.cost(a)
    }

    /// Cells whose cost differs from the unit cost, blocked ones included.
    pub fn costly_cells(&self) -> Vec<(Cell, f64)> {
        let mut costly: Vec<_> = self
            .cells
            .iter()
            .filter(|(_, info)| !is_close(info.cost, self.unit_cost))
            .map(|(&cell, info)| (cell, info.cost))
            .collect();
        costly.sort_by_key(|&(cell, _)| cell);
        costly
    }

    /// Number of materialized entries.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &CellInfo)> {
        self.cells.iter()
    }
}
