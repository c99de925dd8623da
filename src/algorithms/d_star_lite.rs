use log::{debug, trace};

use crate::algorithms::common::Occupancy;
use crate::algorithms::frontier::Frontier;
use crate::algorithms::key::{heuristic, is_close, Key};
use crate::algorithms::ledger::Ledger;
use crate::cell::Cell;
use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};

/// Outcome of [`DStarLite::find_path`]. Only `Found` leaves a complete path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathStatus {
    Found,
    /// The repair finished without a finite cost for the start.
    Unreachable,
    /// The walk reached a cell with no unblocked successor of finite cost.
    DeadEnd(Cell),
    /// The walk exceeded `max_path_len` without reaching the goal.
    TooLong,
}

impl PathStatus {
    pub fn is_found(&self) -> bool {
        matches!(self, PathStatus::Found)
    }
}

/// Incremental D* Lite planner over an integer lattice, after S. Koenig and
/// M. Likhachev (2002). The lattice is unbounded unless the config clips it.
///
/// The session owns the ledger, the frontier, the key modifier and the last
/// extracted path. Search runs backwards from the goal, so the agent can move
/// the start and change cell costs between plans and only the affected part of
/// the search is repaired.
#[derive(Clone, Debug)]
pub struct DStarLite {
    pub(crate) config: PlannerConfig,
    pub(crate) ledger: Ledger,
    frontier: Frontier,
    k_m: f64,
    pub(crate) start: Cell,
    pub(crate) goal: Cell,
    pub(crate) path: Vec<Cell>,
}

impl DStarLite {
    /// Creates a planner with the default (volumetric) configuration.
    pub fn new(start: Cell, goal: Cell) -> Result<Self> {
        Self::with_config(start, goal, PlannerConfig::default())
    }

    pub fn with_config(start: Cell, goal: Cell, config: PlannerConfig) -> Result<Self> {
        let mut planner = DStarLite {
            config,
            ledger: Ledger::new(goal, config.unit_cost),
            frontier: Frontier::new(),
            k_m: 0.0,
            start,
            goal,
            path: Vec::new(),
        };
        planner.init(start, goal)?;
        Ok(planner)
    }

    /// Resets the session: empty ledger and frontier, `km = 0`, fresh
    /// start and goal entries. Previously set cell costs are dropped.
    ///
    /// Corresponds to `Initialize()` in the paper.
    pub fn init(&mut self, start: Cell, goal: Cell) -> Result<()> {
        self.check_placement(goal, goal)?;
        self.check_placement(start, goal)?;
        self.start = start;
        self.goal = goal;
        self.k_m = 0.0;
        self.path.clear();
        self.frontier.clear();
        self.ledger = Ledger::new(goal, self.config.unit_cost);
        self.ledger.seed(start);
        Ok(())
    }

    /// `cell` must share a layer with `anchor` and lie inside the bounds.
    fn check_placement(&self, cell: Cell, anchor: Cell) -> Result<()> {
        if !self.config.lattice.same_layer(cell, anchor) {
            return Err(PlanError::OffLayer {
                cell,
                layer: anchor.z,
            });
        }
        if !self.in_bounds(cell) {
            return Err(PlanError::OutOfBounds { cell });
        }
        Ok(())
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        self.config.bounds.map_or(true, |b| b.contains(cell))
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn k_m(&self) -> f64 {
        self.k_m
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// The most recently extracted path, start to goal inclusive.
    /// Partial or empty when the last `find_path` did not succeed.
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    /// Total move cost along [`Self::path`].
    pub fn path_cost(&self) -> f64 {
        self.path
            .windows(2)
            .map(|step| self.ledger.move_cost(step[0], step[1]))
            .sum()
    }

    fn heuristic(&self, a: Cell, b: Cell) -> f64 {
        heuristic(a, b, self.config.unit_cost)
    }

    /// Corresponds to `CalculateKey(s)` in the paper.
    pub fn calculate_key(&self, cell: Cell) -> Key {
        let info = self.ledger.info(cell);
        let cost = info.g.min(info.rhs);
        Key::new(cost + self.heuristic(cell, self.start) + self.k_m, cost)
    }

    fn insert(&mut self, cell: Cell) {
        let key = self.calculate_key(cell);
        self.frontier.push(cell, key);
    }

    fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.config
            .lattice
            .neighbors(cell)
            .filter(move |&n| self.in_bounds(n))
    }

    /// Every neighbour of `cell`, or none if `cell` is blocked.
    pub(crate) fn successors(&self, cell: Cell) -> Vec<Cell> {
        if self.ledger.is_blocked(cell) {
            return Vec::new();
        }
        self.neighbors(cell).collect()
    }

    /// Neighbours of `cell` that are not blocked.
    fn predecessors(&self, cell: Cell) -> Vec<Cell> {
        self.neighbors(cell)
            .filter(|&n| !self.ledger.is_blocked(n))
            .collect()
    }

    fn is_consistent(&self, cell: Cell) -> bool {
        self.ledger.info(cell).is_consistent()
    }

    /// Recomputes `rhs(cell)` and requeues the cell if it became inconsistent.
    ///
    /// Corresponds to `UpdateVertex(u)` in the paper.
    fn update_vertex(&mut self, cell: Cell) {
        if cell != self.goal {
            let rhs = self
                .successors(cell)
                .into_iter()
                .map(|s| self.ledger.g(s) + self.ledger.move_cost(cell, s))
                .fold(f64::INFINITY, f64::min);
            if !is_close(self.ledger.rhs(cell), rhs) {
                self.ledger.set_rhs(cell, rhs);
            }
        }

        if self.is_consistent(cell) {
            self.frontier.forget(cell);
        } else {
            self.insert(cell);
        }
    }

    /// True when no unblocked move leaves the start.
    fn start_is_isolated(&self) -> bool {
        self.successors(self.start)
            .into_iter()
            .all(|s| self.ledger.is_blocked(s))
    }

    /// Repairs the ledger until `g(start)` is correct for the current costs.
    ///
    /// Returns `Ok(true)` once the start is consistent and nothing queued
    /// sorts below it, `Ok(false)` when the start provably cannot be repaired
    /// (isolated, or the frontier ran dry first). Exceeding `max_steps` is an
    /// error: the ledger is then only partially repaired.
    ///
    /// Corresponds to `ComputeShortestPath()` in the paper, with two changes:
    /// work is capped, and stale queue entries are dropped lazily.
    pub fn compute_shortest_path(&mut self) -> Result<bool> {
        if self.frontier.is_empty() {
            if self.is_consistent(self.start) {
                return Ok(true);
            }
            return Err(PlanError::NoCandidates);
        }

        if self.start != self.goal && self.start_is_isolated() {
            debug!("start {} has no open neighbours", self.start);
            return Ok(false);
        }

        let mut steps = 0;
        loop {
            let Some(top) = self.frontier.top_key() else {
                break;
            };
            if top >= self.calculate_key(self.start) && self.is_consistent(self.start) {
                break;
            }

            steps += 1;
            if steps > self.config.max_steps {
                return Err(PlanError::Exhausted {
                    limit: self.config.max_steps,
                });
            }

            let Some((u, k_old)) = self.frontier.pop() else {
                break;
            };
            trace!("pop {} at ({:.3}, {:.3})", u, k_old.k1, k_old.k2);

            let k_new = self.calculate_key(u);
            let info = self.ledger.info(u);
            if k_old < k_new {
                // Queued before km grew; revisit later under its true key.
                self.frontier.push(u, k_new);
            } else if info.g > info.rhs {
                // Over-consistent: the cost to goal dropped, settle it.
                self.ledger.set_g(u, info.rhs);
                for p in self.predecessors(u) {
                    self.update_vertex(p);
                }
            } else {
                // Under-consistent: the old route through u is gone.
                self.ledger.set_g(u, f64::INFINITY);
                for p in self.predecessors(u) {
                    self.update_vertex(p);
                }
                self.update_vertex(u);
            }
        }

        let consistent = self.is_consistent(self.start);
        debug!(
            "repair finished after {} steps, g(start) = {}, {} queued",
            steps,
            self.ledger.g(self.start),
            self.frontier.len()
        );
        Ok(consistent)
    }

    /// Sets the traversal cost of `cell` (negative blocks it) and repairs the
    /// cell locally. Ignored for the start and goal, which are never blocked,
    /// and for cells outside the bounds.
    ///
    /// The heuristic assumes no cell is cheaper than the unit cost, so costs in
    /// `[0, unit_cost)` are rejected, as are NaN and +inf.
    ///
    /// Costs live on the cell being left, so a change here only alters the
    /// cell's own outgoing moves and `rhs(cell)` is the only value to redo.
    /// Neighbours are reached by the next repair pass once `g(cell)` moves.
    pub fn set_cell_cost(&mut self, cell: Cell, cost: f64) -> Result<()> {
        self.check_cost(cell, cost)?;
        self.apply_cost(cell, cost);
        Ok(())
    }

    fn check_cost(&self, cell: Cell, cost: f64) -> Result<()> {
        if cost.is_nan() || cost == f64::INFINITY {
            return Err(PlanError::NonFiniteCost { cell, cost });
        }
        let unit_cost = self.config.unit_cost;
        if (0.0..unit_cost).contains(&cost) {
            return Err(PlanError::CostBelowUnit {
                cell,
                cost,
                unit_cost,
            });
        }
        Ok(())
    }

    fn apply_cost(&mut self, cell: Cell, cost: f64) {
        if cell == self.start || cell == self.goal || !self.in_bounds(cell) {
            return;
        }
        self.ledger.set_cost(cell, cost);
        self.update_vertex(cell);
    }

    pub fn block_cell(&mut self, cell: Cell) {
        self.apply_cost(cell, -1.0);
    }

    /// Restores the unit cost of `cell`.
    pub fn unblock_cell(&mut self, cell: Cell) {
        self.apply_cost(cell, self.config.unit_cost);
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.ledger.is_blocked(cell)
    }

    /// Moves the agent. Bumps `km` so queued keys stay comparable; does not replan.
    ///
    /// The start is never blocked: a blocked cell taken as the new start gets
    /// the unit cost back.
    pub fn relocate_start(&mut self, cell: Cell) -> Result<()> {
        self.check_placement(cell, self.goal)?;
        self.k_m += self.heuristic(self.start, cell);
        self.start = cell;
        if self.ledger.is_blocked(cell) {
            debug!("new start {} was blocked, restoring unit cost", cell);
            self.ledger.set_cost(cell, self.config.unit_cost);
            self.update_vertex(cell);
        }
        debug!("start moved to {}, km = {}", cell, self.k_m);
        Ok(())
    }

    /// Moves the goal. Every `g` and `rhs` is goal-relative, so the ledger is
    /// rebuilt: costly cells are saved, everything is cleared, and the saved
    /// cells are replayed onto the fresh ledger.
    pub fn relocate_goal(&mut self, cell: Cell) -> Result<()> {
        self.check_placement(cell, self.start)?;
        let costly = self.ledger.costly_cells();
        self.init(self.start, cell)?;
        for &(c, cost) in &costly {
            self.apply_cost(c, cost);
        }
        debug!("goal moved to {}, replayed {} cells", cell, costly.len());
        Ok(())
    }

    /// Repairs the ledger and extracts a fresh path into [`Self::path`].
    pub fn find_path(&mut self) -> Result<PathStatus> {
        self.path.clear();

        if self.start != self.goal && self.start_is_isolated() {
            return Ok(PathStatus::DeadEnd(self.start));
        }
        if !self.compute_shortest_path()? {
            return Ok(PathStatus::Unreachable);
        }
        Ok(self.extract_path())
    }
}

impl Occupancy for DStarLite {
    fn is_blocked(&self, cell: Cell) -> bool {
        self.ledger.is_blocked(cell)
    }

    fn set_cost(&mut self, cell: Cell, cost: f64) -> Result<()> {
        self.set_cell_cost(cell, cost)
    }
}
