use crate::algorithms::d_star_lite::{DStarLite, PathStatus};
use crate::algorithms::key::is_close;
use crate::cell::Cell;

impl DStarLite {
    /// Walks from the start to the goal by greedy descent over the repaired
    /// `g` values, storing the walk in [`Self::path`].
    ///
    /// Each step takes the unblocked successor minimizing
    /// `move_cost + g(successor)`. Within tolerance, the successor with the
    /// smaller `dist(successor, goal) + dist(start, successor)` wins, which
    /// keeps the walk near the straight line; exact ties go to the first
    /// neighbour in lattice order.
    ///
    /// Assumes a successful [`Self::compute_shortest_path`].
    pub fn extract_path(&mut self) -> PathStatus {
        self.path.clear();
        if self.ledger.g(self.start) == f64::INFINITY {
            return PathStatus::Unreachable;
        }

        let mut current = self.start;
        while current != self.goal {
            self.path.push(current);
            if self.path.len() > self.config.max_path_len {
                return PathStatus::TooLong;
            }

            match self.best_successor(current) {
                Some(next) => current = next,
                None => return PathStatus::DeadEnd(current),
            }
        }

        self.path.push(self.goal);
        PathStatus::Found
    }

    fn best_successor(&self, current: Cell) -> Option<Cell> {
        let mut best: Option<(Cell, f64, f64)> = None;

        for s in self.successors(current) {
            if self.ledger.is_blocked(s) {
                continue;
            }

            let cost = self.ledger.move_cost(current, s) + self.ledger.g(s);
            if cost == f64::INFINITY {
                continue;
            }
            let spread = s.euclidean(self.goal) + self.start.euclidean(s);

            let better = match best {
                None => true,
                Some((_, best_cost, best_spread)) if is_close(cost, best_cost) => {
                    spread < best_spread
                }
                Some((_, best_cost, _)) => cost < best_cost,
            };
            if better {
                best = Some((s, cost, spread));
            }
        }

        best.map(|(cell, _, _)| cell)
    }
}
