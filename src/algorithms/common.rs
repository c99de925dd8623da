use crate::cell::Cell;
use crate::error::Result;

/// Anything that can say whether a cell is passable and accept new costs.
///
/// The planner implements it so map sources can feed it without knowing
/// about D* Lite; the demo grid implements it so obstacles can be painted.
pub trait Occupancy {
    /// Cells with a negative cost are impassable.
    fn is_blocked(&self, cell: Cell) -> bool;

    /// Records a new traversal cost for `cell`. Negative blocks it.
    /// Fails when the cost is one the implementor cannot plan with.
    fn set_cost(&mut self, cell: Cell, cost: f64) -> Result<()>;
}
