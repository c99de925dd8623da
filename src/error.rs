//! Error types for the planner and the demo driver.

use thiserror::Error;

use crate::cell::Cell;

/// Conditions under which the planner cannot vouch for its state.
///
/// An unreachable goal is not an error; see [`crate::PathStatus`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("no candidates in the frontier, cannot determine path")]
    NoCandidates,

    #[error("maximum number of repair iterations hit: {limit}")]
    Exhausted { limit: usize },

    #[error("cell {cell} is off the planning layer z = {layer}")]
    OffLayer { cell: Cell, layer: i32 },

    #[error("cell {cell} lies outside the planning bounds")]
    OutOfBounds { cell: Cell },

    #[error("cost {cost} for {cell} is below the unit cost {unit_cost}")]
    CostBelowUnit { cell: Cell, cost: f64, unit_cost: f64 },

    #[error("cost {cost} for {cell} is not a finite number")]
    NonFiniteCost { cell: Cell, cost: f64 },
}

/// Failures of the grid simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("planner error: {0}")]
    Plan(#[from] PlanError),

    #[error("no path exists from {start} to {goal} on the initial map")]
    NoInitialPath { start: Cell, goal: Cell },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
