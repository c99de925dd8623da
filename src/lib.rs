//! Incremental path planning with D* Lite on an integer lattice.
//!
//! The planner keeps per-cell `g` / `rhs` estimates and a lazily cleaned
//! priority frontier, so cost changes discovered while the agent moves are
//! repaired locally instead of searching again from scratch.
//!
//! ```no_run
//! use dstar_lattice::{Cell, DStarLite};
//!
//! let mut planner = DStarLite::new(Cell::new(10, 7, 7), Cell::new(1, 1, -1))?;
//! planner.block_cell(Cell::new(6, 6, 6));
//! if planner.find_path()?.is_found() {
//!     println!("{} cells", planner.path().len());
//! }
//! # Ok::<(), dstar_lattice::PlanError>(())
//! ```
//!
//! The grid simulation in [`simulation`] drives the planner the way a robot
//! with a limited field of view would.

pub mod agent;
pub mod algorithms;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod statistics;

pub use algorithms::a_star::AStar;
pub use algorithms::common::Occupancy;
pub use algorithms::d_star_lite::{DStarLite, PathStatus};
pub use algorithms::frontier::Frontier;
pub use algorithms::key::{Key, EPSILON};
pub use algorithms::ledger::{CellInfo, Ledger};
pub use cell::{Bounds, Cell, Lattice};
pub use config::PlannerConfig;
pub use error::{PlanError, Result, SimulationError};
