use clap::Parser;

use crate::cell::{Bounds, Lattice};
use crate::error::SimulationError;

/// Tunables of a [`crate::DStarLite`] session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Traversal cost of a cell nobody has touched. Scales the heuristic, so
    /// writing a cheaper cost is rejected.
    pub unit_cost: f64,
    /// Repair iterations allowed per `compute_shortest_path` call.
    pub max_steps: usize,
    /// Longest path the extractor will walk before giving up.
    pub max_path_len: usize,
    pub lattice: Lattice,
    /// Optional box the search is clipped to. Cells outside it are neither
    /// visited nor offered as moves, which lets an enclosed goal be proven
    /// unreachable in finite work.
    pub bounds: Option<Bounds>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            unit_cost: 1.0,
            max_steps: 80_000,
            max_path_len: 80_000,
            lattice: Lattice::Volumetric,
            bounds: None,
        }
    }
}

impl PlannerConfig {
    pub fn planar() -> Self {
        PlannerConfig {
            lattice: Lattice::Planar,
            ..Default::default()
        }
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    pub fn with_lattice(mut self, lattice: Lattice) -> Self {
        self.lattice = lattice;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "D* Lite replanning on a grid with moving obstacles", long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub grid_size: usize,

    #[arg(long, default_value_t = 50)]
    pub num_walls: usize,

    /// Patches of rough terrain, known up front like walls
    #[arg(long, default_value_t = 20)]
    pub num_rough: usize,

    /// Cost of crossing a rough cell; at least the unit cost
    #[arg(long, default_value_t = 3.0)]
    pub rough_cost: f64,

    /// Cost of crossing an empty cell
    #[arg(long, default_value_t = 1.0)]
    pub unit_cost: f64,

    /// Dynamic obstacles spawned per wave
    #[arg(long, default_value_t = 10)]
    pub num_obstacles: usize,

    /// Ticks between obstacle waves
    #[arg(long, default_value_t = 5)]
    pub obstacle_interval: usize,

    /// Ticks an obstacle wave stays on the map
    #[arg(long, default_value_t = 5)]
    pub obstacle_lifetime: usize,

    #[arg(long, default_value_t = 3)]
    pub field_of_view: usize,

    #[arg(long, default_value_t = 80_000)]
    pub max_steps: usize,

    /// Seed for map and obstacle generation; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    /// Planner settings for the demo's planar grid.
    pub fn planner(&self) -> PlannerConfig {
        let area = self.grid_size * self.grid_size;
        let side = self.grid_size as i32;
        PlannerConfig::planar()
            .with_unit_cost(self.unit_cost)
            .with_max_steps(self.max_steps)
            .with_max_path_len(area.max(1) * 4)
            .with_bounds(Bounds::planar(side, side))
    }

    /// Rejects costs the planner cannot work with.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.unit_cost.is_finite() && self.unit_cost > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "--unit-cost must be a positive number, got {}",
                self.unit_cost
            )));
        }
        if !(self.rough_cost.is_finite() && self.rough_cost >= self.unit_cost) {
            return Err(SimulationError::InvalidConfig(format!(
                "--rough-cost must be at least the unit cost {}, got {}",
                self.unit_cost, self.rough_cost
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.unit_cost, 1.0);
        assert_eq!(config.max_steps, 80_000);
        assert_eq!(config.lattice, Lattice::Volumetric);
        assert_eq!(config.bounds, None);
        assert_eq!(PlannerConfig::planar().lattice, Lattice::Planar);
    }

    #[test]
    fn test_cli_maps_to_planner() {
        let config = Config::parse_from(["dstar_lattice", "--grid-size", "10", "--max-steps", "500"]);
        let planner = config.planner();
        assert_eq!(planner.lattice, Lattice::Planar);
        assert_eq!(planner.max_steps, 500);
        assert_eq!(planner.max_path_len, 400);
        assert_eq!(planner.bounds, Some(Bounds::planar(10, 10)));
        assert_eq!(config.seed, None);
        assert_eq!(planner.unit_cost, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rough_cost_below_unit_is_rejected() {
        let config = Config::parse_from(["dstar_lattice", "--rough-cost", "0.5"]);
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));

        let config = Config::parse_from(["dstar_lattice", "--unit-cost", "2", "--rough-cost", "1.5"]);
        assert!(config.validate().is_err());

        let config = Config::parse_from(["dstar_lattice", "--unit-cost", "2", "--rough-cost", "2"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.planner().unit_cost, 2.0);

        let config = Config::parse_from(["dstar_lattice", "--unit-cost", "0"]);
        assert!(config.validate().is_err());
    }
}
