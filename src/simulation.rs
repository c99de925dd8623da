use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::Agent;
use crate::algorithms::a_star::AStar;
use crate::algorithms::d_star_lite::{DStarLite, PathStatus};
use crate::cell::{Cell, Lattice};
use crate::config::Config;
use crate::error::SimulationError;
use crate::grid::{Grid, Tile};
use crate::statistics::{Statistics, TimingData};

const MAX_STUCK_ATTEMPTS: usize = 5;

/// Obstacles placed together, removed together.
#[derive(Debug, Clone)]
struct ObstacleWave {
    cells: Vec<Cell>,
    ticks_remaining: usize,
}

/// Robot on a grid with moving obstacles, replanning with D* Lite each tick.
///
/// Walls and rough terrain are known to the planner from the start and the
/// search is clipped to the map. Obstacle waves appear on a seeded timeline;
/// the agent only learns about them once they enter its field of view.
pub struct Simulation {
    grid: Grid,
    agent: Agent,
    planner: DStarLite,
    config: Config,
    optimal_cost: f64,
    timeline: Vec<Vec<Cell>>,
    active_waves: Vec<ObstacleWave>,
    ticks_since_last_wave: usize,
    next_wave: usize,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let grid = Grid::generate(
            &mut rng,
            config.grid_size,
            config.num_walls,
            config.num_rough,
            config.rough_cost,
            config.unit_cost,
        );
        let timeline = Self::generate_timeline(&config, &grid, &mut rng);
        Self::with_grid(config, grid, timeline)
    }

    /// Builds a simulation over a given map and obstacle timeline. The map's
    /// unit cost and bounds override the ones in `config`.
    pub fn with_grid(
        config: Config,
        grid: Grid,
        timeline: Vec<Vec<Cell>>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let optimal_cost = Self::optimal_cost(&grid).ok_or(SimulationError::NoInitialPath {
            start: grid.start,
            goal: grid.goal,
        })?;

        let planner_config = config
            .planner()
            .with_unit_cost(grid.unit_cost)
            .with_bounds(grid.bounds());
        let mut planner = DStarLite::with_config(grid.start, grid.goal, planner_config)?;
        let mut agent = Agent::new(grid.start, config.field_of_view, grid.unit_cost);

        for (cell, cost) in grid.costly_cells() {
            planner.set_cell_cost(cell, cost)?;
            agent.learn(cell, cost);
        }

        info!(
            "map {}x{}: start {}, goal {}, {} obstacle waves, optimal cost {:.2}",
            grid.size,
            grid.size,
            grid.start,
            grid.goal,
            timeline.len(),
            optimal_cost
        );

        Ok(Simulation {
            grid,
            agent,
            planner,
            config,
            optimal_cost,
            timeline,
            active_waves: Vec::new(),
            ticks_since_last_wave: 0,
            next_wave: 0,
        })
    }

    /// Pre-generates obstacle waves so a seed fixes the whole run.
    fn generate_timeline<R: Rng>(config: &Config, grid: &Grid, rng: &mut R) -> Vec<Vec<Cell>> {
        let interval = config.obstacle_interval.max(1);
        let waves = grid.size * grid.size / interval;
        let max_attempts = config.num_obstacles * 10;

        (0..waves)
            .map(|_| {
                let mut wave = Vec::new();
                let mut attempts = 0;
                while wave.len() < config.num_obstacles && attempts < max_attempts {
                    let cell = grid.random_cell(rng);
                    if cell != grid.start
                        && cell != grid.goal
                        && grid.tile(cell) == Some(Tile::Empty)
                        && !wave.contains(&cell)
                    {
                        wave.push(cell);
                    }
                    attempts += 1;
                }
                wave
            })
            .collect()
    }

    /// Cheapest route on the current map, ignoring what the agent knows.
    fn optimal_cost(grid: &Grid) -> Option<f64> {
        AStar::new(Lattice::Planar, grid.bounds())
            .with_unit_cost(grid.unit_cost)
            .find_path(grid.start, grid.goal, |c| grid.cost(c))
            .map(|(_, cost)| cost)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn planner(&self) -> &DStarLite {
        &self.planner
    }

    pub fn agent_position(&self) -> Cell {
        self.agent.position
    }

    pub fn run(&mut self) -> Result<(Statistics, TimingData), SimulationError> {
        let mut stats = Statistics::new(
            self.config.num_walls,
            self.config.num_obstacles,
            self.optimal_cost,
        );
        let mut timing = TimingData::new();
        let mut stuck_attempts = 0;
        let mut tick = 0;
        let max_ticks = self.grid.size * self.grid.size * 4;

        self.show(tick, &stats, None);

        while self.agent.position != self.grid.goal && tick < max_ticks {
            tick += 1;
            self.advance_obstacles();

            let observe_start = Instant::now();
            let reported = self.agent.observe(&self.grid, &mut self.planner)?;
            timing.observe_times.push(observe_start.elapsed());
            stats.cells_reported += reported;

            let find_path_start = Instant::now();
            let status = self.planner.find_path()?;
            timing.find_path_times.push(find_path_start.elapsed());
            stats.replans += 1;

            match status {
                PathStatus::Found if self.planner.path().len() > 1 => {
                    stuck_attempts = 0;
                    let here = self.agent.position;
                    let next = self.planner.path()[1];
                    stats.travelled_cost += self.planner.ledger().move_cost(here, next);
                    stats.total_moves += 1;
                    self.agent.move_to(next);
                    self.planner.relocate_start(next)?;
                    debug!("tick {}: {} -> {}, {} cells reported", tick, here, next, reported);
                }
                PathStatus::Found => break,
                other => {
                    stuck_attempts += 1;
                    warn!(
                        "tick {}: no path from {} ({:?}), waiting ({}/{})",
                        tick, self.agent.position, other, stuck_attempts, MAX_STUCK_ATTEMPTS
                    );
                    if stuck_attempts > MAX_STUCK_ATTEMPTS {
                        warn!("agent permanently stuck at {}", self.agent.position);
                        break;
                    }
                }
            }

            self.show(tick, &stats, Some(status));
        }

        if tick >= max_ticks && self.agent.position != self.grid.goal {
            warn!("gave up after {} ticks", max_ticks);
        }

        stats.reached_goal = self.agent.position == self.grid.goal;
        stats.calculate_efficiency();
        self.clear_all_obstacles();
        info!(
            "finished at {} after {} moves, travelled cost {:.2}",
            self.agent.position, stats.total_moves, stats.travelled_cost
        );

        Ok((stats, timing))
    }

    /// Expires old waves, then spawns the next one when its interval is up.
    fn advance_obstacles(&mut self) {
        self.ticks_since_last_wave += 1;

        for wave in &mut self.active_waves {
            wave.ticks_remaining = wave.ticks_remaining.saturating_sub(1);
            if wave.ticks_remaining == 0 {
                for &cell in &wave.cells {
                    self.grid.set_tile(cell, Tile::Empty);
                }
            }
        }
        self.active_waves.retain(|wave| wave.ticks_remaining > 0);

        if self.ticks_since_last_wave >= self.config.obstacle_interval.max(1) {
            if self.next_wave < self.timeline.len() {
                self.spawn_wave(self.next_wave);
                self.next_wave += 1;
            }
            self.ticks_since_last_wave = 0;
        }
    }

    fn spawn_wave(&mut self, index: usize) {
        let agent = self.agent.position;
        let cells: Vec<Cell> = self.timeline[index]
            .iter()
            .copied()
            .filter(|&c| c != agent && self.grid.tile(c) == Some(Tile::Empty))
            .collect();

        for &cell in &cells {
            self.grid.set_tile(cell, Tile::Obstacle);
        }
        if !cells.is_empty() {
            debug!("wave {} placed {} obstacles", index, cells.len());
            self.active_waves.push(ObstacleWave {
                cells,
                ticks_remaining: self.config.obstacle_lifetime.max(1),
            });
        }
    }

    fn clear_all_obstacles(&mut self) {
        for wave in self.active_waves.drain(..) {
            for cell in wave.cells {
                self.grid.set_tile(cell, Tile::Empty);
            }
        }
    }

    fn show(&self, tick: usize, stats: &Statistics, status: Option<PathStatus>) {
        if self.config.no_visualization {
            return;
        }
        // Clear the terminal
        print!("\x1B[2J\x1B[1;1H");
        println!("=== D* LITE SIMULATION ===");
        println!(
            "Tick: {} | Moves: {} | Replans: {} | Active obstacle waves: {}",
            tick,
            stats.total_moves,
            stats.replans,
            self.active_waves.len()
        );
        println!(
            "Agent: {} | Goal: {} | Optimal cost (A*): {:.2}",
            self.agent.position, self.grid.goal, self.optimal_cost
        );
        if let Some(status) = status {
            println!("Last plan: {:?}, km = {:.1}", status, self.planner.k_m());
        }
        self.grid
            .print_grid(Some(self.agent.position), self.planner.path());
        thread::sleep(Duration::from_millis(self.config.delay_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use approx::assert_relative_eq;
    use clap::Parser;

    fn quiet_config(args: &[&str]) -> Config {
        let mut argv = vec!["dstar_lattice", "--no-visualization"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    fn open_grid(size: usize, start: Cell, goal: Cell) -> Grid {
        Grid {
            size,
            tiles: vec![vec![Tile::Empty; size]; size],
            start,
            goal,
            rough_cost: 3.0,
            unit_cost: 1.0,
        }
    }

    #[test]
    fn test_static_map_is_travelled_optimally() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = quiet_config(&[
            "--grid-size", "10", "--num-walls", "15", "--num-rough", "10",
            "--num-obstacles", "0", "--seed", "11",
        ]);
        let Ok(mut sim) = Simulation::new(config) else {
            // The seed walled the goal off; nothing to compare.
            return;
        };
        let (stats, timing) = sim.run().unwrap();
        assert!(stats.reached_goal);
        assert_eq!(sim.agent_position(), sim.grid().goal);
        assert_relative_eq!(stats.travelled_cost, stats.optimal_cost, epsilon = 1e-6);
        assert_eq!(timing.total_calls(), stats.replans);
    }

    #[test]
    fn test_detours_around_a_surprise_obstacle() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = quiet_config(&[
            "--field-of-view", "1", "--obstacle-interval", "1", "--obstacle-lifetime", "100",
        ]);
        let grid = open_grid(5, Cell::planar(0, 2), Cell::planar(4, 2));
        let timeline = vec![vec![Cell::planar(2, 2)]];

        let mut sim = Simulation::with_grid(config, grid, timeline).unwrap();
        let (stats, _) = sim.run().unwrap();
        assert!(stats.reached_goal);
        assert_relative_eq!(stats.optimal_cost, 4.0);
        assert_relative_eq!(stats.travelled_cost, 6.0);
        assert_eq!(stats.total_moves, 6);
        assert!(stats.cells_reported >= 1);
        assert!(stats.route_efficiency > 1.0);
    }

    #[test]
    fn test_sealed_goal_is_rejected() {
        let config = quiet_config(&[]);
        let mut grid = open_grid(4, Cell::planar(0, 0), Cell::planar(3, 3));
        for y in 0..4 {
            grid.set_tile(Cell::planar(2, y), Tile::Wall);
        }
        assert!(matches!(
            Simulation::with_grid(config, grid, Vec::new()),
            Err(SimulationError::NoInitialPath { .. })
        ));
    }

    #[test]
    fn test_cheap_rough_terrain_is_rejected() {
        let config = quiet_config(&["--rough-cost", "0.5"]);
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));

        let mut grid = open_grid(5, Cell::planar(0, 2), Cell::planar(4, 2));
        grid.rough_cost = 0.5;
        grid.set_tile(Cell::planar(2, 2), Tile::Rough);
        assert!(matches!(
            Simulation::with_grid(quiet_config(&[]), grid, Vec::new()),
            Err(SimulationError::Plan(PlanError::CostBelowUnit { .. }))
        ));
    }

    #[test]
    fn test_unit_cost_reaches_planner_and_agent() {
        let config = quiet_config(&["--field-of-view", "1"]);
        let mut grid = open_grid(5, Cell::planar(0, 2), Cell::planar(4, 2));
        grid.unit_cost = 2.0;
        grid.rough_cost = 5.0;
        grid.set_tile(Cell::planar(2, 2), Tile::Rough);

        let mut sim = Simulation::with_grid(config, grid, Vec::new()).unwrap();
        assert_eq!(sim.planner().config().unit_cost, 2.0);
        let (stats, _) = sim.run().unwrap();
        assert!(stats.reached_goal);
        // Straight through the rough cell: 2 + 2 + 5 + 2.
        assert_relative_eq!(stats.optimal_cost, 11.0);
        assert_relative_eq!(stats.travelled_cost, 11.0);
        assert_eq!(stats.cells_reported, 0);
    }

    #[test]
    fn test_timeline_is_seeded() {
        let config = quiet_config(&["--grid-size", "8", "--num-obstacles", "4"]);
        let grid = open_grid(8, Cell::planar(0, 0), Cell::planar(7, 7));
        let a = Simulation::generate_timeline(&config, &grid, &mut StdRng::seed_from_u64(9));
        let b = Simulation::generate_timeline(&config, &grid, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64 / 5);
        assert!(a
            .iter()
            .flatten()
            .all(|&c| c != grid.start && c != grid.goal));
    }
}
