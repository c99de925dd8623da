use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Statistics {
    pub total_moves: usize,
    pub travelled_cost: f64,
    /// Cost of the best route on the initial map, from the A* oracle.
    pub optimal_cost: f64,
    pub replans: usize,
    pub cells_reported: usize,
    pub num_walls: usize,
    pub num_obstacles: usize,
    pub route_efficiency: f64,
    pub reached_goal: bool,
}

impl Statistics {
    pub fn new(num_walls: usize, num_obstacles: usize, optimal_cost: f64) -> Self {
        Statistics {
            total_moves: 0,
            travelled_cost: 0.0,
            optimal_cost,
            replans: 0,
            cells_reported: 0,
            num_walls,
            num_obstacles,
            route_efficiency: 0.0,
            reached_goal: false,
        }
    }

    /// Travelled cost over the initial optimum; 1.0 means no detours.
    pub fn calculate_efficiency(&mut self) {
        if self.travelled_cost > 0.0 && self.optimal_cost > 0.0 {
            self.route_efficiency = self.travelled_cost / self.optimal_cost;
        } else {
            self.route_efficiency = 0.0;
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reached Goal: {}", self.reached_goal)?;
        writeln!(f, "Total Moves: {}", self.total_moves)?;
        writeln!(f, "Travelled Cost: {:.2}", self.travelled_cost)?;
        writeln!(f, "Optimal Cost (A*): {:.2}", self.optimal_cost)?;
        writeln!(f, "Replans: {}", self.replans)?;
        writeln!(f, "Cells Reported: {}", self.cells_reported)?;
        writeln!(f, "Number of Walls: {}", self.num_walls)?;
        writeln!(f, "Obstacles per Wave: {}", self.num_obstacles)?;
        writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;

        if self.route_efficiency > 1.0 {
            let extra = (self.route_efficiency - 1.0) * 100.0;
            writeln!(f, "Detour Overhead: {:.1}%", extra)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimingData {
    pub observe_times: Vec<Duration>,
    pub find_path_times: Vec<Duration>,
}

impl TimingData {
    pub fn new() -> Self {
        Self::default()
    }

    fn average(times: &[Duration]) -> Duration {
        if times.is_empty() {
            Duration::from_nanos(0)
        } else {
            let total: Duration = times.iter().sum();
            total / times.len() as u32
        }
    }

    pub fn average_observe_time(&self) -> Duration {
        Self::average(&self.observe_times)
    }

    pub fn average_find_path_time(&self) -> Duration {
        Self::average(&self.find_path_times)
    }

    pub fn total_find_path_time(&self) -> Duration {
        self.find_path_times.iter().sum()
    }

    pub fn total_calls(&self) -> usize {
        self.find_path_times.len()
    }
}
