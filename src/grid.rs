use rand::Rng;

use crate::algorithms::common::Occupancy;
use crate::algorithms::key::is_close;
use crate::algorithms::ledger::is_blocking;
use crate::cell::{Bounds, Cell};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tile {
    Empty,
    Wall,
    Obstacle,
    Rough,
}

/// Square planar world the demo agent moves through.
#[derive(Clone, Debug)]
pub struct Grid {
    pub size: usize,
    pub tiles: Vec<Vec<Tile>>,
    pub start: Cell,
    pub goal: Cell,
    pub rough_cost: f64,
    /// Cost of an empty tile; the planner's unit cost.
    pub unit_cost: f64,
}

impl Grid {
    /// Random start in the lower-left quadrant, goal in the upper-right,
    /// with walls and rough patches scattered around them.
    pub fn generate<R: Rng>(
        rng: &mut R,
        size: usize,
        num_walls: usize,
        num_rough: usize,
        rough_cost: f64,
        unit_cost: f64,
    ) -> Self {
        let size = size.max(2);
        let half = (size / 2) as i32;
        let start = Cell::planar(rng.gen_range(0..half), rng.gen_range(0..half));
        let goal = Cell::planar(
            rng.gen_range(half..size as i32),
            rng.gen_range(half..size as i32),
        );

        let mut grid = Grid {
            size,
            tiles: vec![vec![Tile::Empty; size]; size],
            start,
            goal,
            rough_cost,
            unit_cost,
        };

        // Place walls and rough terrain randomly, ensuring we don't cover start/goal
        for (tile, count) in [(Tile::Wall, num_walls), (Tile::Rough, num_rough)] {
            let mut placed = 0;
            let mut attempts = 0;
            while placed < count && attempts < count * 3 {
                let cell = grid.random_cell(rng);
                if cell != start && cell != goal && grid.tile(cell) == Some(Tile::Empty) {
                    grid.set_tile(cell, tile);
                    placed += 1;
                }
                attempts += 1;
            }
        }

        grid
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::planar(self.size as i32, self.size as i32)
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        Cell::planar(
            rng.gen_range(0..self.size as i32),
            rng.gen_range(0..self.size as i32),
        )
    }

    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if !self.bounds().contains(cell) {
            return None;
        }
        Some(self.tiles[cell.x as usize][cell.y as usize])
    }

    pub fn set_tile(&mut self, cell: Cell, tile: Tile) {
        if self.bounds().contains(cell) {
            self.tiles[cell.x as usize][cell.y as usize] = tile;
        }
    }

    /// Traversal cost of `cell`. Walls, obstacles and everything off the
    /// map are blocked.
    pub fn cost(&self, cell: Cell) -> f64 {
        match self.tile(cell) {
            Some(Tile::Empty) => self.unit_cost,
            Some(Tile::Rough) => self.rough_cost,
            Some(Tile::Wall) | Some(Tile::Obstacle) | None => -1.0,
        }
    }

    /// Every in-bounds cell whose cost is not the unit cost.
    pub fn costly_cells(&self) -> Vec<(Cell, f64)> {
        let mut cells = Vec::new();
        for x in 0..self.size as i32 {
            for y in 0..self.size as i32 {
                let cell = Cell::planar(x, y);
                let cost = self.cost(cell);
                if !is_close(cost, self.unit_cost) {
                    cells.push((cell, cost));
                }
            }
        }
        cells
    }

    /// Print a visual representation of the grid with the planned path
    pub fn print_grid(&self, agent: Option<Cell>, path: &[Cell]) {
        println!("Legend: S=Start, G=Goal, A=Agent, #=Wall, O=Obstacle, ~=Rough, *=Path, .=Empty");

        // Print column numbers header
        print!("   ");
        for x in 0..self.size {
            print!("{:2}", x % 10);
        }
        println!();

        for y in 0..self.size as i32 {
            print!("{:2} ", y);

            for x in 0..self.size as i32 {
                let cell = Cell::planar(x, y);
                let ch = if Some(cell) == agent {
                    'A'
                } else if cell == self.start {
                    'S'
                } else if cell == self.goal {
                    'G'
                } else if path.contains(&cell) {
                    '*'
                } else {
                    match self.tiles[x as usize][y as usize] {
                        Tile::Wall => '#',
                        Tile::Obstacle => 'O',
                        Tile::Rough => '~',
                        Tile::Empty => '.',
                    }
                };
                print!("{} ", ch);
            }
            println!();
        }
        println!();
    }
}

impl Occupancy for Grid {
    fn is_blocked(&self, cell: Cell) -> bool {
        is_blocking(self.cost(cell))
    }

    /// Paints an obstacle (negative cost) or clears it again. Walls are permanent.
    fn set_cost(&mut self, cell: Cell, cost: f64) -> Result<()> {
        if matches!(self.tile(cell), None | Some(Tile::Wall)) {
            return Ok(());
        }
        let painted = if is_blocking(cost) {
            Tile::Obstacle
        } else if is_close(cost, self.unit_cost) {
            Tile::Empty
        } else {
            Tile::Rough
        };
        self.set_tile(cell, painted);
        Ok(())
    }
}
