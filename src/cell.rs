use std::fmt;

/// A lattice coordinate. Identity is the coordinate triple and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Cell { x, y, z }
    }

    /// A cell on the z = 0 layer, for 2-D maps.
    pub const fn planar(x: i32, y: i32) -> Self {
        Cell { x, y, z: 0 }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Cell {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Sum of absolute axis differences.
    pub fn manhattan(self, other: Cell) -> i64 {
        (self.x as i64 - other.x as i64).abs()
            + (self.y as i64 - other.y as i64).abs()
            + (self.z as i64 - other.z as i64).abs()
    }

    /// Straight-line distance.
    pub fn euclidean(self, other: Cell) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        let dz = (self.z - other.z) as f64;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// Enumeration order matters: extraction resolves exact ties first-seen.
const VOLUMETRIC: [(i32, i32, i32); 6] = [
    (0, 0, -1),
    (0, 0, 1),
    (0, -1, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (1, 0, 0),
];

const PLANAR: [(i32, i32, i32); 4] = [(0, -1, 0), (-1, 0, 0), (0, 1, 0), (1, 0, 0)];

/// Shape of the neighbourhood a single move can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lattice {
    /// Four axis neighbours inside the cell's own z layer.
    Planar,
    /// Six axis neighbours, including one layer up and one down.
    #[default]
    Volumetric,
}

impl Lattice {
    fn offsets(self) -> &'static [(i32, i32, i32)] {
        match self {
            Lattice::Planar => &PLANAR,
            Lattice::Volumetric => &VOLUMETRIC,
        }
    }

    /// Cells reachable from `cell` in one move, in a fixed order.
    pub fn neighbors(self, cell: Cell) -> impl Iterator<Item = Cell> {
        self.offsets()
            .iter()
            .map(move |&(dx, dy, dz)| cell.offset(dx, dy, dz))
    }

    /// Whether `a` and `b` can share a connected component on this lattice.
    pub fn same_layer(self, a: Cell, b: Cell) -> bool {
        match self {
            Lattice::Planar => a.z == b.z,
            Lattice::Volumetric => true,
        }
    }
}

/// An inclusive axis-aligned box of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Cell,
    pub max: Cell,
}

impl Bounds {
    pub fn new(min: Cell, max: Cell) -> Self {
        Bounds { min, max }
    }

    /// The `width` x `height` rectangle on the z = 0 layer, anchored at the origin.
    pub fn planar(width: i32, height: i32) -> Self {
        Bounds {
            min: Cell::planar(0, 0),
            max: Cell::planar(width - 1, height - 1),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.min.x..=self.max.x).contains(&cell.x)
            && (self.min.y..=self.max.y).contains(&cell.y)
            && (self.min.z..=self.max.z).contains(&cell.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Cell::new(1, 1, 1);
        let b = Cell::new(3, 4, 5);
        assert_eq!(a.manhattan(b), 9);
        assert!((a.euclidean(b) - 5.385164807134504).abs() < 1e-12);
        assert_eq!(a.euclidean(Cell::new(1, 1, 2)), 1.0);
    }

    #[test]
    fn test_neighbor_order() {
        let c = Cell::planar(5, 5);
        let planar: Vec<_> = Lattice::Planar.neighbors(c).collect();
        assert_eq!(
            planar,
            vec![
                Cell::planar(5, 4),
                Cell::planar(4, 5),
                Cell::planar(5, 6),
                Cell::planar(6, 5)
            ]
        );

        let volumetric: Vec<_> = Lattice::Volumetric.neighbors(c).collect();
        assert_eq!(volumetric.len(), 6);
        assert_eq!(volumetric[0], Cell::new(5, 5, -1));
        assert_eq!(volumetric[1], Cell::new(5, 5, 1));
        assert!(volumetric.iter().all(|n| n.manhattan(c) == 1));
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::planar(4, 3);
        assert!(bounds.contains(Cell::planar(0, 0)));
        assert!(bounds.contains(Cell::planar(3, 2)));
        assert!(!bounds.contains(Cell::planar(4, 0)));
        assert!(!bounds.contains(Cell::planar(-1, 0)));
        assert!(!bounds.contains(Cell::new(0, 0, 1)));
    }
}
