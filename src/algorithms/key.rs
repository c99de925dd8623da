use std::cmp::Ordering;

use crate::cell::Cell;

/// Tolerance for cost comparisons and for the first key component.
pub const EPSILON: f64 = 1e-5;

/// Multiplier folding `k2` into a key's stamp.
const STAMP_FACTOR: f64 = 1193.0;

/// Returns true if `a` and `b` are within [`EPSILON`]; two equal infinities are close.
pub fn is_close(a: f64, b: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return a.signum() == b.signum();
    }
    (a - b).abs() < EPSILON
}

/// Admissible estimate of the cost between two cells.
///
/// Manhattan distance scaled by the unit cost. On an axis-only lattice this is
/// the exact obstacle-free distance, which is what lets untouched cells default
/// to it and still be consistent.
pub fn heuristic(a: Cell, b: Cell, unit_cost: f64) -> f64 {
    a.manhattan(b) as f64 * unit_cost
}

/// Priority of a frontier cell: `[min(g, rhs) + h(cell, start) + km; min(g, rhs)]`.
///
/// Compared lexicographically, with `k1` equal when within [`EPSILON`].
#[derive(Clone, Copy, Debug)]
pub struct Key {
    pub k1: f64,
    pub k2: f64,
}

impl Key {
    pub fn new(k1: f64, k2: f64) -> Self {
        Key { k1, k2 }
    }

    /// Scalar fingerprint used to tell a live frontier entry from a stale one.
    pub fn stamp(&self) -> f64 {
        self.k1 + STAMP_FACTOR * self.k2
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.k1 - EPSILON > other.k1 {
            Ordering::Greater
        } else if self.k1 + EPSILON < other.k1 {
            Ordering::Less
        } else {
            self.k2.total_cmp(&other.k2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        assert!(is_close(1.0, 1.0 + 1e-6));
        assert!(!is_close(1.0, 1.0 + 1e-4));
        assert!(is_close(f64::INFINITY, f64::INFINITY));
        assert!(!is_close(f64::INFINITY, 1e300));
        assert!(!is_close(f64::INFINITY, f64::NEG_INFINITY));
    }

    #[test]
    fn test_key_order_is_lexicographic() {
        assert!(Key::new(1.0, 5.0) < Key::new(2.0, 0.0));
        assert!(Key::new(2.0, 1.0) < Key::new(2.0, 3.0));
        // k1 within tolerance falls through to k2
        assert!(Key::new(2.0 + 1e-7, 1.0) < Key::new(2.0, 3.0));
        assert_eq!(Key::new(2.0, 3.0), Key::new(2.0 + 1e-7, 3.0));
        assert!(Key::new(10.0, 0.0) < Key::new(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_heuristic_is_scaled_manhattan() {
        let a = Cell::new(10, 7, 7);
        let b = Cell::new(1, 1, -1);
        assert_eq!(heuristic(a, b, 1.0), 23.0);
        assert_eq!(heuristic(a, b, 0.5), 11.5);
        assert_eq!(heuristic(a, a, 1.0), 0.0);
    }

    #[test]
    fn test_stamp_tracks_both_components() {
        let a = Key::new(4.0, 2.0);
        let b = Key::new(4.0, 3.0);
        assert_ne!(a.stamp(), b.stamp());
        assert_eq!(a.stamp(), Key::new(4.0, 2.0).stamp());
    }
}
