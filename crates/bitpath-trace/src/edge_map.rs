//! Boundary-edge map: which unit edges of the corner lattice separate a
//! filled pixel from an empty one, and in which direction they run.
//!
//! Every boundary edge is directed so that the filled pixel lies on its
//! right-hand side (with y growing downward). A corner therefore always
//! has as many edges arriving as leaving, which is what lets the walker
//! close every ring it starts.
//!
//! The map is a single bitset keyed by `(corner, direction)`: one 4-bit
//! mask per corner. Walking consumes edges with [`EdgeMap::take`], so an
//! edge is visited at most once.

use crate::bitmap::BitSource;
use crate::types::Vertex;

/// Heading of a boundary edge leaving a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward `y - 1`.
    Up = 0,
    /// Toward `x + 1`.
    Right = 1,
    /// Toward `y + 1`.
    Down = 2,
    /// Toward `x - 1`.
    Left = 3,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Directions to try when arriving at a corner with this heading.
    ///
    /// Turns come first and going straight comes last, so a straight run
    /// of edges never produces an intermediate vertex. The reverse heading
    /// is never a candidate: it would be the edge just walked.
    #[must_use]
    pub const fn priority(self) -> [Self; 3] {
        match self {
            Self::Up => [Self::Left, Self::Right, Self::Up],
            Self::Right => [Self::Up, Self::Down, Self::Right],
            Self::Down => [Self::Right, Self::Left, Self::Down],
            Self::Left => [Self::Down, Self::Up, Self::Left],
        }
    }

    /// The neighbouring corner one step in this direction, or `None` if
    /// that would leave the non-negative quadrant.
    #[must_use]
    pub const fn step(self, from: Vertex) -> Option<Vertex> {
        match self {
            Self::Up => match from.y.checked_sub(1) {
                Some(y) => Some(Vertex::new(from.x, y)),
                None => None,
            },
            Self::Right => Some(Vertex::new(from.x + 1, from.y)),
            Self::Down => Some(Vertex::new(from.x, from.y + 1)),
            Self::Left => match from.x.checked_sub(1) {
                Some(x) => Some(Vertex::new(x, from.y)),
                None => None,
            },
        }
    }
}

/// Unconsumed boundary edges of a `width × height` bitmap, stored per
/// corner of the `(width + 1) × (height + 1)` lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    columns: usize,
    rows: usize,
    cells: Vec<u8>,
    remaining: usize,
    edge_count: usize,
}

impl EdgeMap {
    /// Build the edge map of `bits` laid out as rows of `width` pixels.
    ///
    /// `bits.bit_len()` must equal `width * height`; the caller validates
    /// this. Pixels outside the grid count as empty.
    #[must_use]
    pub fn build<B: BitSource + ?Sized>(bits: &B, width: usize, height: usize) -> Self {
        let mut map = Self {
            columns: width + 1,
            rows: height + 1,
            cells: vec![0; (width + 1) * (height + 1)],
            remaining: 0,
            edge_count: 0,
        };
        let filled = |x: usize, y: usize| bits.bit(width * y + x);

        // Horizontal edges: compare the pixel above each edge with the one below.
        for y in 0..=height {
            for x in 0..width {
                let above = y > 0 && filled(x, y - 1);
                let below = y < height && filled(x, y);
                match (above, below) {
                    (false, true) => map.insert(Vertex::new(x, y), Direction::Right),
                    (true, false) => map.insert(Vertex::new(x + 1, y), Direction::Left),
                    _ => {}
                }
            }
        }

        // Vertical edges: compare the pixel left of each edge with the one right.
        for x in 0..=width {
            for y in 0..height {
                let left = x > 0 && filled(x - 1, y);
                let right = x < width && filled(x, y);
                match (left, right) {
                    (false, true) => map.insert(Vertex::new(x, y + 1), Direction::Up),
                    (true, false) => map.insert(Vertex::new(x, y), Direction::Down),
                    _ => {}
                }
            }
        }

        map.edge_count = map.remaining;
        map
    }

    fn index(&self, at: Vertex) -> Option<usize> {
        (at.x < self.columns && at.y < self.rows).then(|| at.y * self.columns + at.x)
    }

    fn insert(&mut self, at: Vertex, dir: Direction) {
        let Some(i) = self.index(at) else {
            return;
        };
        if self.cells[i] & dir.bit() == 0 {
            self.cells[i] |= dir.bit();
            self.remaining += 1;
        }
    }

    /// Whether an unconsumed edge leaves `at` heading `dir`.
    #[must_use]
    pub fn has(&self, at: Vertex, dir: Direction) -> bool {
        self.index(at)
            .is_some_and(|i| self.cells[i] & dir.bit() != 0)
    }

    /// Consume the edge leaving `at` heading `dir`.
    ///
    /// Returns `true` if the edge was present (and is now cleared),
    /// `false` if there was no such edge or it was already consumed.
    pub fn take(&mut self, at: Vertex, dir: Direction) -> bool {
        let Some(i) = self.index(at) else {
            return false;
        };
        if self.cells[i] & dir.bit() == 0 {
            return false;
        }
        self.cells[i] &= !dir.bit();
        self.remaining -= 1;
        true
    }

    /// Consume the first rightward edge in row-major corner order, starting
    /// the search at `*cursor`, and return the corner it leaves from.
    ///
    /// Edges are only ever cleared, so no rightward edge exists before the
    /// previous result; the cursor lets repeated calls skip that prefix.
    pub(crate) fn take_next_start(&mut self, cursor: &mut usize) -> Option<Vertex> {
        while *cursor < self.cells.len() {
            let i = *cursor;
            if self.cells[i] & Direction::Right.bit() != 0 {
                self.cells[i] &= !Direction::Right.bit();
                self.remaining -= 1;
                return Some(Vertex::new(i % self.columns, i / self.columns));
            }
            *cursor += 1;
        }
        None
    }

    /// Number of edges not yet consumed.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Number of boundary edges found when the map was built.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of corners in the lattice.
    #[must_use]
    pub const fn corner_count(&self) -> usize {
        self.columns * self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;

    fn map_of(rows: &str, width: usize) -> EdgeMap {
        let bits: Bitmap = rows.parse().unwrap_or_default();
        EdgeMap::build(&bits, width, bits.len() / width)
    }

    #[test]
    fn single_pixel_has_four_edges() {
        let map = map_of("1", 1);
        assert_eq!(map.edge_count(), 4);
        assert_eq!(map.corner_count(), 4);
        assert!(map.has(Vertex::new(0, 0), Direction::Right));
        assert!(map.has(Vertex::new(1, 0), Direction::Down));
        assert!(map.has(Vertex::new(1, 1), Direction::Left));
        assert!(map.has(Vertex::new(0, 1), Direction::Up));
    }

    #[test]
    fn empty_bitmap_has_no_edges() {
        let map = map_of("000/000", 3);
        assert_eq!(map.edge_count(), 0);
        assert_eq!(map.remaining(), 0);
    }

    #[test]
    fn interior_edges_cancel() {
        // Two filled pixels side by side share no boundary edge.
        let map = map_of("11", 2);
        assert_eq!(map.edge_count(), 6);
        assert!(!map.has(Vertex::new(1, 0), Direction::Down));
        assert!(!map.has(Vertex::new(1, 1), Direction::Up));
    }

    #[test]
    fn every_corner_is_balanced() {
        let map = map_of("1011/0110/1101", 4);
        for y in 0..=3 {
            for x in 0..=4 {
                let here = Vertex::new(x, y);
                let out = Direction::ALL.iter().filter(|&&d| map.has(here, d)).count();
                let arriving = Direction::ALL
                    .iter()
                    .filter(|&&d| {
                        // An edge arrives at `here` heading `d` if it leaves
                        // the neighbour behind `here` heading `d`.
                        let back = match d {
                            Direction::Up => Direction::Down,
                            Direction::Right => Direction::Left,
                            Direction::Down => Direction::Up,
                            Direction::Left => Direction::Right,
                        };
                        back.step(here).is_some_and(|from| map.has(from, d))
                    })
                    .count();
                assert_eq!(out, arriving, "unbalanced corner {here}");
            }
        }
    }

    #[test]
    fn take_consumes_once() {
        let mut map = map_of("1", 1);
        assert!(map.take(Vertex::new(1, 0), Direction::Down));
        assert!(!map.take(Vertex::new(1, 0), Direction::Down));
        assert_eq!(map.remaining(), 3);
        assert_eq!(map.edge_count(), 4);
    }

    #[test]
    fn take_outside_lattice_is_false() {
        let mut map = map_of("1", 1);
        assert!(!map.take(Vertex::new(5, 5), Direction::Up));
    }

    #[test]
    fn next_start_is_row_major() {
        let mut map = map_of("01/10", 2);
        let mut cursor = 0;
        assert_eq!(map.take_next_start(&mut cursor), Some(Vertex::new(1, 0)));
        assert_eq!(map.take_next_start(&mut cursor), Some(Vertex::new(0, 1)));
        assert_eq!(map.take_next_start(&mut cursor), None);
    }

    #[test]
    fn priority_turns_before_straight() {
        for dir in Direction::ALL {
            let order = dir.priority();
            assert_eq!(order[2], dir);
            assert!(!order.contains(&Direction::ALL[(dir as usize + 2) % 4]));
        }
    }

    #[test]
    fn step_stays_in_quadrant() {
        assert_eq!(Direction::Up.step(Vertex::ORIGIN), None);
        assert_eq!(Direction::Left.step(Vertex::ORIGIN), None);
        assert_eq!(
            Direction::Down.step(Vertex::new(2, 3)),
            Some(Vertex::new(2, 4))
        );
    }
}
