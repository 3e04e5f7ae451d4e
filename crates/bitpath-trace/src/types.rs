//! Shared types for the bitpath tracing pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bitmap::BitSource;

/// A corner of the pixel grid.
///
/// Corners live on the integer lattice `[0, width] × [0, height]`; pixel
/// `(x, y)` is the unit square whose top-left corner is `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vertex {
    /// Horizontal position (corners from the left edge).
    pub x: usize,
    /// Vertical position (corners from the top edge).
    pub y: usize,
}

impl Vertex {
    /// The top-left corner of the grid.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Create a new vertex.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another vertex.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> usize {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx * dx + dy * dy
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A closed outline: the cycle runs from the last vertex back to the first.
///
/// The closing vertex is not repeated. Consecutive vertices always differ
/// in exactly one coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ring(Vec<Vertex>);

impl Ring {
    /// Create a ring from its vertices in cycle order.
    #[must_use]
    pub const fn new(vertices: Vec<Vertex>) -> Self {
        Self(vertices)
    }

    /// Returns `true` if the ring has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of vertices in the ring.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// The ring's start vertex.
    #[must_use]
    pub fn first(&self) -> Option<Vertex> {
        self.0.first().copied()
    }

    /// All vertices in cycle order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }

    /// Consumes the ring and returns its vertices.
    #[must_use]
    pub fn into_vertices(self) -> Vec<Vertex> {
        self.0
    }

    /// Iterate over the ring's edges as `(from, to)` pairs, including the
    /// closing edge from the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.0
            .iter()
            .copied()
            .zip(self.0.iter().copied().cycle().skip(1))
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A traced bitmap: the source dimensions and its outlines in output order.
///
/// Built by [`trace`](crate::trace) and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    width: usize,
    height: usize,
    rings: Vec<Ring>,
}

impl Outline {
    /// Trace `bits` as a bitmap `width` pixels wide.
    ///
    /// Equivalent to [`trace`](crate::trace).
    ///
    /// # Errors
    ///
    /// See [`trace`](crate::trace).
    pub fn new<B: BitSource + ?Sized>(bits: &B, width: usize) -> Result<Self, TraceError> {
        crate::trace(bits, width)
    }

    pub(crate) const fn from_parts(width: usize, height: usize, rings: Vec<Ring>) -> Self {
        Self {
            width,
            height,
            rings,
        }
    }

    /// Width of the source bitmap in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height of the source bitmap in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// All rings in output order.
    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Number of rings.
    #[must_use]
    pub const fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// The ring at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RingIndexError`] if `index >= self.ring_count()`.
    pub fn ring(&self, index: usize) -> Result<&Ring, RingIndexError> {
        self.rings.get(index).ok_or(RingIndexError {
            index,
            count: self.rings.len(),
        })
    }

    /// Number of vertices in the ring at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RingIndexError`] if `index >= self.ring_count()`.
    pub fn ring_len(&self, index: usize) -> Result<usize, RingIndexError> {
        self.ring(index).map(Ring::len)
    }

    /// Total number of vertices across all rings.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }

    /// Consumes the outline and returns its rings.
    #[must_use]
    pub fn into_rings(self) -> Vec<Ring> {
        self.rings
    }
}

/// Errors reported before any tracing work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TraceError {
    /// The requested width is below one pixel.
    #[error("invalid width: {width} < 1")]
    InvalidWidth {
        /// The rejected width.
        width: usize,
    },

    /// The bit length cannot be laid out as rows of the requested width.
    #[error("invalid bitmap: {0}")]
    InvalidBitmap(#[from] BitmapShapeError),
}

/// Why a bit source does not form a `width`-wide bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum BitmapShapeError {
    /// Fewer bits than a single row.
    #[error("too short: len={len} < width={width}")]
    TooShort {
        /// Bit length of the source.
        len: usize,
        /// Requested width.
        width: usize,
    },

    /// The last row would be incomplete.
    #[error("len={len} is not a multiple of width={width}")]
    NotMultiple {
        /// Bit length of the source.
        len: usize,
        /// Requested width.
        width: usize,
    },
}

/// A ring index past the end of an [`Outline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("ring index {index} out of range for {count} rings")]
pub struct RingIndexError {
    /// The requested index.
    pub index: usize,
    /// Number of rings in the outline.
    pub count: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(x: usize, y: usize, size: usize) -> Ring {
        Ring::new(vec![
            Vertex::new(x, y),
            Vertex::new(x + size, y),
            Vertex::new(x + size, y + size),
            Vertex::new(x, y + size),
        ])
    }

    // --- Vertex tests ---

    #[test]
    fn vertex_display() {
        assert_eq!(Vertex::new(3, 14).to_string(), "(3, 14)");
    }

    #[test]
    fn vertex_distance_squared_is_symmetric() {
        let a = Vertex::new(1, 5);
        let b = Vertex::new(4, 1);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(b.distance_squared(a), 25);
        assert_eq!(a.distance_squared(a), 0);
    }

    #[test]
    fn vertex_orders_by_x_then_y() {
        assert!(Vertex::new(0, 9) < Vertex::new(1, 0));
        assert!(Vertex::new(2, 1) < Vertex::new(2, 3));
    }

    // --- Ring tests ---

    #[test]
    fn ring_display_joins_vertices() {
        assert_eq!(
            square(0, 0, 2).to_string(),
            "(0, 0), (2, 0), (2, 2), (0, 2)"
        );
    }

    #[test]
    fn ring_edges_include_closing_edge() {
        let ring = square(1, 1, 1);
        let edges: Vec<_> = ring.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Vertex::new(1, 2), Vertex::new(1, 1)));
    }

    #[test]
    fn ring_first_and_len() {
        let ring = square(4, 2, 1);
        assert_eq!(ring.first(), Some(Vertex::new(4, 2)));
        assert_eq!(ring.len(), 4);
        assert!(!ring.is_empty());
        assert!(Ring::new(vec![]).first().is_none());
    }

    // --- Outline tests ---

    #[test]
    fn outline_ring_accessors() {
        let outline = Outline::from_parts(5, 3, vec![square(0, 0, 3), square(4, 0, 1)]);
        assert_eq!(outline.ring_count(), 2);
        assert_eq!(outline.ring_len(1).unwrap(), 4);
        assert_eq!(outline.ring(0).unwrap().first(), Some(Vertex::ORIGIN));
        assert_eq!(outline.vertex_count(), 8);
    }

    #[test]
    fn outline_ring_out_of_range_is_an_error() {
        let outline = Outline::from_parts(1, 1, vec![square(0, 0, 1)]);
        assert_eq!(
            outline.ring(1),
            Err(RingIndexError { index: 1, count: 1 })
        );
        assert_eq!(
            outline.ring_len(7).unwrap_err().to_string(),
            "ring index 7 out of range for 1 rings"
        );
    }

    // --- Error display ---

    #[test]
    fn error_invalid_width_display() {
        let err = TraceError::InvalidWidth { width: 0 };
        assert_eq!(err.to_string(), "invalid width: 0 < 1");
    }

    #[test]
    fn error_invalid_bitmap_display() {
        let err = TraceError::from(BitmapShapeError::NotMultiple { len: 15, width: 8 });
        assert_eq!(
            err.to_string(),
            "invalid bitmap: len=15 is not a multiple of width=8"
        );
        let err = TraceError::from(BitmapShapeError::TooShort { len: 7, width: 8 });
        assert_eq!(err.to_string(), "invalid bitmap: too short: len=7 < width=8");
    }

    // --- Serde ---

    #[test]
    fn outline_serde_round_trip() {
        let outline = Outline::from_parts(4, 2, vec![square(0, 0, 2)]);
        let json = serde_json::to_string(&outline).unwrap();
        let back: Outline = serde_json::from_str(&json).unwrap();
        assert_eq!(outline, back);
    }

    #[test]
    fn trace_error_serde_round_trip() {
        let err = TraceError::InvalidBitmap(BitmapShapeError::TooShort { len: 0, width: 8 });
        let json = serde_json::to_string(&err).unwrap();
        let back: TraceError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
