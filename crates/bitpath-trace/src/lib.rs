//! bitpath-trace: trace a 1-bit bitmap into axis-aligned outlines (sans-IO).
//!
//! The filled region of a bitmap is converted into closed rings of lattice
//! corners through:
//! boundary-edge map -> contour walk -> merge touching rings ->
//! canonical start and ordering.
//!
//! Every ring's edges are horizontal or vertical, only corners where the
//! outline turns are kept, and no two output rings share a corner. Output
//! is fully determined by the input bits.
//!
//! This crate has **no I/O dependencies**. Pixels are read through the
//! [`BitSource`] trait; serialization lives in `bitpath-export`.
//!
//! ```
//! use bitpath_trace::{Bitmap, Vertex, trace};
//!
//! let bits: Bitmap = "1101/1101".parse()?;
//! let outline = trace(&bits, 4)?;
//! assert_eq!(outline.height(), 2);
//! assert_eq!(outline.ring_count(), 2);
//! assert_eq!(outline.rings()[1].first(), Some(Vertex::new(3, 0)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bitmap;
pub mod diagnostics;
pub mod edge_map;
pub mod types;
pub mod walk;

mod merge;
mod ring;
mod sequence;

pub use bitmap::{BitSource, Bitmap, BitmapParseError};
pub use diagnostics::{Clock, SystemClock, TraceDiagnostics, trace_with_diagnostics};
pub use edge_map::{Direction, EdgeMap};
pub use types::{BitmapShapeError, Outline, Ring, RingIndexError, TraceError, Vertex};

use ring::RingSet;

/// Trace `bits`, laid out as rows of `width` pixels, into outlines.
///
/// # Steps
///
/// 1. Build the boundary-edge map
/// 2. Walk every edge into rings
/// 3. Merge rings that share a vertex
/// 4. Start each ring nearest the origin and order rings nearest-next
///
/// # Errors
///
/// Returns [`TraceError::InvalidWidth`] if `width` is zero.
/// Returns [`TraceError::InvalidBitmap`] if `bits` holds fewer bits than
/// one row or its length is not a multiple of `width`.
pub fn trace<B: BitSource + ?Sized>(bits: &B, width: usize) -> Result<Outline, TraceError> {
    let height = checked_height(bits.bit_len(), width)?;

    let mut edges = EdgeMap::build(bits, width, height);
    let raw = walk::walk_rings(&mut edges);

    let mut set = RingSet::from_rings(&raw);
    merge::merge_touching(&mut set);
    sequence::canonicalize(&mut set);
    let rings = sequence::sequence(&set);

    Ok(Outline::from_parts(width, height, rings))
}

/// Validate a bit length against `width` and return the row count.
pub(crate) const fn checked_height(len: usize, width: usize) -> Result<usize, TraceError> {
    if width == 0 {
        return Err(TraceError::InvalidWidth { width });
    }
    if len < width {
        return Err(TraceError::InvalidBitmap(BitmapShapeError::TooShort {
            len,
            width,
        }));
    }
    if len % width != 0 {
        return Err(TraceError::InvalidBitmap(BitmapShapeError::NotMultiple {
            len,
            width,
        }));
    }
    Ok(len / width)
}
