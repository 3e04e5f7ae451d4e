//! Contour walking: turn the boundary-edge map into closed rings.
//!
//! Each walk starts at the first unconsumed rightward edge in row-major
//! order, which is always the top-left corner of a region not yet traced,
//! and follows edges until it is back at the start. Edges are consumed as
//! they are walked, so repeating until no start remains traces every
//! boundary exactly once.

use crate::edge_map::{Direction, EdgeMap};
use crate::types::{Ring, Vertex};

/// Walk every remaining edge of `edges` into rings, in discovery order.
///
/// On return `edges.remaining()` is zero.
pub fn walk_rings(edges: &mut EdgeMap) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut cursor = 0;
    while let Some(start) = edges.take_next_start(&mut cursor) {
        rings.push(walk_ring(edges, start));
    }
    rings
}

/// Follow one ring whose first (already consumed) edge leaves `start`
/// heading right.
///
/// A vertex is emitted only where the heading changes, so straight runs
/// collapse to a single edge.
fn walk_ring(edges: &mut EdgeMap, start: Vertex) -> Ring {
    let mut vertices = vec![start];
    let mut heading = Direction::Right;
    let mut here = heading.step(start);

    while let Some(at) = here
        && at != start
    {
        // `find` stops at the first hit, so only that edge is consumed.
        let Some(next) = heading
            .priority()
            .into_iter()
            .find(|&dir| edges.take(at, dir))
        else {
            // Unreachable for a map built from a bitmap: every corner has
            // as many edges leaving as arriving.
            break;
        };
        if next != heading {
            vertices.push(at);
            heading = next;
        }
        here = next.step(at);
    }

    Ring::new(vertices)
}
