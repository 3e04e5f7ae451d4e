//! Fix each ring's start vertex and the order rings are emitted in.
//!
//! Both choices are distance-driven so that the output is deterministic
//! and a pen moving through it travels short hops: a ring starts at the
//! vertex nearest the origin, and the next ring is the one whose start is
//! nearest to where the previous ring started.

use crate::ring::RingSet;
use crate::types::{Ring, Vertex};

/// Rotate every live ring so that it starts at its vertex nearest the
/// origin. Among equally near vertices the first in cycle order from the
/// current head wins.
pub(crate) fn canonicalize(set: &mut RingSet) {
    let live: Vec<usize> = set.live().collect();
    for ring in live {
        let mut best = None;
        for (id, at) in set.cycle(ring) {
            let d = at.distance_squared(Vertex::ORIGIN);
            if best.is_none_or(|(_, nearest)| d < nearest) {
                best = Some((id, d));
                if d == 0 {
                    break;
                }
            }
        }
        if let Some((id, _)) = best {
            set.set_head(ring, id);
        }
    }
}

/// Emit live rings in nearest-next order, starting from the origin.
///
/// Ties go to the ring that comes first in working order.
pub(crate) fn sequence(set: &RingSet) -> Vec<Ring> {
    let mut pending: Vec<usize> = set.live().collect();
    let mut ordered = Vec::with_capacity(pending.len());
    let mut cursor = Vertex::ORIGIN;

    while let Some(pos) = pending
        .iter()
        .enumerate()
        .min_by_key(|&(_, &ring)| set.head(ring).distance_squared(cursor))
        .map(|(pos, _)| pos)
    {
        let ring = pending.remove(pos);
        cursor = set.head(ring);
        ordered.push(set.to_ring(ring));
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(usize, usize)]) -> Ring {
        Ring::new(points.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
    }

    #[test]
    fn canonical_start_is_nearest_origin() {
        let mut set = RingSet::from_rings(&[ring(&[(1, 2), (2, 2), (2, 1), (1, 1)])]);
        canonicalize(&mut set);
        assert_eq!(set.to_ring(0), ring(&[(1, 1), (1, 2), (2, 2), (2, 1)]));
    }

    #[test]
    fn canonical_start_tie_keeps_first_in_cycle() {
        // (3, 1) and (1, 3) are equally near; (3, 1) comes first.
        let mut set = RingSet::from_rings(&[ring(&[(3, 3), (3, 1), (5, 1), (5, 5), (1, 5), (1, 3)])]);
        canonicalize(&mut set);
        assert_eq!(set.head(0), Vertex::new(3, 1));
    }

    #[test]
    fn origin_ring_is_unchanged() {
        let square = ring(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let mut set = RingSet::from_rings(std::slice::from_ref(&square));
        canonicalize(&mut set);
        assert_eq!(set.to_ring(0), square);
    }

    #[test]
    fn sequence_is_nearest_next() {
        let far = ring(&[(8, 0), (9, 0), (9, 1), (8, 1)]);
        let near = ring(&[(2, 0), (3, 0), (3, 1), (2, 1)]);
        let middle = ring(&[(5, 0), (6, 0), (6, 1), (5, 1)]);
        let set = RingSet::from_rings(&[far.clone(), near.clone(), middle.clone()]);
        assert_eq!(sequence(&set), vec![near, middle, far]);
    }

    #[test]
    fn sequence_tie_keeps_working_order() {
        // Both start 2 away from the origin.
        let right = ring(&[(2, 0), (3, 0), (3, 1), (2, 1)]);
        let below = ring(&[(0, 2), (1, 2), (1, 3), (0, 3)]);
        let set = RingSet::from_rings(&[below.clone(), right.clone()]);
        assert_eq!(sequence(&set), vec![below, right]);
    }

    #[test]
    fn sequence_of_nothing_is_empty() {
        assert!(sequence(&RingSet::default()).is_empty());
    }
}
