//! Working set of rings during merge and sequencing.
//!
//! Each ring is a doubly-linked cycle of vertex records stored in one
//! arena and addressed by [`VertexId`]. Splicing one ring into another is
//! four index rewrites, and a ring's start can be moved by changing its
//! head without touching the records.

use std::cmp::Reverse;

use crate::types::{Ring, Vertex};

/// Stable index of a vertex record in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VertexId(usize);

#[derive(Debug, Clone, Copy)]
struct Link {
    at: Vertex,
    prev: VertexId,
    next: VertexId,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    head: VertexId,
    len: usize,
    merged: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RingSet {
    links: Vec<Link>,
    entries: Vec<Entry>,
}

impl RingSet {
    /// Link each ring into its own cycle. Empty rings are skipped.
    pub(crate) fn from_rings(rings: &[Ring]) -> Self {
        let total = rings.iter().map(Ring::len).sum();
        let mut set = Self {
            links: Vec::with_capacity(total),
            entries: Vec::with_capacity(rings.len()),
        };
        for ring in rings {
            set.push(ring.vertices());
        }
        set
    }

    fn push(&mut self, vertices: &[Vertex]) {
        let n = vertices.len();
        if n == 0 {
            return;
        }
        let base = self.links.len();
        for (i, &at) in vertices.iter().enumerate() {
            self.links.push(Link {
                at,
                prev: VertexId(base + (i + n - 1) % n),
                next: VertexId(base + (i + 1) % n),
            });
        }
        self.entries.push(Entry {
            head: VertexId(base),
            len: n,
            merged: false,
        });
    }

    /// Number of rings, including merged-away ones.
    pub(crate) const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rings that have not been merged into another, in working order.
    pub(crate) fn live(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.merged)
            .map(|(i, _)| i)
    }

    pub(crate) fn is_merged(&self, ring: usize) -> bool {
        self.entries[ring].merged
    }

    /// Stable sort of the working order by vertex count, largest first.
    pub(crate) fn order_by_len_desc(&mut self) {
        self.entries.sort_by_key(|e| Reverse(e.len));
    }

    /// Walk a ring's records from its head in cycle order.
    pub(crate) fn cycle(&self, ring: usize) -> Cycle<'_> {
        let head = self.entries[ring].head;
        Cycle {
            links: &self.links,
            head,
            next: Some(head),
        }
    }

    /// The vertex at a ring's head.
    pub(crate) fn head(&self, ring: usize) -> Vertex {
        self.links[self.entries[ring].head.0].at
    }

    pub(crate) fn set_head(&mut self, ring: usize, head: VertexId) {
        self.entries[ring].head = head;
    }

    /// Splice `guest` into `host`.
    ///
    /// `host_at` and `guest_at` are coincident records of the two rings.
    /// The guest's cycle, from `guest_at` around to its predecessor, is
    /// inserted just before `host_at`, so the shared coordinate appears
    /// once from each side. The guest is marked merged.
    pub(crate) fn splice(
        &mut self,
        host: usize,
        guest: usize,
        host_at: VertexId,
        guest_at: VertexId,
    ) {
        let before = self.links[host_at.0].prev;
        let guest_tail = self.links[guest_at.0].prev;
        self.links[before.0].next = guest_at;
        self.links[guest_at.0].prev = before;
        self.links[guest_tail.0].next = host_at;
        self.links[host_at.0].prev = guest_tail;

        self.entries[host].len += self.entries[guest].len;
        self.entries[guest].merged = true;
    }

    /// Export a ring as a plain vertex sequence starting at its head.
    pub(crate) fn to_ring(&self, ring: usize) -> Ring {
        Ring::new(self.cycle(ring).map(|(_, at)| at).collect())
    }
}

/// Iterator over `(record, vertex)` pairs of one ring.
pub(crate) struct Cycle<'a> {
    links: &'a [Link],
    head: VertexId,
    next: Option<VertexId>,
}

impl Iterator for Cycle<'_> {
    type Item = (VertexId, Vertex);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let link = self.links[id.0];
        self.next = (link.next != self.head).then_some(link.next);
        Some((id, link.at))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ring(points: &[(usize, usize)]) -> Ring {
        Ring::new(points.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
    }

    fn find(set: &RingSet, ring: usize, at: (usize, usize)) -> VertexId {
        set.cycle(ring)
            .find(|&(_, v)| v == Vertex::new(at.0, at.1))
            .map(|(id, _)| id)
            .unwrap()
    }

    #[test]
    fn cycle_visits_every_vertex_once() {
        let square = ring(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let set = RingSet::from_rings(std::slice::from_ref(&square));
        assert_eq!(set.to_ring(0), square);
    }

    #[test]
    fn empty_rings_are_skipped() {
        let set = RingSet::from_rings(&[Ring::new(vec![]), ring(&[(0, 0), (1, 0), (1, 1), (0, 1)])]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_head_rotates() {
        let mut set = RingSet::from_rings(&[ring(&[(0, 0), (1, 0), (1, 1), (0, 1)])]);
        let id = find(&set, 0, (1, 1));
        set.set_head(0, id);
        assert_eq!(set.to_ring(0), ring(&[(1, 1), (0, 1), (0, 0), (1, 0)]));
        assert_eq!(set.head(0), Vertex::new(1, 1));
    }

    #[test]
    fn splice_inserts_guest_before_shared_record() {
        // Two unit squares touching at (1, 1).
        let mut set = RingSet::from_rings(&[
            ring(&[(0, 0), (1, 0), (1, 1), (0, 1)]),
            ring(&[(1, 1), (2, 1), (2, 2), (1, 2)]),
        ]);
        let host_at = find(&set, 0, (1, 1));
        let guest_at = find(&set, 1, (1, 1));
        set.splice(0, 1, host_at, guest_at);
        assert!(set.is_merged(1));
        assert_eq!(set.live().collect::<Vec<_>>(), vec![0]);
        assert_eq!(
            set.to_ring(0),
            ring(&[
                (0, 0),
                (1, 0),
                (1, 1),
                (2, 1),
                (2, 2),
                (1, 2),
                (1, 1),
                (0, 1)
            ])
        );
    }

    #[test]
    fn order_by_len_is_stable() {
        let small_a = ring(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let big = ring(&[(3, 0), (5, 0), (5, 2), (4, 2), (4, 1), (3, 1)]);
        let small_b = ring(&[(7, 0), (8, 0), (8, 1), (7, 1)]);
        let mut set = RingSet::from_rings(&[small_a.clone(), big.clone(), small_b.clone()]);
        set.order_by_len_desc();
        assert_eq!(set.to_ring(0), big);
        assert_eq!(set.to_ring(1), small_a);
        assert_eq!(set.to_ring(2), small_b);
    }
}
