//! Merge rings that share a vertex.
//!
//! A hole whose corner touches its outline, or two outlines touching
//! diagonally, come out of the walker as separate rings that meet at a
//! lattice point. Those are spliced into one ring at the first coincident
//! vertex so that every shared corner ends up inside a single ring.
//!
//! Rings are visited largest first, so a small ring is absorbed into the
//! big one it touches rather than the other way round. Passes repeat
//! until one makes no change, because a splice can give the host a vertex
//! that touches a ring already checked against it.

use crate::ring::{RingSet, VertexId};

/// What a merge run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MergeStats {
    /// Number of splices performed.
    pub merges: usize,
    /// Number of passes over the ring pairs, including the final quiet one.
    pub passes: usize,
}

/// Splice touching rings together until no two live rings share a vertex.
pub(crate) fn merge_touching(set: &mut RingSet) -> MergeStats {
    set.order_by_len_desc();

    let mut stats = MergeStats::default();
    loop {
        stats.passes += 1;
        let mut merged_this_pass = 0;

        for host in 0..set.len() {
            if set.is_merged(host) {
                continue;
            }
            for guest in host + 1..set.len() {
                if set.is_merged(guest) {
                    continue;
                }
                if let Some((host_at, guest_at)) = shared_vertex(set, host, guest) {
                    set.splice(host, guest, host_at, guest_at);
                    merged_this_pass += 1;
                }
            }
        }

        stats.merges += merged_this_pass;
        if merged_this_pass == 0 {
            return stats;
        }
    }
}

/// First pair of coincident records, scanning the host from its head and,
/// for each host vertex, the guest from its head.
fn shared_vertex(set: &RingSet, host: usize, guest: usize) -> Option<(VertexId, VertexId)> {
    set.cycle(host).find_map(|(host_at, at)| {
        set.cycle(guest)
            .find(|&(_, other)| other == at)
            .map(|(guest_at, _)| (host_at, guest_at))
    })
}
