//! Trace diagnostics: timing and counts for each stage.
//!
//! [`trace_with_diagnostics`] runs exactly the same stages as
//! [`trace`](crate::trace) and records, per stage, how long it took and
//! what it produced. The numbers are meant for comparing inputs and
//! spotting where time goes on large bitmaps.
//!
//! Time is read through the [`Clock`] trait so the crate itself stays
//! free of platform timers. [`SystemClock`] uses the `web-time` crate,
//! which maps to `performance.now()` on WASM and `std::time::Instant`
//! elsewhere.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bitmap::BitSource;
use crate::edge_map::EdgeMap;
use crate::ring::RingSet;
use crate::types::{Outline, Ring, TraceError, Vertex};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of timestamps for stage timing.
pub trait Clock {
    /// An opaque point in time.
    type Instant;

    /// The current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by `web_time::Instant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> Self::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &Self::Instant) -> Duration {
        since.elapsed()
    }
}

/// Diagnostics collected from a single trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDiagnostics {
    /// Stage 1: boundary-edge map construction.
    pub edge_map: StageDiagnostics,
    /// Stage 2: contour walking.
    pub walk: StageDiagnostics,
    /// Stage 3: merging rings that share a vertex.
    pub merge: StageDiagnostics,
    /// Stage 4: canonical starts and output ordering.
    pub sequence: StageDiagnostics,
    /// Wall-clock duration of the whole trace, validation included.
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: TraceSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Boundary-edge map metrics.
    EdgeMap {
        /// Corners in the `(width + 1) × (height + 1)` lattice.
        corner_count: usize,
        /// Boundary edges found.
        edge_count: usize,
    },
    /// Contour walk metrics.
    Walk {
        /// Rings walked.
        ring_count: usize,
        /// Vertices across all rings.
        vertex_count: usize,
        /// Fewest vertices in any ring.
        min_ring_vertices: usize,
        /// Most vertices in any ring.
        max_ring_vertices: usize,
        /// Edges left unconsumed (always zero for a well-formed map).
        edges_left: usize,
    },
    /// Merge metrics.
    Merge {
        /// Rings going in.
        rings_before: usize,
        /// Rings left after splicing.
        rings_after: usize,
        /// Splices performed.
        merges: usize,
        /// Full pairwise passes, including the final one with no change.
        passes: usize,
    },
    /// Canonicalization and ordering metrics.
    Sequence {
        /// Rings emitted.
        ring_count: usize,
        /// Straight-line distance from the origin through every ring start
        /// in output order.
        travel: f64,
    },
}

/// High-level counts for the whole trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Bitmap width in pixels.
    pub width: usize,
    /// Bitmap height in pixels.
    pub height: usize,
    /// Filled pixels.
    pub filled_pixels: usize,
    /// Rings in the output.
    pub ring_count: usize,
    /// Vertices in the output.
    pub vertex_count: usize,
}

/// Trace `bits` like [`trace`](crate::trace), recording diagnostics.
///
/// Diagnostics are only produced for a successful trace; validation
/// errors are returned before any stage runs.
///
/// # Errors
///
/// Same as [`trace`](crate::trace).
pub fn trace_with_diagnostics<B, C>(
    bits: &B,
    width: usize,
    clock: &C,
) -> Result<(Outline, TraceDiagnostics), TraceError>
where
    B: BitSource + ?Sized,
    C: Clock,
{
    let total_start = clock.now();
    let height = crate::checked_height(bits.bit_len(), width)?;

    // 1. Boundary-edge map.
    let start = clock.now();
    let mut edges = EdgeMap::build(bits, width, height);
    let edge_map = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::EdgeMap {
            corner_count: edges.corner_count(),
            edge_count: edges.edge_count(),
        },
    };

    // 2. Walk.
    let start = clock.now();
    let raw = crate::walk::walk_rings(&mut edges);
    let walk_duration = clock.elapsed(&start);
    let stats = ring_stats(&raw);
    let walk = StageDiagnostics {
        duration: walk_duration,
        metrics: StageMetrics::Walk {
            ring_count: raw.len(),
            vertex_count: stats.total,
            min_ring_vertices: stats.min,
            max_ring_vertices: stats.max,
            edges_left: edges.remaining(),
        },
    };

    // 3. Merge.
    let start = clock.now();
    let mut set = RingSet::from_rings(&raw);
    let merged = crate::merge::merge_touching(&mut set);
    let merge = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Merge {
            rings_before: raw.len(),
            rings_after: set.live().count(),
            merges: merged.merges,
            passes: merged.passes,
        },
    };

    // 4. Canonicalize and order.
    let start = clock.now();
    crate::sequence::canonicalize(&mut set);
    let rings = crate::sequence::sequence(&set);
    let sequence = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Sequence {
            ring_count: rings.len(),
            travel: travel(&rings),
        },
    };

    let outline = Outline::from_parts(width, height, rings);
    let summary = TraceSummary {
        width,
        height,
        filled_pixels: (0..bits.bit_len()).filter(|&i| bits.bit(i)).count(),
        ring_count: outline.ring_count(),
        vertex_count: outline.vertex_count(),
    };

    let diagnostics = TraceDiagnostics {
        edge_map,
        walk,
        merge,
        sequence,
        total_duration: clock.elapsed(&total_start),
        summary,
    };
    Ok((outline, diagnostics))
}

impl TraceDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Trace Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Bitmap: {}x{} ({} filled)",
            self.summary.width, self.summary.height, self.summary.filled_pixels,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        for (name, diag) in self.stages() {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Rings: {}  |  Vertices: {}",
            self.summary.ring_count, self.summary.vertex_count,
        ));

        lines.join("\n")
    }

    /// Stage names paired with their diagnostics, in pipeline order.
    #[must_use]
    pub fn stages(&self) -> [(&'static str, &StageDiagnostics); 4] {
        [
            ("Edge Map", &self.edge_map),
            ("Walk", &self.walk),
            ("Merge", &self.merge),
            ("Sequence", &self.sequence),
        ]
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::EdgeMap {
            corner_count,
            edge_count,
        } => format!("{edge_count} edges over {corner_count} corners"),
        StageMetrics::Walk {
            ring_count,
            vertex_count,
            min_ring_vertices,
            max_ring_vertices,
            edges_left,
        } => {
            let mut s = format!(
                "{ring_count} rings, {vertex_count} vertices (min={min_ring_vertices} max={max_ring_vertices})",
            );
            if *edges_left > 0 {
                s.push_str(&format!(" {edges_left} edges left"));
            }
            s
        }
        StageMetrics::Merge {
            rings_before,
            rings_after,
            merges,
            passes,
        } => format!("{rings_before}->{rings_after} rings, {merges} merges in {passes} passes"),
        StageMetrics::Sequence { ring_count, travel } => {
            format!("{ring_count} rings, travel={travel:.1}")
        }
    }
}

/// Vertex-count statistics for a set of rings.
struct RingStats {
    total: usize,
    min: usize,
    max: usize,
}

fn ring_stats(rings: &[Ring]) -> RingStats {
    RingStats {
        total: rings.iter().map(Ring::len).sum(),
        min: rings.iter().map(Ring::len).min().unwrap_or(0),
        max: rings.iter().map(Ring::len).max().unwrap_or(0),
    }
}

/// Euclidean length of the hops origin -> first start -> second start ...
#[allow(clippy::cast_precision_loss)]
fn travel(rings: &[Ring]) -> f64 {
    let mut at = Vertex::ORIGIN;
    let mut total = 0.0;
    for start in rings.iter().filter_map(Ring::first) {
        total += (start.distance_squared(at) as f64).sqrt();
        at = start;
    }
    total
}
