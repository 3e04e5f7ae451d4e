//! Relative SVG path data for traced outlines.
//!
//! Each ring becomes one subpath: a relative `m` to its first vertex,
//! then one `h` or `v` per remaining vertex, then `z`. The move is taken
//! from the previous ring's first vertex (the pen position after `z`), or
//! from the origin for the first ring. No whitespace is emitted, and the
//! comma between the move's operands is dropped when the second one is
//! negative since the sign already separates them.
//!
//! Because every edge is axis-aligned, vertices never need both
//! coordinates and the output stays compact.

use std::fmt::{self, Write};

use bitpath_trace::{Outline, Ring, Vertex};

/// Write the path data of every ring in `outline` to `out`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_path_data<W: Write + ?Sized>(outline: &Outline, out: &mut W) -> fmt::Result {
    let mut pen = Vertex::ORIGIN;
    for ring in outline.rings() {
        write_ring(ring, pen, out)?;
        if let Some(first) = ring.first() {
            pen = first;
        }
    }
    Ok(())
}

/// Path data of every ring in `outline`.
///
/// # Examples
///
/// ```
/// use bitpath_trace::{Bitmap, trace};
///
/// let bits: Bitmap = "1101/1101".parse()?;
/// let outline = trace(&bits, 4)?;
/// assert_eq!(bitpath_export::to_path_data(&outline), "m0,0h2v2h-2zm3,0h1v2h-1z");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn to_path_data(outline: &Outline) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_path_data(outline, &mut out);
    out
}

/// Path data of a single ring, moving from `pen`.
///
/// Returns an empty string for an empty ring.
#[must_use]
pub fn ring_path_data(ring: &Ring, pen: Vertex) -> String {
    let mut out = String::new();
    let _ = write_ring(ring, pen, &mut out);
    out
}

fn write_ring<W: Write + ?Sized>(ring: &Ring, pen: Vertex, out: &mut W) -> fmt::Result {
    let Some((first, rest)) = ring.vertices().split_first() else {
        return Ok(());
    };

    out.write_char('m')?;
    write_offset(out, pen.x, first.x)?;
    if first.y >= pen.y {
        out.write_char(',')?;
    }
    write_offset(out, pen.y, first.y)?;

    let mut at = *first;
    for &next in rest {
        if next.x == at.x {
            out.write_char('v')?;
            write_offset(out, at.y, next.y)?;
        } else if next.y == at.y {
            out.write_char('h')?;
            write_offset(out, at.x, next.x)?;
        }
        at = next;
    }
    out.write_char('z')
}

/// Write `to - from` as a signed integer.
fn write_offset<W: Write + ?Sized>(out: &mut W, from: usize, to: usize) -> fmt::Result {
    if to < from {
        out.write_char('-')?;
    }
    write!(out, "{}", to.abs_diff(from))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bitpath_trace::Bitmap;

    use super::*;

    fn outline(rows: &str, width: usize) -> Outline {
        let bits: Bitmap = rows.parse().unwrap();
        bitpath_trace::trace(&bits, width).unwrap()
    }

    fn ring(points: &[(usize, usize)]) -> Ring {
        Ring::new(points.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
    }

    // --- ring_path_data ---

    #[test]
    fn empty_ring_has_no_data() {
        assert_eq!(ring_path_data(&Ring::new(vec![]), Vertex::ORIGIN), "");
    }

    #[test]
    fn unit_square_from_origin() {
        let square = ring(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        assert_eq!(ring_path_data(&square, Vertex::ORIGIN), "m0,0h1v1h-1z");
    }

    #[test]
    fn negative_dy_drops_the_comma() {
        let square = ring(&[(4, 1), (5, 1), (5, 2), (4, 2)]);
        assert_eq!(ring_path_data(&square, Vertex::new(1, 3)), "m3-2h1v1h-1z");
    }

    #[test]
    fn negative_dx_keeps_the_comma() {
        let square = ring(&[(0, 5), (1, 5), (1, 6), (0, 6)]);
        assert_eq!(ring_path_data(&square, Vertex::new(2, 1)), "m-2,4h1v1h-1z");
    }

    #[test]
    fn hole_is_a_plain_subpath() {
        let hole = ring(&[(1, 1), (1, 2), (2, 2), (2, 1)]);
        assert_eq!(ring_path_data(&hole, Vertex::ORIGIN), "m1,1v1h1v-1z");
    }

    // --- to_path_data ---

    #[test]
    fn empty_outline_has_no_data() {
        assert_eq!(to_path_data(&outline("0000", 2)), "");
    }

    #[test]
    fn moves_are_relative_to_previous_ring_start() {
        assert_eq!(
            to_path_data(&outline("1101/1101", 4)),
            "m0,0h2v2h-2zm3,0h1v2h-1z"
        );
    }

    #[test]
    fn hole_and_islands() {
        assert_eq!(
            to_path_data(&outline("11101/10100/11101", 5)),
            "m0,0h3v3h-3zm1,1v1h1v-1zm3-1h1v1h-1zm0,2h1v1h-1z"
        );
    }

    #[test]
    fn write_path_data_appends() {
        let mut out = String::from("M");
        write_path_data(&outline("1", 1), &mut out).unwrap();
        assert_eq!(out, "Mm0,0h1v1h-1z");
    }
}
