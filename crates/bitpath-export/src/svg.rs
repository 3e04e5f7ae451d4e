//! SVG export serializer.
//!
//! Wraps an outline's path data in a standalone SVG document using the
//! [`svg`] crate for document construction and XML escaping. The
//! `viewBox` is the bitmap's pixel grid, so one user unit is one pixel.
//!
//! The document holds an optional background `<path>` covering the whole
//! grid, then a single `<path>` carrying every ring. Holes come out right
//! under the default `nonzero` fill rule because a hole is traced in the
//! opposite direction to the outline around it.
//!
//! Optional [`SvgOptions`] metadata embeds `<title>` and `<desc>` elements
//! for accessibility and to help file managers identify exported files.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::Text;
use svg::node::element::{Description, Path, Title};

use bitpath_trace::Outline;

use crate::path_data::to_path_data;

/// Background colour used when none is configured.
pub const DEFAULT_BACKGROUND: &str = "#fff";

/// Rendering options for [`to_svg`].
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgOptions<'a> {
    /// Fill of the background path, or `None` to leave the document
    /// transparent.
    pub background: Option<&'a str>,

    /// Fill of the outline path. `None` leaves the attribute off, which
    /// renders black.
    pub fill: Option<&'a str>,

    /// Document title, emitted as `<title>`.
    ///
    /// Typically the source file name without extension.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,
}

impl Default for SvgOptions<'_> {
    fn default() -> Self {
        Self {
            background: Some(DEFAULT_BACKGROUND),
            fill: None,
            title: None,
            description: None,
        }
    }
}

/// Path data for a `width × height` rectangle anchored at the origin.
#[must_use]
pub fn background_path_data(width: usize, height: usize) -> String {
    format!("m0,0h{width}v{height}h-{width}z")
}

/// Serialize an outline into a complete SVG document.
///
/// # Examples
///
/// ```
/// use bitpath_export::{SvgOptions, to_svg};
/// use bitpath_trace::{Bitmap, trace};
///
/// let bits: Bitmap = "1101/1101".parse()?;
/// let svg = to_svg(&trace(&bits, 4)?, &SvgOptions::default());
/// assert!(svg.contains(r#"viewBox="0 0 4 2""#));
/// assert!(svg.contains(r#"d="m0,0h2v2h-2zm3,0h1v2h-1z""#));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn to_svg(outline: &Outline, options: &SvgOptions<'_>) -> String {
    let (w, h) = (outline.width(), outline.height());
    let mut doc = Document::new()
        .set("version", "1.1")
        .set("viewBox", format!("0 0 {w} {h}"));

    // Optional <title> element
    if let Some(title) = options.title {
        doc = doc.add(Title::new(title));
    }

    // Optional <desc> element
    if let Some(description) = options.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(background) = options.background {
        doc = doc.add(
            Path::new()
                .set("fill", background)
                .set("d", background_path_data(w, h)),
        );
    }

    // An empty `d` is an error in some renderers, so a blank bitmap gets
    // no foreground path at all.
    let d = to_path_data(outline);
    if !d.is_empty() {
        let mut path = Path::new();
        if let Some(fill) = options.fill {
            path = path.set("fill", fill);
        }
        doc = doc.add(path.set("d", d));
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
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

    // --- background_path_data ---

    #[test]
    fn background_covers_the_grid() {
        assert_eq!(background_path_data(8, 8), "m0,0h8v8h-8z");
        assert_eq!(background_path_data(5, 3), "m0,0h5v3h-5z");
    }

    // --- Dimensions ---

    #[test]
    fn viewbox_reflects_dimensions() {
        let svg = to_svg(&outline("000000/000000", 6), &SvgOptions::default());
        assert!(svg.contains(r#"viewBox="0 0 6 2""#));
    }

    // --- SVG structure ---

    #[test]
    fn svg_has_xml_declaration() {
        let svg = to_svg(&outline("1", 1), &SvgOptions::default());
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }

    #[test]
    fn svg_has_xmlns_namespace() {
        let svg = to_svg(&outline("1", 1), &SvgOptions::default());
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    }

    #[test]
    fn svg_ends_with_closing_tag() {
        let svg = to_svg(&outline("1", 1), &SvgOptions::default());
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    // --- Paths ---

    #[test]
    fn background_then_outline() {
        let svg = to_svg(&outline("1101/1101", 4), &SvgOptions::default());
        assert_eq!(svg.matches("<path").count(), 2);
        let bg = svg.find(r#"d="m0,0h4v2h-4z""#).unwrap();
        let fg = svg.find(r#"d="m0,0h2v2h-2zm3,0h1v2h-1z""#).unwrap();
        assert!(bg < fg);
        assert!(svg.contains(r##"fill="#fff""##));
    }

    #[test]
    fn no_background() {
        let options = SvgOptions {
            background: None,
            ..SvgOptions::default()
        };
        let svg = to_svg(&outline("1", 1), &options);
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(!svg.contains("fill="));
    }

    #[test]
    fn custom_colours() {
        let options = SvgOptions {
            background: Some("black"),
            fill: Some("#0f0"),
            ..SvgOptions::default()
        };
        let svg = to_svg(&outline("1", 1), &options);
        assert!(svg.contains(r#"fill="black""#));
        assert!(svg.contains(r##"fill="#0f0""##));
    }

    #[test]
    fn blank_bitmap_has_only_background() {
        let svg = to_svg(&outline("00/00", 2), &SvgOptions::default());
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r#"d="m0,0h2v2h-2z""#));
    }

    // --- Metadata ---

    #[test]
    fn title_and_description_are_escaped() {
        let options = SvgOptions {
            title: Some("a <b> & c"),
            description: Some("width=4 \"quoted\""),
            ..SvgOptions::default()
        };
        let svg = to_svg(&outline("1", 1), &options);
        assert!(svg.contains("<title>a &lt;b&gt; &amp; c</title>"));
        assert!(svg.contains("<desc>"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn no_metadata_elements_by_default() {
        let svg = to_svg(&outline("1", 1), &SvgOptions::default());
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("<desc>"));
    }
}
