//! Output formats for a traced outline.

use std::fmt::Write;

use bitpath_export::SvgOptions;
use bitpath_trace::Outline;
use clap::ValueEnum;

/// What to write for a traced bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Standalone SVG document.
    Svg,
    /// Bare path data for a `<path d="...">` attribute.
    Path,
    /// The outline as JSON (`width`, `height`, `rings`).
    Json,
    /// One line per ring: index, vertex count, and vertices.
    Rings,
}

/// Render `outline` in `format`. Non-empty results end with a newline.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn render(
    outline: &Outline,
    format: Format,
    options: &SvgOptions<'_>,
) -> Result<String, serde_json::Error> {
    Ok(match format {
        Format::Svg => bitpath_export::to_svg(outline, options),
        Format::Path => bitpath_export::to_path_data(outline) + "\n",
        Format::Json => serde_json::to_string_pretty(outline)? + "\n",
        Format::Rings => ring_listing(outline),
    })
}

/// `index: n=count: (x, y), ...` for every ring.
fn ring_listing(outline: &Outline) -> String {
    let mut out = String::new();
    for (i, ring) in outline.rings().iter().enumerate() {
        let _ = writeln!(out, "{i}: n={}: {ring}", ring.len());
    }
    out
}
