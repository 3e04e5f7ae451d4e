//! bitpath-export: Pure format serializers for traced outlines (sans-IO)
//!
//! Converts an [`Outline`](bitpath_trace::Outline) into relative SVG path
//! data or a complete SVG document.

pub mod path_data;
pub mod svg;

pub use path_data::{ring_path_data, to_path_data, write_path_data};
pub use svg::{SvgOptions, background_path_data, to_svg};
