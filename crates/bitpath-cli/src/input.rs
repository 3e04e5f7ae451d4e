//! Reading bitmaps from disk.
//!
//! Two kinds of input are accepted:
//!
//! - **Text**: rows of `0`/`1`, one row per line or separated by `/`.
//!   `_` and whitespace inside a row are ignored, and lines starting with
//!   `#` are comments. Without an explicit width every row must be the
//!   same length and the first one sets the width.
//! - **Raster images** in any format the `image` crate was built with
//!   (detected from the file extension). Pixels are converted to 8-bit
//!   luma and a pixel is filled when it is darker than the threshold.

use std::path::{Path, PathBuf};

use bitpath_trace::{Bitmap, BitmapParseError};
use serde::{Deserialize, Serialize};

/// How raster images are turned into bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Luma below this value is a filled pixel.
    pub threshold: u8,
    /// Swap filled and empty after thresholding (also applies to text).
    pub invert: bool,
}

impl RasterConfig {
    /// Default luma threshold (mid-grey).
    pub const DEFAULT_THRESHOLD: u8 = 128;
    /// Default inversion setting.
    pub const DEFAULT_INVERT: bool = false;
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            invert: Self::DEFAULT_INVERT,
        }
    }
}

/// A bitmap ready to trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    /// Row-major bits.
    pub bits: Bitmap,
    /// Pixels per row.
    pub width: usize,
}

/// Errors loading an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("error reading {}: {source}", .path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The image could not be decoded.
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// A text row holds something other than bits and separators.
    #[error("row {row}: {source}")]
    Parse {
        /// 1-based row number.
        row: usize,
        /// What was wrong with it.
        source: BitmapParseError,
    },

    /// A text row's length differs from the first row's.
    #[error("row {row} has {found} pixels, expected {expected}")]
    RaggedRows {
        /// 1-based row number.
        row: usize,
        /// Width set by the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },

    /// No rows at all.
    #[error("input contains no pixels")]
    Empty,

    /// Image dimensions do not fit in memory on this platform.
    #[error("image too large: {width}x{height}")]
    TooLarge {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },
}

/// Whether `path` names a raster image rather than a text bitmap.
#[must_use]
pub fn is_image_path(path: &Path) -> bool {
    image::ImageFormat::from_path(path).is_ok()
}

/// Load the bitmap at `path`.
///
/// `width` overrides the width inferred from text input and is ignored for
/// images.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or parsed.
pub fn load(path: &Path, width: Option<usize>, config: &RasterConfig) -> Result<Loaded, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    if is_image_path(path) {
        let bytes = std::fs::read(path).map_err(io_error)?;
        decode_image(&bytes, config)
    } else {
        let text = std::fs::read_to_string(path).map_err(io_error)?;
        parse_text(&text, width, config)
    }
}

/// Parse a text bitmap.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] for invalid characters,
/// [`LoadError::RaggedRows`] when rows differ in length and no `width` is
/// given, and [`LoadError::Empty`] when there are no bits.
pub fn parse_text(
    text: &str,
    width: Option<usize>,
    config: &RasterConfig,
) -> Result<Loaded, LoadError> {
    let rows = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split('/'))
        .filter(|row| !row.trim().is_empty());

    let mut bits = Bitmap::default();
    let mut inferred = None;
    for (i, row) in rows.enumerate() {
        let parsed: Bitmap = row
            .parse()
            .map_err(|source| LoadError::Parse { row: i + 1, source })?;
        let expected = *inferred.get_or_insert(parsed.len());
        if width.is_none() && parsed.len() != expected {
            return Err(LoadError::RaggedRows {
                row: i + 1,
                expected,
                found: parsed.len(),
            });
        }
        bits.extend(parsed.iter().map(|bit| bit ^ config.invert));
    }

    if bits.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(Loaded {
        bits,
        width: width.or(inferred).unwrap_or_default(),
    })
}

/// Decode an image and threshold it into a bitmap.
///
/// # Errors
///
/// Returns [`LoadError::Image`] if the bytes are not a supported image.
pub fn decode_image(bytes: &[u8], config: &RasterConfig) -> Result<Loaded, LoadError> {
    let gray = image::load_from_memory(bytes)?.to_luma8();
    threshold(&gray, config)
}

/// Threshold a grayscale image into a bitmap.
///
/// # Errors
///
/// Returns [`LoadError::Empty`] for a zero-sized image and
/// [`LoadError::TooLarge`] if its width does not fit in `usize`.
pub fn threshold(gray: &image::GrayImage, config: &RasterConfig) -> Result<Loaded, LoadError> {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return Err(LoadError::Empty);
    }
    let width = usize::try_from(w).map_err(|_| LoadError::TooLarge {
        width: w,
        height: h,
    })?;
    let bits = gray
        .pixels()
        .map(|p| (p.0[0] < config.threshold) ^ config.invert)
        .collect();
    Ok(Loaded { bits, width })
}
