//! Bitmap access: the [`BitSource`] trait and the packed [`Bitmap`] buffer.
//!
//! The tracer reads pixels through [`BitSource`] so callers can hand in
//! whatever row-major bit storage they already have. [`Bitmap`] is the
//! owned implementation used by the CLI and the tests: bits are packed
//! most significant bit first, so the byte `0b1000_0001` is the row
//! `1, 0, 0, 0, 0, 0, 0, 1`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Row-major, read-only bit storage.
///
/// A set bit is a filled pixel. Reads past [`bit_len`](Self::bit_len)
/// return `false`.
pub trait BitSource {
    /// Total number of bits.
    fn bit_len(&self) -> usize;

    /// The bit at `index`.
    fn bit(&self, index: usize) -> bool;
}

impl BitSource for [bool] {
    fn bit_len(&self) -> usize {
        self.len()
    }

    fn bit(&self, index: usize) -> bool {
        self.get(index).copied().unwrap_or(false)
    }
}

impl BitSource for Vec<bool> {
    fn bit_len(&self) -> usize {
        self.len()
    }

    fn bit(&self, index: usize) -> bool {
        self.as_slice().bit(index)
    }
}

impl<const N: usize> BitSource for [bool; N] {
    fn bit_len(&self) -> usize {
        N
    }

    fn bit(&self, index: usize) -> bool {
        self.as_slice().bit(index)
    }
}

/// An owned, packed bit buffer.
///
/// Bits past `len` in the final byte are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitmap {
    bytes: Vec<u8>,
    len: usize,
}

impl Bitmap {
    /// A bitmap of `len` clear bits.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Wrap whole bytes; the bit length is `8 * bytes.len()`.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let len = bytes.len() * 8;
        Self { bytes, len }
    }

    /// Take the first `len` bits of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`BitmapParseError::InsufficientBytes`] if `bytes` holds
    /// fewer than `len` bits.
    pub fn from_bytes_with_len(bytes: &[u8], len: usize) -> Result<Self, BitmapParseError> {
        let available = bytes.len() * 8;
        if len > available {
            return Err(BitmapParseError::InsufficientBytes { len, available });
        }
        let mut bytes = bytes[..len.div_ceil(8)].to_vec();
        let tail = len % 8;
        if tail != 0
            && let Some(last) = bytes.last_mut()
        {
            *last &= 0xFF << (8 - tail);
        }
        Ok(Self { bytes, len })
    }

    /// Number of bits.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap holds no bits.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bit at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        let byte = self.bytes.get(index / 8)?;
        Some(byte & mask(index) != 0)
    }

    /// Set the bit at `index`, returning its previous value.
    ///
    /// Returns `None` and leaves the bitmap untouched if `index` is past
    /// the end.
    pub fn set(&mut self, index: usize, value: bool) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        let byte = self.bytes.get_mut(index / 8)?;
        let previous = *byte & mask(index) != 0;
        if value {
            *byte |= mask(index);
        } else {
            *byte &= !mask(index);
        }
        Some(previous)
    }

    /// Append one bit.
    pub fn push(&mut self, value: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        self.len += 1;
        self.set(self.len - 1, value);
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Iterate over all bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.bit(i))
    }

    /// The packed bytes, most significant bit first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

const fn mask(index: usize) -> u8 {
    0x80 >> (index % 8)
}

impl BitSource for Bitmap {
    fn bit_len(&self) -> usize {
        self.len
    }

    fn bit(&self, index: usize) -> bool {
        self.get(index).unwrap_or(false)
    }
}

impl Extend<bool> for Bitmap {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bitmap = Self::default();
        bitmap.extend(iter);
        bitmap
    }
}

/// Parses `0`/`1` digits. `/`, `_`, and whitespace separate rows or
/// groups and are skipped, so `"1101/1101"` is eight bits.
impl FromStr for Bitmap {
    type Err = BitmapParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bitmap = Self::default();
        for (position, ch) in s.chars().enumerate() {
            match ch {
                '0' => bitmap.push(false),
                '1' => bitmap.push(true),
                '/' | '_' => {}
                c if c.is_whitespace() => {}
                _ => return Err(BitmapParseError::InvalidChar { ch, position }),
            }
        }
        Ok(bitmap)
    }
}

/// Errors building a [`Bitmap`] from text or bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum BitmapParseError {
    /// A character other than a digit or separator.
    #[error("invalid character {ch:?} at position {position}")]
    InvalidChar {
        /// The offending character.
        ch: char,
        /// Its position in the input, in characters.
        position: usize,
    },

    /// The byte buffer is shorter than the requested bit length.
    #[error("requested {len} bits but only {available} are available")]
    InsufficientBytes {
        /// Requested bit length.
        len: usize,
        /// Bits available in the buffer.
        available: usize,
    },
}
