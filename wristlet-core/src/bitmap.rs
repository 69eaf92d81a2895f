//! Bitmap resource header
//!
//! Image resources are stored as a 12-byte little-endian header followed by
//! 1-bit pixel rows:
//!
//! ```text
//! 0   row stride (u16, bytes per row)
//! 2   info flags (u16)
//! 4   origin x (i16, ignored)
//! 6   origin y (i16, ignored)
//! 8   width (i16)
//! 10  height (i16)
//! 12  pixel data
//! ```

use crate::geometry::{GRect, GSize};

/// Size of the bitmap header in bytes
pub const BITMAP_HEADER_SIZE: usize = 12;

/// Errors from bitmap parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitmapError {
    /// Fewer than 12 bytes
    HeaderTooShort,
    /// Negative width/height, or a stride too narrow for the width
    InvalidDimensions,
    /// Pixel data shorter than stride × height
    Truncated,
}

/// Parsed bitmap header
///
/// Holds geometry only; pixel data stays in the caller's buffer, starting at
/// [`BITMAP_HEADER_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitmapInfo {
    pub row_size_bytes: u16,
    pub info_flags: u16,
    /// Origin is always (0, 0)
    pub bounds: GRect,
}

impl BitmapInfo {
    /// Parse the header of a raw bitmap resource
    pub fn parse(data: &[u8]) -> Result<Self, BitmapError> {
        let header = data
            .get(..BITMAP_HEADER_SIZE)
            .ok_or(BitmapError::HeaderTooShort)?;

        let row_size_bytes = u16::from_le_bytes([header[0], header[1]]);
        let info_flags = u16::from_le_bytes([header[2], header[3]]);
        let width = i16::from_le_bytes([header[8], header[9]]);
        let height = i16::from_le_bytes([header[10], header[11]]);

        if width < 0 || height < 0 || (row_size_bytes as usize) * 8 < width as usize {
            return Err(BitmapError::InvalidDimensions);
        }

        let info = Self {
            row_size_bytes,
            info_flags,
            bounds: GRect::new(0, 0, width, height),
        };

        if data.len() - BITMAP_HEADER_SIZE < info.pixel_bytes() {
            return Err(BitmapError::Truncated);
        }

        Ok(info)
    }

    pub fn size(&self) -> GSize {
        self.bounds.size
    }

    /// Number of pixel bytes following the header
    pub fn pixel_bytes(&self) -> usize {
        self.row_size_bytes as usize * self.bounds.size.h as usize
    }

    /// Total resource size (header + pixels)
    pub fn total_bytes(&self) -> usize {
        BITMAP_HEADER_SIZE + self.pixel_bytes()
    }

    /// Pixel rows of a resource this header was parsed from
    pub fn pixels<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(BITMAP_HEADER_SIZE..self.total_bytes())
    }

    /// Write a header for a `width` × `height` 1-bit image
    ///
    /// Rows are padded to a multiple of 4 bytes. Returns the header and the
    /// number of pixel bytes that must follow it.
    pub fn header_for(width: i16, height: i16) -> ([u8; BITMAP_HEADER_SIZE], usize) {
        let width = width.max(0);
        let height = height.max(0);
        let stride = ((width as u16 + 31) / 32) * 4;

        let mut header = [0u8; BITMAP_HEADER_SIZE];
        header[0..2].copy_from_slice(&stride.to_le_bytes());
        header[8..10].copy_from_slice(&width.to_le_bytes());
        header[10..12].copy_from_slice(&height.to_le_bytes());
        (header, stride as usize * height as usize)
    }
}
