//! The raster image buffer and its pixel accessors.

use std::error;
use std::fmt;

use crate::common::{packed_stride, BitDepth, ColorType};
use crate::packing;

/// Row index outside the image, raised by the pixel accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// The offending row index.
    pub y: u32,
    /// Height of the image that rejected it.
    pub height: u32,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "row {} out of range for image of height {}",
            self.y, self.height
        )
    }
}

impl error::Error for OutOfRange {}

/// A packed raster image.
///
/// The pixel store is `height` scanlines, each exactly `stride + 1` bytes: one
/// filter-tag byte (always written 0 and passed through unexamined on decode)
/// followed by `stride` bytes of packed sample data. A freshly constructed
/// image is a blank white canvas, all sample bytes `0xFF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    bit_depth: BitDepth,
    color_type: ColorType,
    scanlines: Vec<Vec<u8>>,
}

impl RasterImage {
    /// Creates a blank canvas.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(width: u32, height: u32, bit_depth: BitDepth, color_type: ColorType) -> RasterImage {
        assert!(width > 0 && height > 0, "image dimensions must be positive");
        let stride = packed_stride(bit_depth, color_type, width);
        let scanlines = (0..height)
            .map(|_| {
                let mut line = vec![0xFF; stride + 1];
                line[0] = 0;
                line
            })
            .collect();
        RasterImage {
            width,
            height,
            bit_depth,
            color_type,
            scanlines,
        }
    }

    /// Assembles an image from already-framed scanlines. Decode-side only;
    /// every row must be `stride + 1` bytes for the given parameters.
    pub(crate) fn from_scanlines(
        width: u32,
        height: u32,
        bit_depth: BitDepth,
        color_type: ColorType,
        scanlines: Vec<Vec<u8>>,
    ) -> RasterImage {
        debug_assert_eq!(scanlines.len(), height as usize);
        RasterImage {
            width,
            height,
            bit_depth,
            color_type,
            scanlines,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    /// Number of samples composing one pixel, derived from the color type.
    pub fn samples_per_pixel(&self) -> usize {
        self.color_type.samples()
    }

    /// Bits occupied by one pixel's sample group.
    pub fn bits_per_pixel(&self) -> usize {
        self.bit_depth as usize * self.samples_per_pixel()
    }

    /// Bytes of packed sample data per scanline, excluding the filter byte.
    pub fn stride(&self) -> usize {
        packed_stride(self.bit_depth, self.color_type, self.width)
    }

    /// Raw bytes of row `y`, filter byte included.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not in `[0, height)`.
    pub fn scanline(&self, y: u32) -> &[u8] {
        &self.scanlines[y as usize]
    }

    /// Reads the packed sample group of the pixel at `(x, y)`.
    ///
    /// Fails with [`OutOfRange`] if `y` is outside `[0, height)`. `x` is a
    /// caller obligation and is deliberately not checked here: an `x` at or
    /// past `width` addresses whatever bytes its span lands on, and panics
    /// once that span leaves the scanline. The drawing API clips instead of
    /// relying on this contract.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<u64, OutOfRange> {
        let row = self.row(y)?;
        Ok(packing::read_sample(row, x, self.bits_per_pixel()))
    }

    /// Writes the packed sample group of the pixel at `(x, y)`.
    ///
    /// `value` is silently truncated to `bit_depth * samples_per_pixel` bits.
    /// Bounds contract as for [`get_pixel`](Self::get_pixel).
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u64) -> Result<(), OutOfRange> {
        let bits = self.bits_per_pixel();
        let height = self.height;
        let row = self
            .scanlines
            .get_mut(y as usize)
            .ok_or(OutOfRange { y, height })?;
        packing::write_sample(row, x, bits, value);
        Ok(())
    }

    fn row(&self, y: u32) -> Result<&[u8], OutOfRange> {
        self.scanlines
            .get(y as usize)
            .map(Vec::as_slice)
            .ok_or(OutOfRange {
                y,
                height: self.height,
            })
    }
}
