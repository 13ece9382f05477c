//! Decoding a container stream back into a `RasterImage`.

use std::error;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::ZlibDecoder;

use crate::chunk::{self, ChunkType};
use crate::common::{packed_stride, BitDepth, ColorType};
use crate::encoder::SIGNATURE;
use crate::raster::RasterImage;

/// Errors raised while decoding a container stream.
///
/// Malformed input always surfaces as one of these variants; decoding never
/// hands back a partially populated image.
#[derive(Debug)]
pub enum DecodingError {
    /// The stream does not begin with the 8-byte signature.
    InvalidSignature,
    /// A chunk's stored CRC-32 disagrees with the one computed over its tag
    /// and data.
    ChecksumMismatch {
        chunk: ChunkType,
        stored: u32,
        computed: u32,
    },
    /// The stream ended mid-chunk, the header never arrived, or the
    /// decompressed payload does not split into `height` whole scanlines.
    TruncatedData,
    /// The header carries a bit depth or color type outside the recognized
    /// sets.
    UnsupportedConfiguration { bit_depth: u8, color_type: u8 },
    /// The header declares a zero width.
    ZeroWidth,
    /// The header declares a zero height.
    ZeroHeight,
    /// The compressed image data is corrupt.
    DecompressionFailure,
    /// An I/O failure while reading a file.
    IoError(io::Error),
}

impl fmt::Display for DecodingError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidSignature => write!(fmt, "stream does not begin with the PNG signature"),
            Self::ChecksumMismatch {
                chunk,
                stored,
                computed,
            } => write!(
                fmt,
                "CRC-32 mismatch in {:?} chunk: stored {:08x}, computed {:08x}",
                chunk, stored, computed
            ),
            Self::TruncatedData => write!(
                fmt,
                "image data is truncated or does not align to whole scanlines"
            ),
            Self::UnsupportedConfiguration {
                bit_depth,
                color_type,
            } => write!(
                fmt,
                "unsupported bit depth {} or color type {}",
                bit_depth, color_type
            ),
            Self::ZeroWidth => write!(fmt, "Image width must be greater than zero"),
            Self::ZeroHeight => write!(fmt, "Image height must be greater than zero"),
            Self::DecompressionFailure => write!(fmt, "corrupt compressed image data"),
            Self::IoError(err) => write!(fmt, "{}", err),
        }
    }
}

impl error::Error for DecodingError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodingError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DecodingError {
    fn from(err: io::Error) -> Self {
        Self::IoError(err)
    }
}

/// Decodes a whole container stream into a `RasterImage`.
///
/// Chunks are walked until an `IEND` tag or the end of the stream. Every
/// chunk's CRC is verified. `IDAT` payloads may repeat and are concatenated
/// in encounter order before the single decompression pass. Unknown chunk
/// tags are consumed and ignored.
pub fn decode(bytes: &[u8]) -> Result<RasterImage, DecodingError> {
    let mut cursor = bytes
        .strip_prefix(&SIGNATURE)
        .ok_or(DecodingError::InvalidSignature)?;

    let mut header = None;
    let mut zlib_data = Vec::new();

    while !cursor.is_empty() {
        let length = take_u32(&mut cursor)? as usize;
        let tag = take(&mut cursor, 4)?;
        let tag = ChunkType([tag[0], tag[1], tag[2], tag[3]]);
        let data = take(&mut cursor, length)?;
        let stored = take_u32(&mut cursor)?;

        let computed = chunk::checksum(tag, data);
        if computed != stored {
            return Err(DecodingError::ChecksumMismatch {
                chunk: tag,
                stored,
                computed,
            });
        }

        match tag {
            chunk::IHDR => header = Some(parse_header(data)?),
            chunk::IDAT => zlib_data.extend_from_slice(data),
            chunk::IEND => break,
            _ => {}
        }
    }

    let (width, height, bit_depth, color_type) = header.ok_or(DecodingError::TruncatedData)?;

    let mut raw = Vec::new();
    ZlibDecoder::new(zlib_data.as_slice())
        .read_to_end(&mut raw)
        .map_err(|_| DecodingError::DecompressionFailure)?;

    // The sample count comes from the freshly parsed color type, and the
    // stride from that; only then can the payload be split into rows.
    let row_len = packed_stride(bit_depth, color_type, width) + 1;
    if raw.len() % row_len != 0 || raw.len() / row_len < height as usize {
        return Err(DecodingError::TruncatedData);
    }
    let scanlines = raw
        .chunks_exact(row_len)
        .take(height as usize)
        .map(<[u8]>::to_vec)
        .collect();
    Ok(RasterImage::from_scanlines(
        width, height, bit_depth, color_type, scanlines,
    ))
}

impl RasterImage {
    /// Reads and decodes a container file in one blocking call.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<RasterImage, DecodingError> {
        let bytes = fs::read(path)?;
        decode(&bytes)
    }
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> Result<&'a [u8], DecodingError> {
    if cursor.len() < n {
        return Err(DecodingError::TruncatedData);
    }
    let (head, tail) = cursor.split_at(n);
    *cursor = tail;
    Ok(head)
}

fn take_u32(cursor: &mut &[u8]) -> Result<u32, DecodingError> {
    let bytes = take(cursor, 4)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn parse_header(data: &[u8]) -> Result<(u32, u32, BitDepth, ColorType), DecodingError> {
    if data.len() < 13 {
        return Err(DecodingError::TruncatedData);
    }
    let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if width == 0 {
        return Err(DecodingError::ZeroWidth);
    }
    if height == 0 {
        return Err(DecodingError::ZeroHeight);
    }
    match (BitDepth::from_u8(data[8]), ColorType::from_u8(data[9])) {
        (Some(bit_depth), Some(color_type)) => Ok((width, height, bit_depth, color_type)),
        _ => Err(DecodingError::UnsupportedConfiguration {
            bit_depth: data[8],
            color_type: data[9],
        }),
    }
}
