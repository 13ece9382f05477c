//! Encoding a `RasterImage` into the chunked container stream.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::chunk;
use crate::raster::RasterImage;

/// The fixed 8-byte signature opening every container stream.
pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Encodes `image` into an in-memory container stream: signature, `IHDR`,
/// one `IDAT` holding the zlib-compressed scanlines, and an empty `IEND`.
pub fn encode(image: &RasterImage) -> Vec<u8> {
    let mut out = Vec::new();
    write_to(image, &mut out).expect("writing to a Vec cannot fail");
    out
}

/// Writes the encoded container stream to `w`.
pub fn write_to<W: Write>(image: &RasterImage, w: &mut W) -> io::Result<()> {
    w.write_all(&SIGNATURE)?;

    let mut ihdr = [0u8; 13];
    ihdr[..4].copy_from_slice(&image.width().to_be_bytes());
    ihdr[4..8].copy_from_slice(&image.height().to_be_bytes());
    ihdr[8] = image.bit_depth() as u8;
    ihdr[9] = image.color_type() as u8;
    // compression, filter and interlace methods are always 0
    chunk::encode_chunk(w, chunk::IHDR, &ihdr)?;

    let mut zenc = ZlibEncoder::new(Vec::new(), Compression::best());
    for y in 0..image.height() {
        zenc.write_all(image.scanline(y))?;
    }
    let idat = zenc.finish()?;
    chunk::encode_chunk(w, chunk::IDAT, &idat)?;

    chunk::encode_chunk(w, chunk::IEND, &[])
}

impl RasterImage {
    /// Encodes the image and writes it to a file in one blocking call.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        write_to(self, &mut w)?;
        w.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitDepth, ColorType};

    #[test]
    fn stream_layout() {
        let image = RasterImage::new(8, 2, BitDepth::One, ColorType::Grayscale);
        let bytes = encode(&image);

        assert_eq!(&bytes[..8], &SIGNATURE);
        // IHDR follows immediately, 13 data bytes
        assert_eq!(&bytes[8..12], &[0, 0, 0, 13]);
        assert_eq!(&bytes[12..16], b"IHDR");
        assert_eq!(&bytes[16..20], &[0, 0, 0, 8]); // width
        assert_eq!(&bytes[20..24], &[0, 0, 0, 2]); // height
        assert_eq!(bytes[24], 1); // bit depth
        assert_eq!(bytes[25], 0); // color type
        assert_eq!(&bytes[26..29], &[0, 0, 0]); // compression, filter, interlace
        // the stream ends with the empty IEND chunk
        assert_eq!(&bytes[bytes.len() - 12..bytes.len() - 8], &[0, 0, 0, 0]);
        assert_eq!(&bytes[bytes.len() - 8..bytes.len() - 4], b"IEND");
    }

    #[test]
    fn idat_decompresses_to_framed_scanlines() {
        use std::io::Read;

        let mut image = RasterImage::new(3, 2, BitDepth::Eight, ColorType::Grayscale);
        image.set_pixel(1, 0, 0x42).unwrap();
        let bytes = encode(&image);

        // locate the IDAT chunk by walking the frames
        let mut pos = 8;
        let idat = loop {
            let len = u32::from_be_bytes([
                bytes[pos],
                bytes[pos + 1],
                bytes[pos + 2],
                bytes[pos + 3],
            ]) as usize;
            let tag = &bytes[pos + 4..pos + 8];
            if tag == b"IDAT" {
                break &bytes[pos + 8..pos + 8 + len];
            }
            pos += 12 + len;
        };

        let mut raw = Vec::new();
        flate2::read::ZlibDecoder::new(idat)
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw, &[0x00, 0xFF, 0x42, 0xFF, 0x00, 0xFF, 0xFF, 0xFF]);
    }
}
