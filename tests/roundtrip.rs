//! End-to-end container stream tests: round-trips, corruption and framing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use png_raster::chunk::{self, ChunkType};
use png_raster::{decode, encode, BitDepth, ColorType, DecodingError, RasterImage};

const DEPTHS: [BitDepth; 5] = [
    BitDepth::One,
    BitDepth::Two,
    BitDepth::Four,
    BitDepth::Eight,
    BitDepth::Sixteen,
];

const COLORS: [ColorType; 5] = [
    ColorType::Grayscale,
    ColorType::Rgb,
    ColorType::Indexed,
    ColorType::GrayscaleAlpha,
    ColorType::Rgba,
];

/// Returns `(data_start, data_len)` of the first chunk with `tag`.
fn find_chunk(bytes: &[u8], tag: &[u8; 4]) -> (usize, usize) {
    let mut pos = 8;
    while pos + 8 <= bytes.len() {
        let len =
            u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
                as usize;
        if &bytes[pos + 4..pos + 8] == tag {
            return (pos + 8, len);
        }
        pos += 12 + len;
    }
    panic!("chunk {:?} not found", tag);
}

fn framed(tag: ChunkType, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    chunk::encode_chunk(&mut out, tag, data).unwrap();
    out
}

fn zlib(data: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut enc = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

#[test]
fn round_trip_preserves_every_configuration() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for depth in DEPTHS {
        for color in COLORS {
            let mut image = RasterImage::new(13, 7, depth, color);
            for _ in 0..40 {
                let x = rng.gen_range(0..13);
                let y = rng.gen_range(0..7);
                image.set_pixel(x, y, rng.gen()).unwrap();
            }

            let copy = decode(&encode(&image)).unwrap();
            assert_eq!(copy.width(), 13);
            assert_eq!(copy.height(), 7);
            assert_eq!(copy.bit_depth(), depth);
            assert_eq!(copy.color_type(), color);
            for y in 0..7 {
                assert_eq!(
                    copy.scanline(y),
                    image.scanline(y),
                    "scanline {} differs for {:?}/{:?}",
                    y,
                    depth,
                    color
                );
            }
        }
    }
}

#[test]
fn round_trip_of_a_single_pixel_image() {
    let mut image = RasterImage::new(1, 1, BitDepth::Sixteen, ColorType::Rgba);
    image.set_pixel(0, 0, 0x0123_4567_89AB_CDEF).unwrap();
    let copy = decode(&encode(&image)).unwrap();
    assert_eq!(copy, image);
}

#[test]
fn round_trip_of_drawn_lines() {
    let mut image = RasterImage::new(64, 64, BitDepth::One, ColorType::Grayscale);
    image.draw_line(0, 0, 63, 63, 0);
    image.draw_line(63, 0, 0, 63, 0);
    image.draw_line(-5, 32, 70, 32, 0);
    let copy = decode(&encode(&image)).unwrap();
    assert_eq!(copy, image);
}

#[test]
fn tampered_idat_fails_the_checksum() {
    let mut image = RasterImage::new(16, 16, BitDepth::Eight, ColorType::Grayscale);
    image.draw_line(0, 0, 15, 15, 0);
    let mut bytes = encode(&image);

    let (start, len) = find_chunk(&bytes, b"IDAT");
    bytes[start + len / 2] ^= 0x01;

    assert!(matches!(
        decode(&bytes),
        Err(DecodingError::ChecksumMismatch { .. })
    ));
}

#[test]
fn unknown_chunks_are_skipped() {
    let image = RasterImage::new(4, 4, BitDepth::Two, ColorType::Grayscale);
    let bytes = encode(&image);

    // splice an unrecognized chunk between IHDR and IDAT
    let (ihdr_start, ihdr_len) = find_chunk(&bytes, b"IHDR");
    let ihdr_end = ihdr_start + ihdr_len + 4;
    let mut spliced = bytes[..ihdr_end].to_vec();
    spliced.extend_from_slice(&framed(ChunkType(*b"teXt"), b"opaque payload"));
    spliced.extend_from_slice(&bytes[ihdr_end..]);

    assert_eq!(decode(&spliced).unwrap(), image);
}

#[test]
fn multiple_idat_chunks_concatenate_in_order() {
    let mut image = RasterImage::new(9, 5, BitDepth::Four, ColorType::Rgb);
    image.draw_line(0, 0, 8, 4, 0);
    let bytes = encode(&image);

    let (start, len) = find_chunk(&bytes, b"IDAT");
    let payload = &bytes[start..start + len];
    let (front, back) = payload.split_at(len / 2);

    let mut split = bytes[..start - 8].to_vec();
    split.extend_from_slice(&framed(chunk::IDAT, front));
    split.extend_from_slice(&framed(chunk::IDAT, back));
    split.extend_from_slice(&framed(chunk::IEND, &[]));

    assert_eq!(decode(&split).unwrap(), image);
}

#[test]
fn misaligned_payload_is_truncated_data() {
    // 8x2 grayscale at depth 8 frames rows of 9 bytes
    let header = {
        let image = RasterImage::new(8, 2, BitDepth::Eight, ColorType::Grayscale);
        let bytes = encode(&image);
        let (start, len) = find_chunk(&bytes, b"IHDR");
        bytes[..start + len + 4].to_vec()
    };

    // 17 bytes is not a multiple of 9
    let mut bytes = header.clone();
    bytes.extend_from_slice(&framed(chunk::IDAT, &zlib(&[0u8; 17])));
    bytes.extend_from_slice(&framed(chunk::IEND, &[]));
    assert!(matches!(decode(&bytes), Err(DecodingError::TruncatedData)));

    // one whole row is still one short of the declared height
    let mut bytes = header;
    bytes.extend_from_slice(&framed(chunk::IDAT, &zlib(&[0u8; 9])));
    bytes.extend_from_slice(&framed(chunk::IEND, &[]));
    assert!(matches!(decode(&bytes), Err(DecodingError::TruncatedData)));
}

#[test]
fn save_and_open_round_trip_through_a_file() {
    let mut image = RasterImage::new(10, 10, BitDepth::One, ColorType::Grayscale);
    image.draw_line(0, 9, 9, 0, 0);

    let path = std::env::temp_dir().join("png_raster_roundtrip_test.png");
    image.save(&path).unwrap();
    let copy = RasterImage::open(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(copy, image);
}
