//! # Packed-raster PNG-subset codec
//!
//! This crate contains a raster image buffer that stores pixel samples at any
//! of the PNG bit depths and color types, serializes itself to and from a
//! minimal PNG-compatible chunked byte stream, and supports integer Bresenham
//! line drawing directly into the packed pixel storage.
//!
//! It is deliberately not a general-purpose PNG library: the container format
//! recognizes exactly the `IHDR`, `IDAT` and `IEND` chunks, always writes
//! scanline filter tag 0 and passes tag bytes through unexamined on decode.
//! There is no interlacing, no palette handling and no color management.
//!
//! ```
//! use png_raster::{BitDepth, ColorType, RasterImage};
//!
//! let mut image = RasterImage::new(32, 32, BitDepth::One, ColorType::Grayscale);
//! image.draw_line(0, 0, 31, 31, 0);
//!
//! let bytes = png_raster::encode(&image);
//! let copy = png_raster::decode(&bytes).unwrap();
//! assert_eq!(copy.get_pixel(5, 5), image.get_pixel(5, 5));
//! ```

#![deny(unsafe_code)]

pub mod chunk;
mod common;
mod decoder;
mod draw;
mod encoder;
mod packing;
mod raster;

pub use common::{BitDepth, ColorType};
pub use decoder::{decode, DecodingError};
pub use encoder::{encode, write_to, SIGNATURE};
pub use raster::{OutOfRange, RasterImage};
