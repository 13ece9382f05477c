//! Chunk types and framing
use core::fmt;
use std::io::{self, Write};

/// Four-byte ASCII tag naming a chunk's kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

/// Image header
pub const IHDR: ChunkType = ChunkType([b'I', b'H', b'D', b'R']);
/// Image data
pub const IDAT: ChunkType = ChunkType([b'I', b'D', b'A', b'T']);
/// Image trailer
pub const IEND: ChunkType = ChunkType([b'I', b'E', b'N', b'D']);

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &c in &self.0[..] {
            write!(f, "{}", char::from(c).escape_debug())?;
        }
        Ok(())
    }
}

/// CRC-32 over a chunk's tag and data, as stored in its trailer.
pub fn checksum(chunk: ChunkType, data: &[u8]) -> u32 {
    let mut crc = crc32fast::Hasher::new();
    crc.update(&chunk.0);
    crc.update(data);
    crc.finalize()
}

/// Writes one framed chunk: length, tag, data, CRC-32 over tag and data.
pub fn encode_chunk<W: Write>(w: &mut W, chunk: ChunkType, data: &[u8]) -> io::Result<()> {
    w.write_all(&(data.len() as u32).to_be_bytes())?;
    w.write_all(&chunk.0)?;
    w.write_all(data)?;
    w.write_all(&checksum(chunk, data).to_be_bytes())
}
