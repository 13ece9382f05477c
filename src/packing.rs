//! Bit-level addressing of packed samples within a scanline.
//!
//! A scanline is one filter-tag byte followed by `stride` bytes of packed
//! sample data. Pixel `x` occupies the half-open bit range
//! `[x * bpp, (x + 1) * bpp)` of the packed region, where `bpp` is
//! `bit_depth * samples_per_pixel`. The helpers here map that range onto the
//! scanline's byte span and move sample values in and out of it as big-endian
//! integers. No bounds checks happen at this level; the `x < width` contract
//! belongs to the caller.

/// Inclusive byte span `[start, end]` covering pixel `x` inside a scanline.
/// The leading filter byte occupies index 0, so the span is shifted by one.
fn byte_span(x: u32, bits_per_pixel: usize) -> (usize, usize) {
    let start_bit = x as usize * bits_per_pixel;
    let end_bit = start_bit + bits_per_pixel;
    (start_bit / 8 + 1, (end_bit - 1) / 8 + 1)
}

/// Bits of padding to the right of pixel `x`'s sample group within its span.
/// The same quantity is used symmetrically on read and write.
fn unused_bits_right(x: u32, bits_per_pixel: usize) -> usize {
    ((x as usize + 1) * bits_per_pixel) % 8
}

// Spans run up to 8 bytes (16-bit RGBA), so loads go through u128 to leave
// room for the mask shift without overflow.
fn sample_mask(bits_per_pixel: usize) -> u128 {
    (1u128 << bits_per_pixel) - 1
}

fn load_span(bytes: &[u8]) -> u128 {
    bytes
        .iter()
        .fold(0u128, |acc, &b| (acc << 8) | u128::from(b))
}

/// Extracts pixel `x`'s packed sample group from `scanline`.
pub(crate) fn read_sample(scanline: &[u8], x: u32, bits_per_pixel: usize) -> u64 {
    let (start, end) = byte_span(x, bits_per_pixel);
    let raw = load_span(&scanline[start..=end]);
    ((raw >> unused_bits_right(x, bits_per_pixel)) & sample_mask(bits_per_pixel)) as u64
}

/// Replaces pixel `x`'s packed sample group in `scanline`, truncating `value`
/// to `bits_per_pixel` bits.
pub(crate) fn write_sample(scanline: &mut [u8], x: u32, bits_per_pixel: usize, value: u64) {
    let (start, end) = byte_span(x, bits_per_pixel);
    let shift = unused_bits_right(x, bits_per_pixel);
    let mask = sample_mask(bits_per_pixel);

    let mut raw = load_span(&scanline[start..=end]);
    raw &= !(mask << shift);
    raw |= (u128::from(value) & mask) << shift;
    for pos in (start..=end).rev() {
        scanline[pos] = (raw & 0xFF) as u8;
        raw >>= 8;
    }
}
