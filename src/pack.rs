//! Packed 15-bit BGR color encoding
//!
//! The target hardware stores a color as a little-endian halfword laid out
//! `0bbbbbgggggrrrrr`: one always-zero bit, then five bits each of blue,
//! green and red. Each channel is quantized with `floor(channel * 32 / 256)`,
//! so the low three bits of every 8-bit channel are dropped.

use crate::color::Color;

/// Mask for one 5-bit channel.
const CHANNEL_MASK: u16 = 0x1F;

/// Quantize an 8-bit channel down to 5 bits.
fn quantize(channel: u8) -> u16 {
    (channel as u16 * 32) / 256
}

/// Pack a color into its 15-bit BGR value. Alpha is ignored.
///
/// # Examples
///
/// ```
/// use spritec::color::Color;
/// use spritec::pack::pack_bgr15;
///
/// assert_eq!(pack_bgr15(Color::rgb(255, 255, 255)), 0x7FFF);
/// assert_eq!(pack_bgr15(Color::rgb(255, 0, 0)), 0x001F);
/// assert_eq!(pack_bgr15(Color::rgb(0, 0, 255)), 0x7C00);
/// ```
pub fn pack_bgr15(color: Color) -> u16 {
    (quantize(color.b) << 10) | (quantize(color.g) << 5) | quantize(color.r)
}

/// Recover an opaque color from a packed value.
///
/// Each 5-bit channel is shifted back up by three bits, so
/// `unpack_bgr15(pack_bgr15(c))` equals `c` with the low three bits of every
/// channel cleared. The unused top bit is ignored.
pub fn unpack_bgr15(value: u16) -> Color {
    let r = (value & CHANNEL_MASK) << 3;
    let g = ((value >> 5) & CHANNEL_MASK) << 3;
    let b = ((value >> 10) & CHANNEL_MASK) << 3;
    Color::rgb(r as u8, g as u8, b as u8)
}

/// Render a 16-bit value the way the C artifacts spell it: `0x` plus four
/// uppercase hex digits.
pub fn format_hex(value: u16) -> String {
    format!("0x{:04X}", value)
}

/// Pack a color and render it as a C hex literal.
pub fn packed_hex(color: Color) -> String {
    format_hex(pack_bgr15(color))
}
