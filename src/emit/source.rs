//! `.c` artifact rendering
//!
//! Arrays follow a fixed column layout: every value is comma-terminated, a
//! line break plus tab follows each 8th value, and each 64th value is
//! followed by an extra blank line before the tab. No break follows the
//! final value.

use crate::pack::format_hex;

/// Values per output line.
const VALUES_PER_LINE: usize = 8;

/// Values per visual block (eight lines).
const VALUES_PER_BLOCK: usize = 64;

/// Minimum declared capacity of the bitmap array.
pub const BITMAP_CAPACITY: usize = 256;

/// Render one `const unsigned short` array declaration.
///
/// ```
/// use spritec::emit::render_array;
///
/// let text = render_array("dotBitmap", 256, &[0x7FFF]);
/// assert_eq!(
///     text,
///     "const unsigned short dotBitmap[256] __attribute__((aligned(4)))=\n{\n\t0x7FFF,\n};"
/// );
/// ```
pub fn render_array(name: &str, capacity: usize, values: &[u16]) -> String {
    // "0x1234," is 7 chars, plus breaks
    let mut out = String::with_capacity(64 + values.len() * 8);
    out.push_str("const unsigned short ");
    out.push_str(name);
    out.push_str(&format!("[{}] __attribute__((aligned(4)))=\n{{\n\t", capacity));

    for (i, &value) in values.iter().enumerate() {
        let count = i + 1;
        out.push_str(&format_hex(value));
        out.push(',');
        if count % VALUES_PER_LINE == 0 && count < values.len() {
            out.push('\n');
            if count % VALUES_PER_BLOCK == 0 {
                out.push_str("\n\t");
            } else {
                out.push('\t');
            }
        }
    }

    out.push_str("\n};");
    out
}

/// Render the full `.c` artifact: the `<name>Bitmap` array, followed by the
/// `<name>Pal` array when a palette is present.
///
/// The bitmap capacity is 256, or the value count when that is larger.
pub fn render_source(name: &str, values: &[u16], palette: Option<&[u16]>) -> String {
    let capacity = values.len().max(BITMAP_CAPACITY);
    let mut out = render_array(&format!("{}Bitmap", name), capacity, values);

    if let Some(palette) = palette {
        out.push_str("\n\n");
        out.push_str(&render_array(&format!("{}Pal", name), palette.len(), palette));
    }

    out
}
