//! `.h` artifact rendering

use crate::models::Dimensions;

/// Render the header for an image named `name`.
///
/// `palette_len` is the number of palette colors; `None` omits the palette
/// declarations entirely. Lengths follow the toolchain convention: the
/// `PalLen` macro counts bytes, the array counts halfwords.
///
/// ```
/// use spritec::emit::render_header;
/// use spritec::models::Dimensions;
///
/// let header = render_header("foo", Dimensions::new(16, 16).unwrap(), Some(16));
/// assert!(header.starts_with("#ifndef FOO_H\n#define FOO_H\n"));
/// assert!(header.contains("#define fooTilesLen 256\n"));
/// assert!(header.contains("#define fooPalLen 32\n"));
/// ```
pub fn render_header(name: &str, dimensions: Dimensions, palette_len: Option<usize>) -> String {
    let guard = format!("{}_H", name.to_uppercase());
    let area = dimensions.area();

    let mut out = format!("#ifndef {guard}\n#define {guard}\n\n");
    out.push_str(&format!("#define {}TilesLen {}\n", name, area));
    out.push_str(&format!("extern const unsigned short {}Tiles[{}];\n\n", name, area / 2));

    if let Some(len) = palette_len {
        out.push_str(&format!("#define {}PalLen {}\n", name, len * 2));
        out.push_str(&format!("extern const unsigned short {}Pal[{}];\n\n", name, len));
    }

    out.push_str("#endif");
    out
}
