//! Text operator generation

use crate::document::Color;

/// Encode text as a PDF literal string for the Tj operator.
///
/// Characters are mapped to WinAnsiEncoding, which matches Latin-1 for the
/// printable range the built-in fonts cover. Anything outside that range has
/// no glyph in a base-14 font and is replaced with `?` (the normalizer is
/// expected to have removed such characters already).
pub fn encode_literal(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            '\x20'..='\x7e' => out.push(c as u8),
            '\u{a0}'..='\u{ff}' => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out.push(b')');
    out
}

/// Generate PDF operators for a single positioned text run
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to render already
/// encoded text at a specific position.
///
/// # Arguments
/// * `shown_text` - Encoded string operand, either literal `(...)` bytes or
///   a hex string `<...>` for CID fonts
/// * `resource_name` - Page font resource name (e.g., "F1")
/// * `x` - X coordinate in points (from left)
/// * `y` - Y coordinate in points (from bottom)
/// * `size` - Font size in points
/// * `color` - Text color
pub fn generate_text_operators(
    shown_text: &[u8],
    resource_name: &str,
    x: f64,
    y: f64,
    size: f32,
    color: Color,
) -> Vec<u8> {
    let mut ops = Vec::new();

    ops.extend_from_slice(b"BT\n");
    ops.extend_from_slice(format!("{} {} {} rg\n", color.r, color.g, color.b).as_bytes());
    ops.extend_from_slice(format!("/{resource_name} {size} Tf\n").as_bytes());
    ops.extend_from_slice(format!("{x} {y} Td\n").as_bytes());
    ops.extend_from_slice(shown_text);
    ops.extend_from_slice(b" Tj\nET\n");

    ops
}
