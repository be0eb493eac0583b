//! Pixel Text
//!
//! 5x7 bitmap glyphs for overlay labels, emitted as draw-list rects. Only the
//! uppercase letters the curve editor titles use are defined; anything else
//! renders as a blank cell.

use glam::Vec2;

use super::draw_list::DrawList;

/// Cell advance in font pixels (5 wide + 1 spacing).
const CELL_WIDTH: f32 = 6.0;
const CELL_HEIGHT: f32 = 7.0;

// Each row is 5 bits, MSB on the left. 1 = pixel on.
fn glyph_rows(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        _ => [0; 7],
    }
}

/// Rendered size of `text` at `scale` screen pixels per font pixel.
pub fn text_size(text: &str, scale: f32) -> Vec2 {
    Vec2::new(
        text.chars().count() as f32 * CELL_WIDTH * scale,
        CELL_HEIGHT * scale,
    )
}

/// Push `text` with its top-left corner at `origin`.
pub fn push_text(list: &mut DrawList, text: &str, origin: Vec2, scale: f32, color: [f32; 4]) {
    for (index, c) in text.chars().enumerate() {
        let cell_x = origin.x + index as f32 * CELL_WIDTH * scale;
        for (row, &bits) in glyph_rows(c).iter().enumerate() {
            for col in 0..5u32 {
                if (bits >> (4 - col)) & 1 == 1 {
                    let min = Vec2::new(
                        cell_x + col as f32 * scale,
                        origin.y + row as f32 * scale,
                    );
                    list.rect(min, min + Vec2::splat(scale), color);
                }
            }
        }
    }
}
