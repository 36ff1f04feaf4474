/// Minimal bitmap font for chart labels.
///
/// Covers digits, `-`, `:` and space, which is all a timestamp or a count
/// needs. Each glyph is 3×5 cells drawn at [`SCALE`] pixels per cell; any
/// other character advances like a space.
use image::{Rgb, RgbImage};

/// Pixels per glyph cell.
const SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;
/// Horizontal advance per character, including one blank cell.
const ADVANCE: u32 = (GLYPH_W + 1) * SCALE;

/// Rendered text height in pixels.
pub(crate) const TEXT_HEIGHT: u32 = GLYPH_H * SCALE;

/// Rows top to bottom; bit 2 is the leftmost cell.
fn glyph(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        _ => [0; 5],
    }
}

/// Width in pixels of `text` once drawn.
pub(crate) fn text_width(text: &str) -> u32 {
    match text.chars().count() as u32 {
        0 => 0,
        n => n * ADVANCE - SCALE,
    }
}

/// Draw `text` with its top-left corner at `(x, y)`, clipped to the image.
pub(crate) fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as u32 * ADVANCE;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                let px = origin_x + col * SCALE;
                let py = y + row as u32 * SCALE;
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        if px + dx < img.width() && py + dy < img.height() {
                            img.put_pixel(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
    }
}
