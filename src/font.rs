//! The built-in hexadecimal glyphs, one 4x5 sprite per digit `0`-`F`.

/// Address of the glyph for `0`.
pub const FONT_BASE_ADDRESS: u16 = 0x050;

/// Number of bytes (rows) in each glyph.
pub const GLYPH_HEIGHT: u16 = 5;

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80  // F
];

/// Returns the address of the glyph for the low nibble of `digit`.
#[must_use]
pub fn glyph_address(digit: u8) -> u16 {
    FONT_BASE_ADDRESS + u16::from(digit & 0xF) * GLYPH_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_addresses() {
        assert_eq!(glyph_address(0x0), 0x050);
        assert_eq!(glyph_address(0xA), 0x082);
        assert_eq!(glyph_address(0xF), 0x09B);
    }

    #[test]
    fn font_fits_reserved_area() {
        let end = FONT_BASE_ADDRESS as usize + FONT.len();
        assert_eq!(end, 0x0A0, "Font does not end right before 0x0A0.");
    }
}
