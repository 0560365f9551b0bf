//! The 64x32 monochrome framebuffer.

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

const SPRITE_WIDTH: usize = 8;

/// Row-major grid of pixel states, `true` meaning lit.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT]
}

impl Framebuffer {
    #[must_use]
    pub fn new() -> Framebuffer {
        Framebuffer { pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT] }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// Returns the state of the pixel at column `x`, row `y`, or `false` off screen.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels.get(y).and_then(|row| row.get(x)).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn rows(&self) -> &[[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT] {
        &self.pixels
    }

    /// Iterates the `(x, y)` coordinates of every lit pixel.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter(|&(_, &lit)| lit).map(move |(x, _)| (x, y))
        })
    }

    /// XORs `sprite` onto the screen with its top left corner at (`x`, `y`).
    /// The origin wraps onto the screen; anything past the right or bottom edge is clipped.
    /// Returns whether a lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let x = x % DISPLAY_WIDTH;
        let y = y % DISPLAY_HEIGHT;
        let mut collision = false;

        for (&row, screen_row) in sprite.iter().zip(self.pixels[y..].iter_mut()) {
            for (bit, pixel) in screen_row[x..].iter_mut().take(SPRITE_WIDTH).enumerate() {
                if row & (0x80u8 >> bit) != 0 {
                    collision |= *pixel;
                    *pixel ^= true;
                }
            }
        }

        collision
    }

    /// Returns how many rows of a sprite drawn at row `y` are visible.
    #[must_use]
    pub fn visible_rows(y: usize, height: usize) -> usize {
        height.min(DISPLAY_HEIGHT - y % DISPLAY_HEIGHT)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new()
    }
}
