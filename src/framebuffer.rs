/// cells per row
pub const DISPLAY_WIDTH: usize = 64;
/// rows
pub const DISPLAY_HEIGHT: usize = 32;

/// # FrameBuffer
/// The 64x32 monochrome screen, one byte per pixel (0 or 1), addressed by
/// `row * DISPLAY_WIDTH + col`. Only `clear` and `draw_sprite` mutate it.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    cells: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            cells: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    /// every pixel off
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// pixel at (`col`, `row`), `None` when off-screen
    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        if col < DISPLAY_WIDTH && row < DISPLAY_HEIGHT {
            Some(self.cells[row * DISPLAY_WIDTH + col])
        } else {
            None
        }
    }

    /// the whole grid, row-major
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// the grid a row at a time
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(DISPLAY_WIDTH)
    }

    /// XOR `sprite` onto the screen with its top-left corner at (`x`, `y`).
    ///
    /// The origin is wrapped onto the screen first; the sprite itself is
    /// clipped at the right and bottom edges, never wrapped. Each byte of
    /// `sprite` is one row, most significant bit leftmost.
    ///
    /// Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let origin_x = usize::from(x) % DISPLAY_WIDTH;
        let origin_y = usize::from(y) % DISPLAY_HEIGHT;
        let mut collision = false;

        for (r, byte) in sprite.iter().enumerate() {
            let row = origin_y + r;
            if row >= DISPLAY_HEIGHT {
                break;
            }
            for b in 0..8 {
                let col = origin_x + b;
                if col >= DISPLAY_WIDTH {
                    break;
                }
                let bit = (byte >> (7 - b)) & 1;
                let cell = &mut self.cells[row * DISPLAY_WIDTH + col];
                if bit == 1 && *cell == 1 {
                    collision = true;
                }
                *cell ^= bit;
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&c| if c == 1 { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
