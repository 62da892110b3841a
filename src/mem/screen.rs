// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! The screen is 64x32 pixels at 1bpp, stored as 32 rows of 8 bytes.
//! It is only reachable through [Screen::clear], [Screen::snapshot], and
//! [Screen::draw], never through the memory windows.

use std::fmt::{Display, Formatter};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;
/// Width of one row of the screen, in bytes
pub const ROW_BYTES: usize = WIDTH / 8;

/// The 64x32 monochrome framebuffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    rows: [[u8; ROW_BYTES]; HEIGHT],
}

impl Screen {
    /// Clears the screen memory to 0
    pub fn clear(&mut self) {
        self.rows = [[0; ROW_BYTES]; HEIGHT];
    }

    /// Copies the whole screen out, row-major, 8 bytes per row
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let screen = Screen::default();
    /// assert_eq!([0; 256], screen.snapshot());
    /// ```
    pub fn snapshot(&self) -> [u8; ROW_BYTES * HEIGHT] {
        let mut out = [0; ROW_BYTES * HEIGHT];
        for (chunk, row) in out.chunks_exact_mut(ROW_BYTES).zip(self.rows.iter()) {
            chunk.copy_from_slice(row);
        }
        out
    }

    /// Gets the screen as a slice of rows
    pub fn rows(&self) -> &[[u8; ROW_BYTES]; HEIGHT] {
        &self.rows
    }

    /// Gets the state of the pixel at (x, y), wrapping around the edges
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        self.rows[y][x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// XORs a sprite onto the screen with its top-left corner at (x, y).
    ///
    /// Each sprite byte straddles two adjacent bytes of its row. Rows wrap
    /// from bottom to top, and bytes wrap from the right edge to the left.
    ///
    /// Returns true if any pixel which was set got cleared.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut screen = Screen::default();
    /// assert!(!screen.draw(60, 0, &[0xff]));
    /// // The sprite wrapped around to the left edge
    /// assert!(screen.pixel(63, 0) && screen.pixel(0, 0) && screen.pixel(3, 0));
    /// // Drawing it again erases it, and collides
    /// assert!(screen.draw(60, 0, &[0xff]));
    /// assert_eq!([0; 256], screen.snapshot());
    /// ```
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let low = (x as usize / 8) % ROW_BYTES;
        let high = (low + 1) % ROW_BYTES;
        let shift = x % 8;
        let mut collision = false;
        for (line, &byte) in sprite.iter().enumerate() {
            let row = &mut self.rows[(y as usize + line) % HEIGHT];
            let low_part = byte >> shift;
            let high_part = ((byte as u16) << (8 - shift)) as u8;
            // collisions are tested against the screen before it's touched
            if row[low] & low_part != 0 || row[high] & high_part != 0 {
                collision = true;
            }
            row[low] ^= low_part;
            row[high] ^= high_part;
        }
        collision
    }

    /// Prints the screen to stdout, using braille characters if available
    pub fn print(&self) {
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    if self.pixel(x, y) {
                        canvas.set(x as u32, y as u32);
                    }
                }
            }
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        print!("{self}");
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            write!(f, "{:02x}|", index)?;
            for byte in row {
                write!(
                    f,
                    "{}",
                    format!("{byte:08b}").replace('0', " ").replace('1', "█")
                )?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
