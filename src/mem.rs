// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the Chip-8's address space
//!
//! It's made of two disjoint windows, the interpreter window (which holds the
//! font) and the program window, plus the call stack and the [Screen].
//! A span of memory is only valid if it lies entirely inside one window.

#[cfg(test)]
mod tests;

pub mod screen;
pub use screen::Screen;

use crate::error::{Error, Result};
use owo_colors::{OwoColorize, Style};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

type Adr = u16;

/// The interpreter window. The font lives at the bottom of it.
pub const INTERPRETER: Range<usize> = 0x000..0x200;
/// The program window. Programs are loaded at its start.
pub const PROGRAM: Range<usize> = 0x200..0x6a0;
/// Number of return addresses the call stack can hold
pub const STACK_DEPTH: usize = 16;
/// Address of the first font glyph
pub const FONT: Adr = 0x000;
/// Size of a font glyph, in bytes
pub const GLYPH_SIZE: Adr = 5;

/// Represents a named window in memory
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Interpreter memory (holds the font)
    Interpreter,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the range of addresses covered by this [Region]
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// assert_eq!(0x200..0x6a0, Program.range());
    /// ```
    pub fn range(self) -> Range<usize> {
        match self {
            Region::Interpreter => INTERPRETER,
            Region::Program => PROGRAM,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Interpreter => "Interpreter",
                Region::Program => "Program",
            }
        )
    }
}

/// A view into one window of [Mem] which implements [Display] as a hexdump
pub struct MemWindow<'a> {
    base: usize,
    mem: &'a [u8],
}

impl<'a> Display for MemWindow<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Green phosphor style formatting, for taste
        let term: Style = Style::new().bold().green().on_black();
        for (index, byte) in self.mem.iter().enumerate() {
            if index % 16 == 0 {
                write!(f, "{:>03x}{} ", (self.base + index).style(term), ":".style(term))?
            }
            write!(f, "{byte:02x}")?;
            write!(
                f,
                "{}",
                match index % 16 {
                    0xf => "\n",
                    0x7 => "  ",
                    _ if index % 2 == 1 => " ",
                    _ => "",
                }
            )?
        }
        Ok(())
    }
}

/// Stores the interpreter and program windows, the call stack, and the screen
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    interpreter: Vec<u8>,
    program: Vec<u8>,
    stack: [Adr; STACK_DEPTH],
    screen: Screen,
}

impl Mem {
    /// Constructs a new [Mem] with the font and the provided program loaded.
    ///
    /// Returns [Error::ProgramTooLarge] if the program won't fit.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let mem = Mem::new(&[0x00, 0xe0])?;
    ///     assert_eq!(0x00e0, mem.fetch(0x200)?);
    /// #   Ok(())
    /// # }
    /// ```
    pub fn new(program: &[u8]) -> Result<Self> {
        let mut mem = Mem::default();
        mem.load_program(program)?;
        Ok(mem)
    }

    /// Zeroes the program window, loads a program into it, and reloads the font
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut mem = Mem::default();
    /// // 0x4a1 bytes is one too many
    /// assert!(mem.load_program(&[0; 0x4a1]).is_err());
    /// ```
    pub fn load_program(&mut self, program: &[u8]) -> Result<&mut Self> {
        if program.len() > PROGRAM.len() {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                max: PROGRAM.len(),
            });
        }
        self.program.fill(0);
        self.program[..program.len()].copy_from_slice(program);
        self.load_charset();
        Ok(self)
    }

    /// Load the character set from src/mem/charset.bin into the interpreter window
    fn load_charset(&mut self) {
        let charset = include_bytes!("mem/charset.bin");
        let font = FONT as usize;
        self.interpreter[font..font + charset.len()].copy_from_slice(charset);
    }

    /// Reads the big-endian instruction word at `pc`.
    ///
    /// Both bytes must lie in the program window, or this returns [Error::InvalidAddress].
    pub fn fetch(&self, pc: Adr) -> Result<u16> {
        let pc = pc as usize;
        match (PROGRAM.contains(&pc), PROGRAM.contains(&(pc + 1))) {
            (true, true) => {
                let pc = pc - PROGRAM.start;
                Ok(u16::from_be_bytes([self.program[pc], self.program[pc + 1]]))
            }
            _ => Err(Error::InvalidAddress { addr: pc, len: 2 }),
        }
    }

    /// Finds the [Region] and window-relative range of the span `addr..addr+len`
    fn locate(addr: usize, len: usize) -> Option<(Region, Range<usize>)> {
        let end = addr.checked_add(len)?;
        [Region::Interpreter, Region::Program]
            .into_iter()
            .find(|region| {
                let range = region.range();
                addr >= range.start && end <= range.end
            })
            .map(|region| {
                let start = addr - region.range().start;
                (region, start..start + len)
            })
    }

    /// Copies `buf.len()` bytes starting at `addr` into `buf`.
    ///
    /// The span must lie entirely inside the interpreter window or
    /// entirely inside the program window.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let mem = Mem::default();
    ///     let mut glyph = [0; 5];
    ///     // The glyph for `0`
    ///     mem.read(0x000u16, &mut glyph)?;
    ///     assert_eq!([0xf0, 0x90, 0x90, 0x90, 0xf0], glyph);
    ///     // Spans can't straddle the two windows
    ///     assert!(mem.read(0x1ffu16, &mut [0; 2]).is_err());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn read(&self, addr: impl Into<usize>, buf: &mut [u8]) -> Result<()> {
        let addr = addr.into();
        let (region, range) = Self::locate(addr, buf.len()).ok_or(Error::InvalidAddress {
            addr,
            len: buf.len(),
        })?;
        buf.copy_from_slice(&self.get_region(region)[range]);
        Ok(())
    }

    /// Copies `data` into memory starting at `addr`.
    ///
    /// Only the program window is writable.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let mut mem = Mem::default();
    ///     mem.write(0x300u16, b"ABC")?;
    ///     // The font can't be overwritten
    ///     assert!(mem.write(0x000u16, b"ABC").is_err());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn write(&mut self, addr: impl Into<usize>, data: &[u8]) -> Result<()> {
        let addr = addr.into();
        match Self::locate(addr, data.len()) {
            Some((Region::Program, range)) => {
                self.program[range].copy_from_slice(data);
                Ok(())
            }
            _ => Err(Error::InvalidAddress {
                addr,
                len: data.len(),
            }),
        }
    }

    /// Writes a single byte to `addr`. See [Mem::write].
    pub fn write_u8(&mut self, addr: impl Into<usize>, value: u8) -> Result<()> {
        self.write(addr, &[value])
    }

    /// Reads the return address in stack slot `sp`
    pub fn stack_read(&self, sp: usize) -> Result<Adr> {
        self.stack
            .get(sp)
            .copied()
            .ok_or(Error::InvalidStackPointer { sp })
    }

    /// Stores a return address in stack slot `sp`.
    ///
    /// Returns [Error::StackOverflow] if the slot does not exist.
    pub fn stack_write(&mut self, sp: usize, value: Adr) -> Result<()> {
        let slot = self
            .stack
            .get_mut(sp)
            .ok_or(Error::StackOverflow { sp })?;
        *slot = value;
        Ok(())
    }

    /// Gets the [Screen]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the [Screen], mutably
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Gets a slice of a named [Region] of memory
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mem = Mem::default();
    /// assert_eq!(0x4a0, mem.get_region(Program).len());
    /// assert_eq!(0x200, mem.get_region(Interpreter).len());
    /// ```
    pub fn get_region(&self, name: Region) -> &[u8] {
        match name {
            Region::Interpreter => &self.interpreter,
            Region::Program => &self.program,
        }
    }

    /// Creates a hexdump view of a [Region], which implements [Display]
    pub fn window(&self, name: Region) -> MemWindow {
        MemWindow {
            base: name.range().start,
            mem: self.get_region(name),
        }
    }
}

impl Default for Mem {
    /// Constructs a [Mem] with the font loaded and an empty program
    fn default() -> Self {
        let mut mem = Mem {
            interpreter: vec![0; INTERPRETER.len()],
            program: vec![0; PROGRAM.len()],
            stack: [0; STACK_DEPTH],
            screen: Screen::default(),
        };
        mem.load_charset();
        mem
    }
}

impl Display for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for region in [Region::Interpreter, Region::Program] {
            writeln!(f, "[{region}]\n{}", self.window(region))?;
        }
        Ok(())
    }
}
