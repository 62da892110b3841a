// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements the core of a Chip-8 virtual machine: memory, the
//! fetch-decode-execute engine, the hex keypad, and the two countdown timers.
//!
//! Everything that touches the outside world (windows, audio, wall-clock time)
//! is left to the frontend, which drives a [Chip8] through a [Scheduler].

pub mod audio;
pub mod cpu;
pub mod error;
pub mod keyboard;
pub mod mem;
pub mod scheduler;

pub use audio::{Mute, Speaker};
#[cfg(feature = "beep")]
pub use audio::Beeper;
pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    quirks::Quirks,
    Step, CPU,
};
pub use error::{Error, Result};
pub use keyboard::Keyboard;
pub use mem::{Mem, Region, Region::*, Screen};
pub use scheduler::{Clock, Scheduler};

use std::path::Path;

/// One Chip-8 session: a [CPU], its [Mem]ory, and its [Keyboard]
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chip8 {
    pub cpu: CPU,
    pub mem: Mem,
    pub keys: Keyboard,
}

impl Chip8 {
    /// Creates a new [Chip8] with `program` loaded at the start of the [Program] window
    ///
    /// Returns [Error::ProgramTooLarge] if the program doesn't fit.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let ch8 = Chip8::new(&[0x00, 0xe0])?;
    ///     assert_eq!(0x200, ch8.cpu.pc());
    ///     assert_eq!([0x00, 0xe0], ch8.mem.get_region(Program)[..2]);
    ///     assert!(Chip8::new(&[0; 0x4a1]).is_err());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn new(program: &[u8]) -> Result<Self> {
        Ok(Self {
            mem: Mem::new(program)?,
            ..Default::default()
        })
    }

    /// Reads a program from the file at `path`, and creates a new [Chip8] with it loaded
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(&std::fs::read(path)?)
    }

    /// Executes one instruction. See [CPU::tick]
    pub fn step(&mut self) -> Result<&mut Self> {
        self.cpu.tick(&mut self.mem, &self.keys)?;
        Ok(self)
    }

    /// Ticks the delay and sound timers once each
    pub fn tick_timers(&mut self, speaker: &mut impl Speaker) {
        self.cpu.tick_delay();
        self.cpu.tick_sound(speaker);
    }

    /// Reports whether the last instruction fetched could have touched the screen
    pub fn display_updated(&self) -> bool {
        self.cpu.display_updated()
    }
}

/// Common imports for chip8_vm
pub mod prelude {
    pub use super::{
        audio::*,
        cpu::{flags::Flags, instruction::disassembler::*, quirks::Quirks, CPU},
        error::Result,
        keyboard::Keyboard,
        mem::{Mem, Region::*, Screen},
        scheduler::*,
        Chip8,
    };
}
