// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    quirks::Quirks,
};
use crate::{
    audio::Speaker,
    error::{Error, Result},
    keyboard::Keyboard,
    mem::{Mem, PROGRAM},
};
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Size of one instruction, in bytes
pub const INSTRUCTION_WIDTH: Adr = 2;

/// How far the program counter moves once an instruction completes,
/// in units of [INSTRUCTION_WIDTH]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// The instruction already set pc (or wants to run again)
    Stay = 0,
    /// Continue to the next instruction
    Next = 1,
    /// Skip the next instruction
    Skip = 2,
}

impl Step {
    /// Skips the next instruction if `cond` holds
    #[inline(always)]
    pub fn skip_if(cond: bool) -> Self {
        if cond {
            Step::Skip
        } else {
            Step::Next
        }
    }
}

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], debug mode, and pause.
    pub flags: Flags,
    // registers
    v: [u8; 16],
    i: Adr,
    delay: u8,
    sound: u8,
    pc: Adr,
    sp: u8,
    // Execution data
    word: u16,
    cycle: usize,
    faults: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the provided [Flags]
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let cpu = CPU::new(Flags {
    ///     debug: true,
    ///     ..Default::default()
    /// });
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new(flags: Flags) -> Self {
        CPU {
            flags,
            ..Default::default()
        }
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0x41).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the number of return addresses on the stack
    pub fn sp(&self) -> usize {
        self.sp as usize
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the number of instructions the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the number of instructions which faulted
    pub fn faults(&self) -> usize {
        self.faults
    }

    /// Gets the most recently fetched instruction word
    pub fn word(&self) -> u16 {
        self.word
    }

    /// Reports whether the last instruction fetched could have touched the screen
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let mut ch8 = Chip8::new(&[0xd0, 0x05, 0x00, 0xe0])?;
    ///     ch8.step()?;
    ///     assert!(ch8.cpu.display_updated());
    ///     // cls isn't a draw
    ///     ch8.step()?;
    ///     assert!(!ch8.cpu.display_updated());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn display_updated(&self) -> bool {
        instruction::codec::i(self.word) == 0xd
    }

    /// Resets the registers, stack pointer, program counter, and counters.
    ///
    /// Does not touch [Flags], or [Mem].
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0xa, 0xbc).unwrap();
    /// cpu.reset();
    /// assert_eq!(cpu, CPU::default());
    /// ```
    pub fn reset(&mut self) {
        *self = CPU {
            flags: self.flags.clone(),
            disassembler: self.disassembler,
            ..Default::default()
        }
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::tick], this returns [Error::InvalidAddress]
    /// if the instruction can't be fetched.
    ///
    /// NOTE: does not tick the timers
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let mut cpu = CPU::default();
    ///     let mut mem = Mem::new(&[
    ///         0x00, 0xe0, // cls
    ///         0x12, 0x02, // jump 0x202 (pc)
    ///     ])?;
    ///     cpu.flags.pause = true;
    ///     cpu.singlestep(&mut mem, &Keyboard::default())?;
    ///     assert_eq!(0x202, cpu.pc());
    ///     assert_eq!(1, cpu.cycle());
    ///     assert!(cpu.flags.pause);
    /// #   Ok(())
    /// # }
    /// ```
    pub fn singlestep(&mut self, mem: &mut Mem, keys: &Keyboard) -> Result<&mut Self> {
        self.flags.pause = false;
        let result = self.tick(mem, keys).map(|_| ());
        self.flags.pause = true;
        result?;
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Returns [Error::InvalidAddress] if the instruction at `pc` can't be fetched.
    /// When that happens nothing changes, and the next tick tries the same fetch.
    ///
    /// Every other error is an instruction fault: it's reported on stderr,
    /// counted, and pc moves on to the next instruction.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let mut cpu = CPU::default();
    ///     let mut mem = Mem::new(&[
    ///         0xff, 0xff, // invalid!
    ///         0x12, 0x02, // jump 0x202 (pc)
    ///     ])?;
    ///     let keys = Keyboard::default();
    ///     cpu.tick(&mut mem, &keys)?;
    ///     assert_eq!(0x202, cpu.pc());
    ///     assert_eq!(1, cpu.faults());
    ///     cpu.tick(&mut mem, &keys)?;
    ///     assert_eq!(0x202, cpu.pc());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn tick(&mut self, mem: &mut Mem, keys: &Keyboard) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.pause {
            return Ok(self);
        }
        // fetch opcode
        let word = mem.fetch(self.pc)?;
        self.word = word;
        self.cycle += 1;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                self.pc,
                self.disassembler.once(word)
            );
        }

        // decode and execute opcode
        match Insn::try_from(word).and_then(|insn| self.execute(mem, keys, insn)) {
            Ok(step) => {
                self.pc = self
                    .pc
                    .wrapping_add(INSTRUCTION_WIDTH * step as Adr);
            }
            Err(e) => {
                self.faults += 1;
                std::eprintln!(
                    "{}",
                    format_args!("{:03x}: {e} [{word:04x}]", self.pc).bold().red()
                );
                self.pc = self.pc.wrapping_add(INSTRUCTION_WIDTH);
            }
        }
        Ok(self)
    }

    /// Ticks the delay timer, if it's running
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut cpu = CPU::default();
    /// cpu.tick_delay();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn tick_delay(&mut self) {
        self.delay = self.delay.saturating_sub(1);
    }

    /// Ticks the sound timer, if it's running, pulsing the [Speaker] first.
    ///
    /// The speaker is silenced when the timer runs out.
    pub fn tick_sound(&mut self, speaker: &mut impl Speaker) {
        if self.sound > 0 {
            speaker.pulse();
            self.sound -= 1;
            if self.sound == 0 {
                speaker.silence();
            }
        }
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0, FLT: 0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}, FLT: {}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
            self.faults,
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("pc", &self.pc)
            .field("sp", &self.sp)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("word", &self.word)
            .field("cycle", &self.cycle)
            .field("faults", &self.faults)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults and debug mode OFF
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | pc     |`0x0200` | Start of the program window
    /// | sp     |`0x00`   | No subroutines active
    ///
    /// # Examples
    /// ```rust
    /// use chip8_vm::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            v: [0; 16],
            i: 0,
            delay: 0,
            sound: 0,
            pc: PROGRAM.start as Adr,
            sp: 0,
            word: 0,
            cycle: 0,
            faults: 0,
            disassembler: Dis::default(),
        }
    }
}
