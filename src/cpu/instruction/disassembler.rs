// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes
use super::Insn;
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instruction
    pub normal: Style,
}

impl Dis {
    /// A [Dis] which doesn't style its output at all
    pub fn plain() -> Self {
        Self {
            invalid: Style::new(),
            normal: Style::new(),
        }
    }
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let dis = Dis::plain();
    /// assert!(dis.once(0x00e0).contains("cls"));
    /// assert!(dis.once(0x800f).contains("inval  800f"));
    /// ```
    fn once(&self, insn: u16) -> String {
        match Insn::try_from(insn) {
            Ok(insn) => format!("{}", insn.style(self.normal)),
            Err(_) => format!("{}", format_args!("inval  {insn:04x}").style(self.invalid)),
        }
    }
}
