// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Extracts the bit fields of a Chip-8 instruction word
//!
//! ```text
//! | i | x | y | n |
//! |   |   |  kk   |
//! |   |     nnn   |
//! ```

use crate::cpu::{Adr, Nib, Reg};

/// Extracts the I nibble (the opcode family) of an IXYN instruction
#[inline]
pub fn i(word: u16) -> Nib {
    (word >> 12 & 0xf) as Nib
}
/// Extracts the X nibble of an IXYN instruction
#[inline]
pub fn x(word: u16) -> Reg {
    (word >> 8 & 0xf) as Reg
}
/// Extracts the Y nibble of an IXYN instruction
#[inline]
pub fn y(word: u16) -> Reg {
    (word >> 4 & 0xf) as Reg
}
/// Extracts the N nibble of an IXYN instruction
#[inline]
pub fn n(word: u16) -> Nib {
    (word & 0xf) as Nib
}
/// Extracts the KK byte of an IXKK instruction
#[inline]
pub fn kk(word: u16) -> u8 {
    (word & 0xff) as u8
}
/// Extracts the NNN trinibble of an INNN instruction
#[inline]
pub fn nnn(word: u16) -> Adr {
    word & 0x0fff
}
