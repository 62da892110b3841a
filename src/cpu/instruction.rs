// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Insn]

pub mod codec;
pub mod disassembler;

use self::codec::{i, nnn};
use crate::error::Error;
use imperative_rs::InstructionSet;
use std::fmt::Display;

/// A decoded Chip-8 instruction
///
/// Fields are named after the bit field they came from:
/// `A` is the `nnn` address, `B` is the `kk` byte, `x`/`y` are registers,
/// and `n` is the nibble count.
#[allow(non_camel_case_types, non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Insn {
    /// | 0aaa | Legacy machine-code call. Ignored, and never advances pc.
    // 0aaa shadows cls and ret, so TryFrom picks it out before decoding
    #[opcode = "0x0000_0AAA"]
    sys { A: u16 },
    /// | 00e0 | Clear screen memory to 0s
    #[opcode = "0x00e0"]
    cls,
    /// | 00ee | Return from subroutine
    #[opcode = "0x00ee"]
    ret,
    /// | 1aaa | Jumps to an absolute address
    #[opcode = "0x1AAA"]
    jmp { A: u16 },
    /// | 2aaa | Pushes pc onto the stack, then jumps to a
    #[opcode = "0x2AAA"]
    call { A: u16 },
    /// | 3xbb | Skips next instruction if register X == b
    #[opcode = "0x3xBB"]
    seb { x: usize, B: u8 },
    /// | 4xbb | Skips next instruction if register X != b
    #[opcode = "0x4xBB"]
    sneb { x: usize, B: u8 },
    /// | 5xy0 | Skip next instruction if vX == vY
    #[opcode = "0x5xy0"]
    se { x: usize, y: usize },
    /// | 6xbb | Loads immediate byte b into register vX
    #[opcode = "0x6xBB"]
    movb { x: usize, B: u8 },
    /// | 7xbb | Adds immediate byte b to register vX
    #[opcode = "0x7xBB"]
    addb { x: usize, B: u8 },
    /// | 8xy0 | Loads the value of y into x
    #[opcode = "0x8xy0"]
    mov { x: usize, y: usize },
    /// | 8xy1 | Performs bitwise or of vX and vY, and stores the result in vX
    #[opcode = "0x8xy1"]
    or { x: usize, y: usize },
    /// | 8xy2 | Performs bitwise and of vX and vY, and stores the result in vX
    #[opcode = "0x8xy2"]
    and { x: usize, y: usize },
    /// | 8xy3 | Performs bitwise xor of vX and vY, and stores the result in vX
    #[opcode = "0x8xy3"]
    xor { x: usize, y: usize },
    /// | 8xy4 | Performs addition of vX and vY, and stores the result in vX
    #[opcode = "0x8xy4"]
    add { x: usize, y: usize },
    /// | 8xy5 | Performs subtraction of vX and vY, and stores the result in vX
    #[opcode = "0x8xy5"]
    sub { x: usize, y: usize },
    /// | 8xy6 | Performs bitwise right shift of vX
    #[opcode = "0x8xy6"]
    shr { x: usize, y: usize },
    /// | 8xy7 | Performs subtraction of vY and vX, and stores the result in vY
    #[opcode = "0x8xy7"]
    bsub { x: usize, y: usize },
    /// | 8xyE | Performs bitwise left shift of vX
    #[opcode = "0x8xye"]
    shl { x: usize, y: usize },
    /// | 9xyn | Skip next instruction if vX != vY
    #[opcode = "0x9xyn"]
    sne { x: usize, y: usize, n: u8 },
    /// | Aaaa | Load address #a into register I
    #[opcode = "0xaAAA"]
    movI { A: u16 },
    /// | Baaa | Jump to &adr + v0
    #[opcode = "0xbAAA"]
    jmpr { A: u16 },
    /// | Cxbb | Shifts vX left by a random number & the provided byte
    #[opcode = "0xcxBB"]
    rand { x: usize, B: u8 },
    /// | Dxyn | Draws n-byte sprite to the screen at coordinates (vX, vY)
    #[opcode = "0xdxyn"]
    draw { x: usize, y: usize, n: u8 },
    /// | eX9e | Skip next instruction if key vX is held
    #[opcode = "0xex9e"]
    sek { x: usize },
    /// | eXa1 | Skip next instruction if key vX is not held
    #[opcode = "0xexa1"]
    snek { x: usize },
    /// | fX07 | Set vX to value in delay timer
    #[opcode = "0xfx07"]
    getdt { x: usize },
    /// | fX0a | Wait for input, store key in vX
    #[opcode = "0xfx0a"]
    waitk { x: usize },
    /// | fX15 | Set delay timer to the value in vX
    #[opcode = "0xfx15"]
    setdt { x: usize },
    /// | fX18 | Set sound timer to the value in vX
    #[opcode = "0xfx18"]
    movst { x: usize },
    /// | fX1e | Add vX to I
    #[opcode = "0xfx1e"]
    addI { x: usize },
    /// | fX29 | Load sprite for character x into I
    #[opcode = "0xfx29"]
    font { x: usize },
    /// | fX33 | BCD convert X into I[0..3]
    #[opcode = "0xfx33"]
    bcd { x: usize },
    /// | fX55 | DMA Stor from I to registers 0..=X
    #[opcode = "0xfx55"]
    dmao { x: usize },
    /// | fX65 | DMA Load from I to registers 0..=X
    #[opcode = "0xfx65"]
    dmai { x: usize },
}

impl TryFrom<u16> for Insn {
    type Error = Error;

    /// Decodes a single instruction word.
    ///
    /// Returns [Error::UnimplementedInstruction] if the word isn't an instruction.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// assert_eq!(Insn::draw { x: 0, y: 1, n: 5 }, Insn::try_from(0xd015).unwrap());
    /// assert!(Insn::try_from(0x800f).is_err());
    /// ```
    fn try_from(word: u16) -> Result<Self, Self::Error> {
        if i(word) == 0 && nnn(word) & 0xf00 != 0 {
            return Ok(Insn::sys { A: nnn(word) });
        }
        match Insn::decode(&word.to_be_bytes()) {
            Ok((_, insn)) => Ok(insn),
            Err(_) => Err(Error::UnimplementedInstruction { word }),
        }
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::sys { A }         => write!(f, "sys    ${A:03x}"),
            Insn::cls               => write!(f, "cls    "),
            Insn::ret               => write!(f, "ret    "),
            Insn::jmp { A }         => write!(f, "jmp    ${A:03x}"),
            Insn::call { A }        => write!(f, "call   ${A:03x}"),
            Insn::seb { x, B }      => write!(f, "se     #{B:02x}, v{x:X}"),
            Insn::sneb { x, B }     => write!(f, "sne    #{B:02x}, v{x:X}"),
            Insn::se { x, y }       => write!(f, "se     v{y:X}, v{x:X}"),
            Insn::movb { x, B }     => write!(f, "mov    #{B:02x}, v{x:X}"),
            Insn::addb { x, B }     => write!(f, "add    #{B:02x}, v{x:X}"),
            Insn::mov { x, y }      => write!(f, "mov    v{y:X}, v{x:X}"),
            Insn::or { x, y }       => write!(f, "or     v{y:X}, v{x:X}"),
            Insn::and { x, y }      => write!(f, "and    v{y:X}, v{x:X}"),
            Insn::xor { x, y }      => write!(f, "xor    v{y:X}, v{x:X}"),
            Insn::add { x, y }      => write!(f, "add    v{y:X}, v{x:X}"),
            Insn::sub { x, y }      => write!(f, "sub    v{y:X}, v{x:X}"),
            Insn::shr { x, .. }     => write!(f, "shr    v{x:X}"),
            Insn::bsub { x, y }     => write!(f, "bsub   v{x:X}, v{y:X}"),
            Insn::shl { x, .. }     => write!(f, "shl    v{x:X}"),
            Insn::sne { x, y, .. }  => write!(f, "sne    v{y:X}, v{x:X}"),
            Insn::movI { A }        => write!(f, "mov    ${A:03x}, I"),
            Insn::jmpr { A }        => write!(f, "jmp    ${A:03x}+v0"),
            Insn::rand { x, B }     => write!(f, "rand   #{B:02x}, v{x:X}"),
            Insn::draw { x, y, n }  => write!(f, "draw   #{n:x}, v{x:X}, v{y:X}"),
            Insn::sek { x }         => write!(f, "sek    v{x:X}"),
            Insn::snek { x }        => write!(f, "snek   v{x:X}"),
            Insn::getdt { x }       => write!(f, "mov    DT, v{x:X}"),
            Insn::waitk { x }       => write!(f, "waitk  v{x:X}"),
            Insn::setdt { x }       => write!(f, "mov    v{x:X}, DT"),
            Insn::movst { x }       => write!(f, "mov    v{x:X}, ST"),
            Insn::addI { x }        => write!(f, "add    v{x:X}, I"),
            Insn::font { x }        => write!(f, "font   v{x:X}, I"),
            Insn::bcd { x }         => write!(f, "bcd    v{x:X}, &I"),
            Insn::dmao { x }        => write!(f, "dmao   v{x:X}"),
            Insn::dmai { x }        => write!(f, "dmai   v{x:X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sys_and_friends() {
        assert_eq!(Insn::cls, Insn::try_from(0x00e0).unwrap());
        assert_eq!(Insn::ret, Insn::try_from(0x00ee).unwrap());
        assert_eq!(Insn::sys { A: 0x1e0 }, Insn::try_from(0x01e0).unwrap());
        assert_eq!(Insn::sys { A: 0xfff }, Insn::try_from(0x0fff).unwrap());
        assert_eq!(Insn::sys { A: 0x420 }, Insn::try_from(0x0420).unwrap());
        for word in (0x0000..0x0100).filter(|&w| w != 0x00e0 && w != 0x00ee) {
            assert!(Insn::try_from(word).is_err(), "{word:04x} should be invalid");
        }
    }

    /// The derived decoder never produces sys from a single word
    #[test]
    fn decode_skips_sys() {
        for word in 0x0000..0x1000u16 {
            let decoded = Insn::decode(&word.to_be_bytes());
            assert!(!matches!(decoded, Ok((_, Insn::sys { .. }))), "{word:04x}: {decoded:?}");
        }
        assert!(matches!(Insn::decode(&0x00e0u16.to_be_bytes()), Ok((2, Insn::cls))));
        assert!(matches!(Insn::decode(&0x00eeu16.to_be_bytes()), Ok((2, Insn::ret))));
    }

    #[test]
    fn operands() {
        assert_eq!(Insn::jmp { A: 0xabc }, Insn::try_from(0x1abc).unwrap());
        assert_eq!(Insn::seb { x: 0x7, B: 0x42 }, Insn::try_from(0x3742).unwrap());
        assert_eq!(Insn::bsub { x: 0x1, y: 0x2 }, Insn::try_from(0x8127).unwrap());
        assert_eq!(Insn::draw { x: 0xe, y: 0xf, n: 0 }, Insn::try_from(0xdef0).unwrap());
        assert_eq!(Insn::dmai { x: 0xc }, Insn::try_from(0xfc65).unwrap());
    }

    #[test]
    fn sne_ignores_n() {
        for n in 0..=0xf {
            assert_eq!(Insn::sne { x: 3, y: 4, n: n as u8 }, Insn::try_from(0x9340 | n).unwrap());
        }
    }

    #[test]
    fn invalid_words() {
        for word in [0x5001, 0x500f, 0x8008, 0x800d, 0x800f, 0xe000, 0xe09f, 0xf000, 0xf0ff] {
            match Insn::try_from(word) {
                Err(Error::UnimplementedInstruction { word: w }) => assert_eq!(word, w),
                other => panic!("{word:04x} decoded as {other:?}"),
            }
        }
    }

    /// Every valid instruction shows its mnemonic
    #[test]
    fn display() {
        for word in 0..=u16::MAX {
            if let Ok(insn) = Insn::try_from(word) {
                let text = insn.to_string();
                assert!(text.len() >= 6, "{word:04x}: {text:?}");
            }
        }
        assert_eq!("jmp    $abc", Insn::jmp { A: 0xabc }.to_string());
        assert_eq!("draw   #5, v0, v1", Insn::draw { x: 0, y: 1, n: 5 }.to_string());
    }
}
