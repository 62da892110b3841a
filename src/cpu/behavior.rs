// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]
//!
//! Every handler reports how far pc should move once it's done ([Step]).
//! Handlers which fail leave the CPU as they found it, unless noted.

use super::*;
use crate::mem::{FONT, GLYPH_SIZE};
use rand::random;

impl CPU {
    /// Executes a single [Insn]
    #[rustfmt::skip]
    #[inline(always)]
    #[allow(non_snake_case)]
    pub(super) fn execute(&mut self, mem: &mut Mem, keys: &Keyboard, instruction: Insn) -> Result<Step> {
        match instruction {
            Insn::sys   {       A } => Ok(self.sys(A)),
            Insn::cls               => Ok(self.clear_screen(mem)),
            Insn::ret               => self.ret(mem),
            Insn::jmp   {       A } => Ok(self.jump(A)),
            Insn::call  {       A } => self.call(A, mem),
            Insn::seb   {    x, B } => Ok(self.skip_equals_immediate(x, B)),
            Insn::sneb  {    x, B } => Ok(self.skip_not_equals_immediate(x, B)),
            Insn::se    { x, y    } => Ok(self.skip_equals(x, y)),
            Insn::movb  {    x, B } => Ok(self.load_immediate(x, B)),
            Insn::addb  {    x, B } => Ok(self.add_immediate(x, B)),
            Insn::mov   { x, y    } => Ok(self.load(x, y)),
            Insn::or    { x, y    } => Ok(self.or(x, y)),
            Insn::and   { x, y    } => Ok(self.and(x, y)),
            Insn::xor   { x, y    } => Ok(self.xor(x, y)),
            Insn::add   { x, y    } => Ok(self.add(x, y)),
            Insn::sub   { x, y    } => Ok(self.sub(x, y)),
            Insn::shr   { x, ..   } => Ok(self.shift_right(x)),
            Insn::bsub  { x, y    } => Ok(self.backwards_sub(x, y)),
            Insn::shl   { x, ..   } => Ok(self.shift_left(x)),
            Insn::sne   { x, y, ..} => Ok(self.skip_not_equals(x, y)),
            Insn::movI  {       A } => Ok(self.load_i_immediate(A)),
            Insn::jmpr  {       A } => Ok(self.jump_indexed(A)),
            Insn::rand  {    x, B } => Ok(self.rand(x, B)),
            Insn::draw  { x, y, n } => self.draw(x, y, n, mem),
            Insn::sek   {    x    } => self.skip_key_equals(x, keys),
            Insn::snek  {    x    } => self.skip_key_not_equals(x, keys),
            Insn::getdt {    x    } => Ok(self.load_delay_timer(x)),
            Insn::waitk {    x    } => Ok(self.wait_for_key(x, keys)),
            Insn::setdt {    x    } => Ok(self.store_delay_timer(x)),
            Insn::movst {    x    } => Ok(self.store_sound_timer(x)),
            Insn::addI  {    x    } => Ok(self.add_i(x)),
            Insn::font  {    x    } => Ok(self.load_sprite(x)),
            Insn::bcd   {    x    } => self.bcd_convert(x, mem),
            Insn::dmao  {    x    } => self.store_dma(x, mem),
            Insn::dmai  {    x    } => self.load_dma(x, mem),
        }
    }
}

/// |`0aaa`| Issues a "System call" (ML routine)
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`0aaa`| Ignored. pc never advances.        |
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`0aaa`| Machine code routines don't exist here, so this parks the CPU
    #[inline(always)]
    pub(super) fn sys(&mut self, _a: Adr) -> Step {
        Step::Stay
    }
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self, mem: &mut Mem) -> Step {
        mem.screen_mut().clear();
        Step::Next
    }
    /// |`00ee`| Returns from subroutine, resuming after the call
    #[inline(always)]
    pub(super) fn ret(&mut self, mem: &Mem) -> Result<Step> {
        let sp = (self.sp as usize)
            .checked_sub(1)
            .ok_or(Error::StackUnderflow)?;
        self.pc = mem.stack_read(sp)?;
        self.sp -= 1;
        Ok(Step::Next)
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) -> Step {
        self.pc = a;
        Step::Stay
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    ///
    /// The address pushed is the call's own. [CPU::ret] steps past it.
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr, mem: &mut Mem) -> Result<Step> {
        mem.stack_write(self.sp as usize, self.pc)?;
        self.sp += 1;
        self.pc = a;
        Ok(Step::Stay)
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl CPU {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) -> Step {
        Step::skip_if(self.v[x] == b)
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl CPU {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) -> Step {
        Step::skip_if(self.v[x] != b)
    }
}

/// |`5xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`5XY0`| Skip next instruction if vX == vY  |
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) -> Step {
        Step::skip_if(self.v[x] == self.v[y])
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) -> Step {
        self.v[x] = b;
        Step::Next
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl CPU {
    /// |`7xbb`| Adds immediate byte b to register vX. vF is untouched.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) -> Step {
        self.v[x] = self.v[x].wrapping_add(b);
        Step::Next
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=X > Y            |
/// |`8xy6`| X = X >> 1; Set vF=X & 1           |
/// |`8xy7`| Y = Y - X; Set vF=Y > X            |
/// |`8xyE`| X = X << 1; Set vF=X & 0x80        |
///
/// vF is always written before the result, so when X (or Y) is vF,
/// the result wins.
impl CPU {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) -> Step {
        self.v[x] = self.v[y];
        Step::Next
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) -> Step {
        self.v[x] |= self.v[y];
        Step::Next
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) -> Step {
        self.v[x] &= self.v[y];
        Step::Next
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) -> Step {
        self.v[x] ^= self.v[y];
        Step::Next
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) -> Step {
        self.v[0xf] = (self.v[x] > u8::MAX - self.v[y]).into();
        self.v[x] = self.v[x].wrapping_add(self.v[y]);
        Step::Next
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) -> Step {
        self.v[0xf] = (self.v[x] > self.v[y]).into();
        self.v[x] = self.v[x].wrapping_sub(self.v[y]);
        Step::Next
    }
    /// |`8xy6`| Performs bitwise right shift of vX. vY is ignored.
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg) -> Step {
        self.v[0xf] = self.v[x] & 1;
        self.v[x] >>= 1;
        Step::Next
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vY
    ///
    /// # Quirk
    /// Unlike every other ALU operation, the destination is vY
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) -> Step {
        self.v[0xf] = (self.v[y] > self.v[x]).into();
        self.v[y] = self.v[y].wrapping_sub(self.v[x]);
        Step::Next
    }
    /// |`8xyE`| Performs bitwise left shift of vX. vY is ignored.
    ///
    /// # Quirk
    /// vF gets the high bit in place (`0x80`), unless [Quirks::carry_bit] is set
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg) -> Step {
        self.v[0xf] = if self.flags.quirks.carry_bit {
            self.v[x] >> 7
        } else {
            self.v[x] & 0x80
        };
        self.v[x] <<= 1;
        Step::Next
    }
}

/// |`9xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`9XYn`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`9xyn`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) -> Step {
        Step::skip_if(self.v[x] != self.v[y])
    }
}

/// |`Aaaa`| Load address #a into register I
impl CPU {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) -> Step {
        self.i = a;
        Step::Next
    }
}

/// |`Baaa`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) -> Step {
        self.pc = a.wrapping_add(self.v[0] as Adr);
        Step::Stay
    }
}

/// |`Cxbb`| Shifts vX left by a random number & the provided byte
impl CPU {
    /// |`Cxbb`| Shifts vX left by a random number & the provided byte
    ///
    /// # Quirk
    /// With [Quirks::rand_mask], stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) -> Step {
        let r = random::<u8>() & b;
        self.v[x] = if self.flags.quirks.rand_mask {
            r
        } else {
            // Shifting every bit out leaves nothing behind
            self.v[x].checked_shl(r as u32).unwrap_or(0)
        };
        Step::Next
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// vF is set to 1 if any lit pixel was erased, and 0 otherwise
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib, mem: &mut Mem) -> Result<Step> {
        let mut sprite = [0; 0x10];
        let sprite = &mut sprite[..n as usize];
        mem.read(self.i, sprite)?;
        self.v[0xf] = mem.screen_mut().draw(self.v[x], self.v[y], sprite).into();
        Ok(Step::Next)
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                                |
/// |------|---------------------------------------|
/// |`eX9e`| Skip next instruction if key vX held  |
/// |`eXa1`| Skip next instruction if key vX isn't |
impl CPU {
    /// |`Ex9E`| Skip next instruction if key vX is held
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg, keys: &Keyboard) -> Result<Step> {
        Ok(Step::skip_if(keys.is_pressed(self.v[x] as usize)?))
    }
    /// |`ExA1`| Skip next instruction if key vX is not held
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg, keys: &Keyboard) -> Result<Step> {
        Ok(Step::skip_if(!keys.is_pressed(self.v[x] as usize)?))
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) -> Step {
        self.v[x] = self.delay;
        Step::Next
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// Polls the keyboard once. With no key held, this instruction runs again next tick.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg, keys: &Keyboard) -> Step {
        match keys.first_pressed() {
            Some(key) => {
                self.v[x] = key as u8;
                Step::Next
            }
            None => Step::Stay,
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) -> Step {
        self.delay = self.v[x];
        Step::Next
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) -> Step {
        self.sound = self.v[x];
        Step::Next
    }
    /// |`Fx1e`| Add vX to I,
    /// ```py
    /// I += vX;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) -> Step {
        self.i = self.i.wrapping_add(self.v[x] as Adr);
        Step::Next
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) -> Step {
        self.i = FONT + GLYPH_SIZE * self.v[x] as Adr;
        Step::Next
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    ///
    /// Digits are written one at a time, so a digit that doesn't fit
    /// leaves the ones before it in memory.
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg, mem: &mut Mem) -> Result<Step> {
        let (x, i) = (self.v[x], self.i as usize);
        mem.write_u8(i, x / 100)?;
        mem.write_u8(i + 1, x / 10 % 10)?;
        mem.write_u8(i + 2, x % 10)?;
        Ok(Step::Next)
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg, mem: &mut Mem) -> Result<Step> {
        mem.write(self.i, &self.v[..=x])?;
        Ok(Step::Next)
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// I is left unchanged.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg, mem: &mut Mem) -> Result<Step> {
        mem.read(self.i, &mut self.v[..=x])?;
        Ok(Step::Next)
    }
}
