// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Controls the [Quirks] behavior of the CPU on a granular level.

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` is the interpreter's literal behavior, `true` is the behavior most
/// other interpreters (and most programs) expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// `Cxbb` should load `random & b` into vX, instead of shifting vX left by that amount
    pub rand_mask: bool,
    /// `8xyE` should set vF to the shifted-out bit (0 or 1), instead of `vX & 0x80`
    pub carry_bit: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        Quirks {
            rand_mask: value,
            carry_bit: value,
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::from(false)
    }
}
