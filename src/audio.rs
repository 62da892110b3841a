// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Tone output for the sound timer

/// Something which can make the Chip-8's one and only sound
pub trait Speaker {
    /// Emits one timer-tick's worth of tone. Fire and forget.
    fn pulse(&mut self);
    /// Stops the tone, once the sound timer runs out
    fn silence(&mut self) {}
}

/// A [Speaker] which makes no sound at all
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mute;

impl Speaker for Mute {
    fn pulse(&mut self) {}
}

#[cfg(feature = "beep")]
pub use beeper::Beeper;

#[cfg(feature = "beep")]
mod beeper {
    use super::Speaker;
    use owo_colors::OwoColorize;

    /// Drives the PC speaker through [beep]
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Beeper {
        /// Pitch of the tone, in Hz
        pub pitch: u16,
        beeping: bool,
    }

    impl Beeper {
        /// Creates a [Beeper] at the given pitch
        pub fn new(pitch: u16) -> Self {
            Self {
                pitch,
                beeping: false,
            }
        }
    }

    impl Default for Beeper {
        /// A high C
        fn default() -> Self {
            Self::new(2093)
        }
    }

    impl Beeper {
        /// Latches `beeping` once the speaker has done as it was told.
        /// Reports the failure and keeps the old state otherwise.
        fn settle<T, E: std::fmt::Display>(&mut self, result: Result<T, E>, beeping: bool) {
            match result {
                Ok(_) => self.beeping = beeping,
                Err(e) => eprintln!("{}", format_args!("audio: {e}").bold().red()),
            }
        }
    }

    impl Speaker for Beeper {
        fn pulse(&mut self) {
            if !self.beeping {
                self.settle(beep::beep(self.pitch), true);
            }
        }
        fn silence(&mut self) {
            if self.beeping {
                self.settle(beep::beep(0), false);
            }
        }
    }

}
