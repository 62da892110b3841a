// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Converts wall-clock time into CPU steps and timer ticks
//!
//! Each [Clock] accumulates elapsed milliseconds, and releases at most one
//! unit of work per call, no matter how far behind it has fallen.

use crate::{audio::Speaker, error::Result, Chip8};

/// Nominal instruction rate, in instructions per second
pub const CPU_HZ: u64 = 500;
/// Nominal timer rate, in ticks per second
pub const TIMER_HZ: u64 = 60;

/// A millisecond accumulator which fires at a fixed rate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    interval: u64,
    acc: u64,
}

impl Clock {
    /// Creates a new [Clock] which fires `hz` times per second.
    ///
    /// The interval is whole milliseconds, so rates above 1kHz fire every millisecond.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// assert_eq!(2, Clock::new(500).interval());
    /// assert_eq!(16, Clock::new(60).interval());
    /// assert_eq!(1, Clock::new(4000).interval());
    /// ```
    pub fn new(hz: u64) -> Self {
        Self {
            interval: (1000 / hz.max(1)).max(1),
            acc: 0,
        }
    }
    /// Gets the time between firings, in milliseconds
    pub fn interval(&self) -> u64 {
        self.interval
    }
    /// Gets the time banked toward the next firing, in milliseconds
    pub fn pending(&self) -> u64 {
        self.acc
    }
    /// Banks `elapsed_ms`, and reports whether one interval's worth of work is due.
    ///
    /// Only one interval is ever withdrawn per call. The rest stays banked.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// let mut clock = Clock::new(500);
    /// assert!(!clock.advance(1));
    /// assert!(clock.advance(1));
    /// // a long frame still only fires once
    /// assert!(clock.advance(10));
    /// assert_eq!(8, clock.pending());
    /// ```
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        self.acc = self.acc.saturating_add(elapsed_ms);
        if self.acc >= self.interval {
            self.acc -= self.interval;
            true
        } else {
            false
        }
    }
}

/// Drives a [Chip8] from elapsed wall-clock time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scheduler {
    /// Paces instruction execution
    pub cpu: Clock,
    /// Paces the delay and sound timers
    pub timers: Clock,
}

impl Scheduler {
    /// Creates a [Scheduler] with the given instruction and timer rates
    pub fn new(cpu_hz: u64, timer_hz: u64) -> Self {
        Self {
            cpu: Clock::new(cpu_hz),
            timers: Clock::new(timer_hz),
        }
    }

    /// Runs whatever work `elapsed_ms` makes due: at most one instruction,
    /// then at most one tick of both timers.
    ///
    /// Returns whether an instruction executed during this call could have
    /// touched the screen.
    ///
    /// If the instruction can't be fetched, the timers still tick,
    /// and the fetch error is returned afterward.
    /// # Examples
    /// ```rust
    /// # use chip8_vm::*;
    /// # fn main() -> Result<()> {
    ///     let mut ch8 = Chip8::new(&[
    ///         0x60, 0x03, // mov   v0, 3
    ///         0xd0, 0x05, // draw  v0, v0, 5
    ///     ])?;
    ///     let mut sched = Scheduler::default();
    ///     assert!(!sched.run(&mut ch8, &mut Mute, 2)?);
    ///     assert!(sched.run(&mut ch8, &mut Mute, 2)?);
    ///     assert_eq!(2, ch8.cpu.cycle());
    /// #   Ok(())
    /// # }
    /// ```
    pub fn run(
        &mut self,
        ch8: &mut Chip8,
        speaker: &mut impl Speaker,
        elapsed_ms: u64,
    ) -> Result<bool> {
        let stepped = if self.cpu.advance(elapsed_ms) {
            let cycle = ch8.cpu.cycle();
            ch8.step().map(|ch8| ch8.cpu.cycle() != cycle)
        } else {
            Ok(false)
        };
        if self.timers.advance(elapsed_ms) {
            ch8.tick_timers(speaker);
        }
        Ok(stepped? && ch8.display_updated())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(CPU_HZ, TIMER_HZ)
    }
}
