// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A minifb frontend for the Chip-8 virtual machine

mod ui;

use chip8_vm::{error::Result, scheduler::*, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let state = State::new(options)?;
    for result in state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the instruction rate, in Hz.", meta = "HZ")]
    pub speed: Option<u64>,
    #[options(help = "Set the delay/sound timer rate, in Hz.", meta = "HZ")]
    pub timers: Option<u64>,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,

    #[options(short = "r", help = "Mask random numbers with kk, instead of shifting by them.")]
    pub rand_mask: bool,
    #[options(short = "c", help = "Set vF to 0 or 1 after a left shift, instead of the bit itself.")]
    pub carry_bit: bool,
    #[options(short = "m", help = "Don't make any noise.")]
    pub mute: bool,
}

/// Whichever [Speaker] the user asked for
#[derive(Debug)]
enum Sound {
    Mute(Mute),
    #[cfg(feature = "beep")]
    Beep(Beeper),
}

impl Sound {
    fn new(mute: bool) -> Self {
        match mute {
            #[cfg(feature = "beep")]
            false => Sound::Beep(Beeper::default()),
            _ => Sound::Mute(Mute),
        }
    }
}

impl Speaker for Sound {
    fn pulse(&mut self) {
        match self {
            Sound::Mute(s) => s.pulse(),
            #[cfg(feature = "beep")]
            Sound::Beep(s) => s.pulse(),
        }
    }
    fn silence(&mut self) {
        match self {
            Sound::Mute(s) => s.silence(),
            #[cfg(feature = "beep")]
            Sound::Beep(s) => s.silence(),
        }
    }
}

#[derive(Debug)]
struct State {
    pub ch8: Chip8,
    pub sched: Scheduler,
    pub frames: Clock,
    pub sound: Sound,
    pub ui: UI,
    /// Set when the screen may have changed since it was last presented
    pub dirty: bool,
    /// Set while the CPU can't fetch its next instruction
    pub stalled: bool,
    pub last: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut ch8 = Chip8::load(&options.file)?;
        ch8.cpu.flags = Flags {
            debug: options.debug,
            pause: options.pause,
            quirks: Quirks {
                rand_mask: options.rand_mask,
                carry_bit: options.carry_bit,
            },
        };
        Ok(State {
            ch8,
            sched: Scheduler::new(
                options.speed.unwrap_or(CPU_HZ),
                options.timers.unwrap_or(TIMER_HZ),
            ),
            frames: Clock::new(options.frame_rate),
            sound: Sound::new(options.mute),
            ui: UI::open(&options.file)?,
            dirty: true,
            stalled: false,
            last: Instant::now(),
        })
    }
    /// Gets the whole milliseconds since the last call
    fn elapsed_ms(&mut self) -> u64 {
        let elapsed = self.last.elapsed().as_millis() as u64;
        self.last += Duration::from_millis(elapsed);
        elapsed
    }
    fn keys(&mut self) -> Result<bool> {
        let paused = self.ch8.cpu.flags.pause;
        let keep_going = self.ui.poll_keys(&mut self.ch8)?;
        // hotkeys may have stepped, or cleared the screen
        self.dirty |= paused || self.ch8.cpu.flags.pause;
        Ok(keep_going)
    }
    fn tick(&mut self, elapsed_ms: u64) {
        let cycle = self.ch8.cpu.cycle();
        match self.sched.run(&mut self.ch8, &mut self.sound, elapsed_ms) {
            Ok(drew) => {
                self.dirty |= drew;
                self.stalled &= cycle == self.ch8.cpu.cycle();
            }
            Err(e) if !self.stalled => {
                eprintln!("{}", format_args!("Stalled: {e}").bold().red());
                self.stalled = true;
            }
            Err(_) => (),
        }
    }
    fn frame(&mut self) -> Result<bool> {
        let dirty = std::mem::take(&mut self.dirty);
        self.ui.present(&self.ch8, dirty)
    }
}

impl Iterator for State {
    type Item = Result<()>;

    fn next(&mut self) -> Option<Self::Item> {
        std::thread::sleep(Duration::from_millis(1));
        let elapsed = self.elapsed_ms();
        self.tick(elapsed);
        if !self.frames.advance(elapsed) {
            return Some(Ok(()));
        }
        match self.frame() {
            Ok(false) => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        match self.keys() {
            Ok(false) => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
