// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(missing_docs)]
//! Window, keypad, and debug hotkeys for the minifb frontend

use chip8_vm::{
    error::Result,
    mem::screen::{HEIGHT, WIDTH},
    Chip8, Region, Screen,
};
use minifb::{Key, Scale, ScaleMode, Window, WindowOptions};
use owo_colors::OwoColorize;
use std::{path::Path, time::Instant};

/// Host keys standing in for the hex keypad, indexed by keypad digit
#[rustfmt::skip]
const KEYPAD: [Key; 16] = [
    Key::X,                                     // 0
    Key::Key1, Key::Key2, Key::Key3,            // 1 2 3
    Key::Q,    Key::W,    Key::E,               // 4 5 6
    Key::A,    Key::S,    Key::D,               // 7 8 9
    Key::Z,    Key::C,                          // a b
    Key::Key4, Key::R,    Key::F,    Key::V,    // c d e f
];

/// Finds the keypad digit a host key stands for
pub fn keypad(key: Key) -> Option<usize> {
    KEYPAD.iter().position(|&k| k == key)
}

/// On and off colors, as 0RGB
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Palette {
    pub lit: u32,
    pub unlit: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            lit: 0x00c8e6b4,
            unlit: 0x00141c14,
        }
    }
}

/// The screen, expanded to one color per pixel
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Canvas {
    pixels: Vec<u32>,
    pub palette: Palette,
}

impl Canvas {
    pub fn new(palette: Palette) -> Self {
        Canvas {
            pixels: vec![palette.unlit; WIDTH * HEIGHT],
            palette,
        }
    }
    pub fn paint(&mut self, screen: &Screen) {
        let Palette { lit, unlit } = self.palette;
        for (idx, px) in self.pixels.iter_mut().enumerate() {
            *px = if screen.pixel(idx % WIDTH, idx / WIDTH) {
                lit
            } else {
                unlit
            };
        }
    }
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

/// Debugging keys, which never reach the keypad
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hotkey {
    Dump,
    Print,
    Hexdump,
    Debug,
    Pause,
    Step,
    Reset,
    Quit,
}

impl Hotkey {
    #[rustfmt::skip]
    pub fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::F1 | Key::Comma     => Hotkey::Dump,
            Key::F2 | Key::Period    => Hotkey::Print,
            Key::F3                  => Hotkey::Hexdump,
            Key::F4 | Key::Slash     => Hotkey::Debug,
            Key::F5 | Key::Backslash => Hotkey::Pause,
            Key::F6 | Key::Enter     => Hotkey::Step,
            Key::F9 | Key::Delete    => Hotkey::Reset,
            Key::Escape              => Hotkey::Quit,
            _ => return None,
        })
    }

    /// Acts on the [Chip8]. Returns false if the user wants out.
    pub fn apply(self, ch8: &mut Chip8) -> bool {
        let on_off = |on| if on { "on" } else { "off" };
        match self {
            Hotkey::Dump => ch8.cpu.dump(),
            Hotkey::Print => ch8.mem.screen().print(),
            Hotkey::Hexdump => println!("{}", ch8.mem.window(Region::Program)),
            Hotkey::Debug => {
                ch8.cpu.flags.debug();
                eprintln!("Debug {}", on_off(ch8.cpu.flags.debug));
            }
            Hotkey::Pause => {
                ch8.cpu.flags.pause();
                eprintln!("Pause {}", on_off(ch8.cpu.flags.pause));
            }
            Hotkey::Step => {
                if let Err(e) = ch8.cpu.singlestep(&mut ch8.mem, &ch8.keys) {
                    eprintln!("{}", e.bold().red());
                }
            }
            Hotkey::Reset => {
                eprintln!("Reset from {:03x}", ch8.cpu.pc());
                ch8.cpu.reset();
                ch8.keys.release_all();
                ch8.mem.screen_mut().clear();
            }
            Hotkey::Quit => return false,
        }
        true
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    /// Host keys held at the last poll
    held: Vec<Key>,
    canvas: Canvas,
    title: String,
    last_frame: Instant,
}

impl UI {
    /// Opens a window titled after the ROM
    pub fn open(rom: &Path) -> Result<Self> {
        let title = rom
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Chip-8".to_owned());
        let mut window = Window::new(
            &title,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                ..Default::default()
            },
        )?;
        // State paces the frames
        window.limit_update_rate(None);
        Ok(UI {
            window,
            held: vec![],
            canvas: Canvas::default(),
            title,
            last_frame: Instant::now(),
        })
    }

    /// Pumps window events, repainting only when `dirty`.
    ///
    /// Returns false once the window has closed.
    pub fn present(&mut self, ch8: &Chip8, dirty: bool) -> Result<bool> {
        if !self.window.is_open() {
            return Ok(false);
        }
        let status = if ch8.cpu.flags.pause {
            "⏸".to_owned()
        } else {
            format!("▶ {:.1}fps", 1.0 / self.last_frame.elapsed().as_secs_f64())
        };
        self.last_frame = Instant::now();
        self.window.set_title(&format!("{} {status}", self.title));
        if dirty {
            self.canvas.paint(ch8.mem.screen());
            self.window
                .update_with_buffer(self.canvas.pixels(), WIDTH, HEIGHT)?;
        } else {
            self.window.update();
        }
        Ok(true)
    }

    /// Sends keypad changes to the [Chip8] and runs any [Hotkey]s.
    ///
    /// Returns false when the user asks to quit.
    pub fn poll_keys(&mut self, ch8: &mut Chip8) -> Result<bool> {
        // minifb drops some releases, so diff against the last poll
        let held = self.window.get_keys();
        for key in self.held.iter().filter(|key| !held.contains(key)) {
            if let Some(key) = keypad(*key) {
                ch8.keys.release(key)?;
            }
        }
        let pressed: Vec<Key> = held
            .iter()
            .filter(|key| !self.held.contains(key))
            .copied()
            .collect();
        self.held = held;

        for key in pressed {
            match (Hotkey::from_key(key), keypad(key)) {
                (Some(hotkey), _) if !hotkey.apply(ch8) => return Ok(false),
                (Some(_), _) => (),
                (None, Some(key)) => {
                    ch8.keys.press(key)?;
                }
                (None, None) => (),
            }
        }
        Ok(true)
    }
}
