// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints the disassembly of a Chip-8 ROM, one word per line

use chip8_vm::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(
        help = "Load address (usually 200)",
        parse(try_from_str = "parse_hex"),
        default = "200"
    )]
    pub loadaddr: u16,
    #[options(help = "Start disassembling at byte offset...")]
    pub offset: usize,
}

fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    let disassembler = Dis::default();
    let start = options.loadaddr as usize + options.offset;
    for (addr, word) in contents
        .get(options.offset..)
        .unwrap_or_default()
        .chunks_exact(2)
        .enumerate()
    {
        let word = u16::from_be_bytes([word[0], word[1]]);
        println!(
            "{:03x}: {} {:04x}",
            start + 2 * addr,
            disassembler.once(word),
            word.bright_black(),
        );
    }
    Ok(())
}
