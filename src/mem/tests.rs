// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Unit tests for [super::Mem] and [super::Screen]

use super::*;
use rand::random;

mod load {
    use super::*;
    #[test]
    fn program_fits() {
        let rom: Vec<u8> = (0..PROGRAM.len()).map(|_| random()).collect();
        let mem = Mem::new(&rom).expect("A program of exactly 0x4a0 bytes should fit");
        assert_eq!(mem.get_region(Region::Program), rom.as_slice());
    }
    #[test]
    fn program_too_large() {
        let rom = vec![0xa5; PROGRAM.len() + 1];
        match Mem::new(&rom) {
            Err(Error::ProgramTooLarge { len, max }) => {
                assert_eq!(len, 0x4a1);
                assert_eq!(max, 0x4a0);
            }
            other => panic!("Expected ProgramTooLarge, got {other:?}"),
        }
    }
    #[test]
    fn reload_zeroes_program() {
        let mut mem = Mem::new(&[0xff; 0x10]).unwrap();
        mem.load_program(&[0x12, 0x34]).unwrap();
        let program = mem.get_region(Region::Program);
        assert_eq!(&program[..2], &[0x12, 0x34]);
        assert!(program[2..].iter().all(|&byte| byte == 0));
    }
    #[test]
    fn font_loaded() {
        let mem = Mem::default();
        let interpreter = mem.get_region(Region::Interpreter);
        // glyph 0 and glyph F
        assert_eq!(&interpreter[0..5], &[0xf0, 0x90, 0x90, 0x90, 0xf0]);
        assert_eq!(&interpreter[75..80], &[0xf0, 0x80, 0xf0, 0x80, 0x80]);
        assert!(interpreter[80..].iter().all(|&byte| byte == 0));
    }
}

mod fetch {
    use super::*;
    #[test]
    fn big_endian() {
        let mem = Mem::new(&[0xab, 0xcd, 0xef]).unwrap();
        assert_eq!(0xabcd, mem.fetch(0x200).unwrap());
        // Unaligned fetches are fine
        assert_eq!(0xcdef, mem.fetch(0x201).unwrap());
    }
    #[test]
    fn last_word() {
        let mut rom = vec![0; PROGRAM.len()];
        rom[0x49e] = 0x12;
        rom[0x49f] = 0x34;
        let mem = Mem::new(&rom).unwrap();
        assert_eq!(0x1234, mem.fetch(0x69e).unwrap());
    }
    #[test]
    fn out_of_bounds() {
        let mem = Mem::default();
        // straddles the end of the program window
        assert!(mem.fetch(0x69f).is_err());
        assert!(mem.fetch(0x6a0).is_err());
        // below the program window
        assert!(mem.fetch(0x000).is_err());
        assert!(mem.fetch(0x1ff).is_err());
        assert!(mem.fetch(0xffff).is_err());
    }
}

mod read_write {
    use super::*;
    #[test]
    fn read_either_window() {
        let mem = Mem::new(b"Hello, world!").unwrap();
        let mut buf = [0; 5];
        mem.read(0x200u16, &mut buf).unwrap();
        assert_eq!(&buf, b"Hello");
        mem.read(0x005u16, &mut buf).unwrap();
        assert_eq!(buf, [0x20, 0x60, 0x20, 0x20, 0x70]);
    }
    #[test]
    fn read_window_edges() {
        let mem = Mem::default();
        assert!(mem.read(0x1fbu16, &mut [0; 5]).is_ok());
        assert!(mem.read(0x1fcu16, &mut [0; 5]).is_err());
        assert!(mem.read(0x69bu16, &mut [0; 5]).is_ok());
        assert!(mem.read(0x69cu16, &mut [0; 5]).is_err());
        assert!(mem.read(0x6a0u16, &mut [0; 1]).is_err());
        assert!(mem.read(usize::MAX, &mut [0; 2]).is_err());
    }
    #[test]
    fn read_failure_leaves_buffer() {
        let mem = Mem::default();
        let mut buf = [0xc5; 4];
        assert!(mem.read(0x1feu16, &mut buf).is_err());
        assert_eq!(buf, [0xc5; 4]);
    }
    #[test]
    fn write_program_only() {
        let mut mem = Mem::default();
        mem.write(0x69cu16, &[1, 2, 3, 4]).unwrap();
        let mut buf = [0; 4];
        mem.read(0x69cu16, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        // The interpreter window is read-only
        assert!(mem.write_u8(0x000u16, 0xff).is_err());
        assert!(mem.write_u8(0x1ffu16, 0xff).is_err());
        // Across the end of the program window
        assert!(mem.write(0x69du16, &[1, 2, 3, 4]).is_err());
        // Across the boundary between windows
        assert!(mem.write(0x1ffu16, &[1, 2]).is_err());
        assert_eq!(mem, {
            let mut expected = Mem::default();
            expected.write(0x69cu16, &[1, 2, 3, 4]).unwrap();
            expected
        });
    }
    #[test]
    fn write_u8() {
        let mut mem = Mem::default();
        for addr in PROGRAM {
            let byte = random::<u8>();
            mem.write_u8(addr, byte).unwrap();
            let mut buf = [0];
            mem.read(addr, &mut buf).unwrap();
            assert_eq!(buf[0], byte);
        }
    }
    #[test]
    fn error_reports_span() {
        let mem = Mem::default();
        match mem.read(0x1fdu16, &mut [0; 8]) {
            Err(Error::InvalidAddress { addr, len }) => assert_eq!((addr, len), (0x1fd, 8)),
            other => panic!("Expected InvalidAddress, got {other:?}"),
        }
    }
}

mod stack {
    use super::*;
    #[test]
    fn every_slot() {
        let mut mem = Mem::default();
        for sp in 0..STACK_DEPTH {
            mem.stack_write(sp, 0x200 + sp as u16 * 2).unwrap();
        }
        for sp in 0..STACK_DEPTH {
            assert_eq!(mem.stack_read(sp).unwrap(), 0x200 + sp as u16 * 2);
        }
    }
    #[test]
    fn starts_zeroed() {
        let mem = Mem::default();
        assert_eq!(mem.stack_read(0).unwrap(), 0);
        assert_eq!(mem.stack_read(15).unwrap(), 0);
    }
    #[test]
    fn overflow() {
        let mut mem = Mem::default();
        assert!(matches!(
            mem.stack_write(STACK_DEPTH, 0x200),
            Err(Error::StackOverflow { sp: 16 })
        ));
        assert!(matches!(
            mem.stack_read(STACK_DEPTH),
            Err(Error::InvalidStackPointer { sp: 16 })
        ));
    }
}

mod screen {
    use super::*;
    use crate::mem::screen::{HEIGHT, WIDTH};

    fn lit(screen: &Screen) -> Vec<(usize, usize)> {
        let mut out = vec![];
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if screen.pixel(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn aligned() {
        let mut screen = Screen::default();
        assert!(!screen.draw(8, 0, &[0b1000_0001]));
        assert_eq!(lit(&screen), vec![(8, 0), (15, 0)]);
    }
    #[test]
    fn unaligned() {
        let mut screen = Screen::default();
        assert!(!screen.draw(13, 2, &[0xff]));
        assert_eq!(screen.rows()[2][1], 0b0000_0111);
        assert_eq!(screen.rows()[2][2], 0b1111_1000);
        assert_eq!(lit(&screen), (13..21).map(|x| (x, 2)).collect::<Vec<_>>());
    }
    #[test]
    fn horizontal_wrap() {
        let mut screen = Screen::default();
        screen.draw(60, 4, &[0xff]);
        let mut expected: Vec<_> = (0..4).chain(60..64).map(|x| (x, 4)).collect();
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(lit(&screen), expected);
    }
    #[test]
    fn horizontal_wrap_past_width() {
        // x is taken modulo the row width in bytes
        let (mut a, mut b) = (Screen::default(), Screen::default());
        a.draw(3, 0, &[0xa5]);
        b.draw(67, 0, &[0xa5]);
        assert_eq!(a, b);
    }
    #[test]
    fn vertical_wrap() {
        let mut screen = Screen::default();
        screen.draw(0, 30, &[0x80; 5]);
        assert_eq!(lit(&screen), vec![(0, 0), (0, 1), (0, 2), (0, 30), (0, 31)]);
    }
    #[test]
    fn double_draw_restores() {
        for _ in 0..0x100 {
            let mut screen = Screen::default();
            // fill the screen with garbage
            for y in 0..HEIGHT as u8 {
                screen.draw(random::<u8>(), y, &[random()]);
            }
            let before = screen;
            let sprite: Vec<u8> = (0..15).map(|_| random::<u8>()).collect();
            let (x, y) = (random::<u8>(), random::<u8>());
            screen.draw(x, y, &sprite);
            screen.draw(x, y, &sprite);
            assert_eq!(screen, before);
        }
    }
    #[test]
    fn redraw_collides() {
        for _ in 0..0x100 {
            let mut screen = Screen::default();
            let sprite: Vec<u8> = (0..15).map(|_| random::<u8>() | 1).collect();
            let (x, y) = (random::<u8>(), random::<u8>());
            assert!(!screen.draw(x, y, &sprite));
            assert!(screen.draw(x, y, &sprite));
            assert_eq!(screen, Screen::default());
        }
    }
    #[test]
    fn collision_is_sticky() {
        let mut screen = Screen::default();
        screen.draw(0, 0, &[0x80]);
        // Only the first row collides, but the flag survives the rest
        assert!(screen.draw(0, 0, &[0x80, 0x40, 0x20]));
        assert_eq!(lit(&screen), vec![(1, 1), (2, 2)]);
    }
    #[test]
    fn collision_on_high_byte() {
        let mut screen = Screen::default();
        screen.draw(8, 0, &[0x80]);
        // low part is empty, high part hits column 8
        assert!(screen.draw(1, 0, &[0x01]));
    }
    #[test]
    fn empty_sprite() {
        let mut screen = Screen::default();
        assert!(!screen.draw(10, 10, &[]));
        assert_eq!(screen, Screen::default());
    }
    #[test]
    fn clear_and_snapshot() {
        let mut screen = Screen::default();
        screen.draw(0, 1, &[0xaa]);
        let snapshot = screen.snapshot();
        assert_eq!(snapshot[8], 0xaa);
        assert_eq!(snapshot.iter().filter(|&&b| b != 0).count(), 1);
        screen.clear();
        assert_eq!(screen.snapshot(), [0; 256]);
    }
    #[test]
    fn display() {
        let mut screen = Screen::default();
        screen.draw(0, 0, &[0xf0]);
        let text = screen.to_string();
        assert_eq!(text.lines().count(), HEIGHT);
        assert!(text.starts_with("00|████    "));
    }
}

#[test]
fn hexdump() {
    let mem = Mem::new(&[0x12, 0x34]).unwrap();
    let dump = mem.window(Region::Program).to_string();
    assert!(dump.contains("1234"));
    assert_eq!(dump.lines().count(), PROGRAM.len() / 16);
    println!("{mem}");
}
