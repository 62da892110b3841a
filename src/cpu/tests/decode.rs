// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic, through the full fetch-decode-execute path.
use super::*;

const INDX: &[u8; 16] = b"\0\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";

/// runs one arbitrary operation on a brand new CPU
/// returns the CPU for inspection
fn run_single_op(op: &[u8]) -> CPU {
    let (mut cpu, mut mem, keys) = (
        CPU::default(),
        Mem::new(op).unwrap(),
        Keyboard::default(),
    );
    cpu.v = *INDX;
    cpu.flags.quirks = Quirks::from(false);
    cpu.tick(&mut mem, &keys).unwrap(); // will panic if the fetch fails
    cpu
}

/// runs one arbitrary operation, and asserts it faulted
fn run_bad_op(op: &[u8]) {
    let cpu = run_single_op(op);
    assert_eq!(1, cpu.faults());
    assert_eq!(0x202, cpu.pc());
}

#[rustfmt::skip]
mod sys {
    use super::*;
    #[test] fn cls()   { assert_eq!(0x202, run_single_op(b"\x00\xe0").pc); }
    #[test] fn ret()   { run_bad_op(b"\x00\xee"); }
    #[test] fn sys()   { assert_eq!(0x200, run_single_op(b"\x04\x20").pc); }
    #[test] fn u0020() { run_bad_op(b"\x00\x20"); }
}
#[rustfmt::skip]
mod jump {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x12\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x12\x31").pc); }
}
#[rustfmt::skip]
mod call {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x22\x30").pc); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x22\x31").pc); }
    #[test] fn pushes()    { assert_eq!(1, run_single_op(b"\x22\x30").sp()); }
}
#[rustfmt::skip]
mod skeb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x30\x00").pc); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x30\x01").pc); }
}
#[rustfmt::skip]
mod sneb {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x40\x01").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x40\x00").pc); }
}
#[rustfmt::skip]
mod se {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x50\x00").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x50\x10").pc); }
    #[test] fn u5001()  { run_bad_op(b"\x50\x01"); }
}
#[rustfmt::skip]
mod movb {
    use super::*;
    #[test] fn load() { assert_eq!(0xa5, run_single_op(b"\x60\xa5").v[0]); }
}
#[rustfmt::skip]
mod addb {
    use super::*;
    #[test] fn add()  { assert_eq!(0x02, run_single_op(b"\x71\x01").v[1]); }
    #[test] fn wrap() { assert_eq!(0x01, run_single_op(b"\x72\xff").v[2]); }
}
#[rustfmt::skip]
mod alu {
    use super::*;
    #[test] fn mov()  { assert_eq!(0x01, run_single_op(b"\x80\x10").v[0]); }
    #[test] fn or()   { assert_eq!(0x03, run_single_op(b"\x82\x11").v[2]); }
    #[test] fn and()  { assert_eq!(0x02, run_single_op(b"\x83\x22").v[3]); }
    #[test] fn xor()  { assert_eq!(0x03, run_single_op(b"\x85\x63").v[5]); }
    #[test] fn add()  { assert_eq!([0x03, 0x00], { let v = run_single_op(b"\x81\x24").v; [v[1], v[0xf]] }); }
    #[test] fn sub()  { assert_eq!([0x02, 0x01], { let v = run_single_op(b"\x83\x15").v; [v[3], v[0xf]] }); }
    #[test] fn shr()  { assert_eq!([0x02, 0x01], { let v = run_single_op(b"\x85\x06").v; [v[5], v[0xf]] }); }
    #[test] fn bsub() { assert_eq!([0x02, 0x03, 0x01], { let v = run_single_op(b"\x82\x57").v; [v[2], v[5], v[0xf]] }); }
    #[test] fn shl()  { assert_eq!([0x18, 0x00], { let v = run_single_op(b"\x8c\x0e").v; [v[0xc], v[0xf]] }); }
    #[test] fn u800f() { run_bad_op(b"\x80\x0f"); }
}
#[rustfmt::skip]
mod sne {
    use super::*;
    #[test] fn skip()   { assert_eq!(0x204, run_single_op(b"\x90\x10").pc); }
    #[test] fn noskip() { assert_eq!(0x202, run_single_op(b"\x91\x10").pc); }
    #[test] fn any_n()  { assert_eq!(0x204, run_single_op(b"\x90\x1f").pc); }
}
#[rustfmt::skip]
mod i {
    use super::*;
    #[test] fn mov_i()  { assert_eq!(0x123, run_single_op(b"\xa1\x23").i); }
    #[test] fn jmpr()   { assert_eq!(0x123, run_single_op(b"\xb1\x23").pc); }
    #[test] fn rand()   { assert_eq!(0x00, run_single_op(b"\xc0\xff").v[0]); }
    #[test] fn draw()   { assert_eq!(0x00, run_single_op(b"\xd0\x15").v[0xf]); }
}
#[rustfmt::skip]
mod keys {
    use super::*;
    #[test] fn sek()    { assert_eq!(0x202, run_single_op(b"\xe0\x9e").pc); }
    #[test] fn snek()   { assert_eq!(0x204, run_single_op(b"\xe0\xa1").pc); }
    #[test] fn sek_f()  { assert_eq!(0x202, run_single_op(b"\xef\x9e").pc); }
    #[test] fn ue09f()  { run_bad_op(b"\xe0\x9f"); }
}
#[rustfmt::skip]
mod io {
    use super::*;
    #[test] fn getdt() { assert_eq!(0x00, run_single_op(b"\xf3\x07").v[3]); }
    #[test] fn waitk() { assert_eq!(0x200, run_single_op(b"\xf0\x0a").pc); }
    #[test] fn setdt() { assert_eq!(0x05, run_single_op(b"\xf5\x15").delay()); }
    #[test] fn movst() { assert_eq!(0x06, run_single_op(b"\xf6\x18").sound()); }
    #[test] fn add_i() { assert_eq!(0x07, run_single_op(b"\xf7\x1e").i); }
    #[test] fn font()  { assert_eq!(0x32, run_single_op(b"\xfa\x29").i); }
    #[test] fn bcd()   { run_bad_op(b"\xf0\x33"); }
    #[test] fn dmao()  { run_bad_op(b"\xf3\x55"); }
    #[test] fn dmai()  { assert_eq!([0xf0, 0x90, 0x90, 0x90], run_single_op(b"\xf3\x65").v[..4]); }
    #[test] fn uf0ff() { run_bad_op(b"\xf0\xff"); }
}
