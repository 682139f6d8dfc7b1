use crate::harness::{load, load_with, run, string_words};

use common::asm::{Opcode, Reg};
use common::decoder::DecodeError;
use emu_lib::{Config, ExecError, ExecRet, PutspBase};

use std::io;

#[test]
fn out_low_byte() {
    let bin = &[
        0xf021,     // OUT
        0xf025,     // HALT
    ];
    let (mut emu, tty) = load(bin);
    emu.reg_write(Reg::R0, 0x1241);
    assert_eq!(emu.step().unwrap(), ExecRet::Ok);
    assert_eq!(emu.reg_read(Reg::R7), 0x3001);
    assert_eq!(tty.output_string(), "A");
}

#[test]
fn puts_empty() {
    let bin = &[
        0xe002,     // LEA R0, msg
        0xf022,     // PUTS
        0xf025,     // HALT
    // msg:
        0x0000,
    ];
    let (_, tty) = run(bin);
    assert!(tty.is_out_empty());
}

#[test]
fn puts_ignores_high_byte() {
    let bin = &[
        0xe002,     // LEA R0, msg
        0xf022,     // PUTS
        0xf025,     // HALT
    // msg:
        0x4f6f,
        0x006b,
        0x0000,
    ];
    let (_, tty) = run(bin);
    assert_eq!(tty.output_string(), "ok");
}

#[test]
fn putsp_odd_length() {
    let bin = &[
        0xe002,     // LEA R0, msg
        0xf024,     // PUTSP
        0xf025,     // HALT
    // msg:
        0x6261,     // "ab"
        0x0063,     // "c"
        0x0000,
    ];
    let config = Config { putsp_base: PutspBase::R0 };
    let (mut emu, tty) = load_with(config, 0x3000, bin);
    emu.run().unwrap();
    assert_eq!(tty.output_string(), "abc");
}

#[test]
fn putsp_default_reads_address_zero() {
    let mut bin = vec![
        0xe002,     // LEA R0, msg
        0xf024,     // PUTSP
        0xf025,     // HALT
    // msg:
    ];
    bin.extend(string_words("ignored"));
    let (mut emu, tty) = load(&bin);
    emu.mem_write_word(0x0000, 0x6968);   // "hi"
    emu.mem_write_word(0x0001, 0x0000);
    emu.run().unwrap();
    assert_eq!(tty.output_string(), "hi");
}

#[test]
fn getc_at_eof_is_fatal() {
    let bin = &[
        0xf020,     // GETC
        0xf025,     // HALT
    ];
    let (mut emu, _) = load(bin);
    let err = emu.step().unwrap_err();
    match &err {
        ExecError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
        _ => panic!("expected an I/O error, got {err:?}"),
    }
    assert!(emu.is_halted());
    assert_eq!(err.pc(), None);
}

#[test]
fn getc_then_in() {
    let bin = &[
        0xf020,     // GETC
        0x1220,     // ADD R1, R0, #0
        0xf023,     // IN
        0xf025,     // HALT
    ];
    let (mut emu, tty) = load(bin);
    tty.write_input(b"xy");
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R1), b'x' as u16);
    assert_eq!(emu.reg_read(Reg::R0), b'y' as u16);
    // Only IN echoes.
    assert_eq!(tty.output_string(), "y");
}

#[test]
fn unknown_trap() {
    let bin = &[
        0xf026,     // TRAP x26
    ];
    let (mut emu, _) = load(bin);
    emu.reg_write(Reg::R7, 0x1234);
    let err = emu.step().unwrap_err();
    assert!(matches!(
        err,
        ExecError::Decode { pc: 0x3000, word: 0xf026, source: DecodeError::UnknownTrap(0x26) }
    ));
    assert_eq!(err.opcode(), Some(Opcode::Trap as u16));
    assert!(emu.is_halted());
    // Rejected before R7 or the PC changed.
    assert_eq!(emu.reg_read(Reg::R7), 0x1234);
    assert_eq!(emu.pc(), 0x3000);
}
