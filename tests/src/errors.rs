use crate::harness::load;

use common::asm::{Opcode, Reg};
use common::decoder::DecodeError;
use emu_lib::{Cond, ExecError, ExecRet};

#[test]
fn rti_is_fatal() {
    let bin = &[
        0x1021,     // ADD R0, R0, #1
        0x8000,     // RTI
        0x1021,     // ADD R0, R0, #1
        0xf025,     // HALT
    ];
    let (mut emu, _) = load(bin);
    let err = emu.run().unwrap_err();
    assert!(matches!(
        err,
        ExecError::Decode { source: DecodeError::Reserved(Opcode::Rti), .. }
    ));
    assert_eq!(err.pc(), Some(0x3001));
    assert_eq!(err.opcode(), Some(0x8));
    assert_eq!(emu.num_ins(), 1);
    assert_eq!(emu.reg_read(Reg::R0), 1);
    assert_eq!(emu.cond(), Cond::P);
}

#[test]
fn reserved_message() {
    let bin = &[
        0xdfff,     // reserved
    ];
    let (mut emu, _) = load(bin);
    let err = emu.step().unwrap_err();
    assert_eq!(err.opcode(), Some(0xd));
    let msg = err.to_string();
    assert!(msg.contains("0xdfff"), "{msg}");
    assert!(msg.contains("0x3000"), "{msg}");
}

#[test]
fn halted_stays_halted() {
    let bin = &[
        0xd000,     // reserved
    ];
    let (mut emu, _) = load(bin);
    assert!(emu.step().is_err());
    assert!(emu.is_halted());
    assert_eq!(emu.step().unwrap(), ExecRet::Halt);
    assert!(emu.run().is_ok());
    assert_eq!(emu.pc(), 0x3000);
    assert_eq!(emu.num_ins(), 0);
}

#[test]
fn run_off_into_zeroes() {
    // Zero words are BR with an empty mask, so execution slides over them
    // until it reaches something fatal.
    let (mut emu, _) = load(&[]);
    emu.mem_write_word(0x3010, 0xd000);
    let err = emu.run().unwrap_err();
    assert_eq!(err.pc(), Some(0x3010));
    assert_eq!(emu.num_ins(), 0x10);
}
