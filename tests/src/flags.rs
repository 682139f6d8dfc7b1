use crate::harness::load;

use common::asm::Reg;
use emu_lib::Cond;

// Runs a single instruction with `setup` applied first, and checks the
// condition codes it leaves behind.
fn check(ins: u16, setup: impl FnOnce(&mut emu_lib::Emulator), cond_exp: Cond) {
    let (mut emu, _) = load(&[ins]);
    setup(&mut emu);
    emu.step().unwrap();
    assert_eq!(emu.cond(), cond_exp, "instruction {ins:#06x}");
}

#[test]
fn add() {
    // ADD R0, R1, #-1
    check(0x107f, |_| {}, Cond::N);
    check(0x107f, |e| e.reg_write(Reg::R1, 1), Cond::Z);
    check(0x107f, |e| e.reg_write(Reg::R1, 2), Cond::P);
    // ADD R0, R1, R2 overflowing into the sign bit
    check(0x1042, |e| { e.reg_write(Reg::R1, 0x7fff); e.reg_write(Reg::R2, 1) }, Cond::N);
    // ...and wrapping to zero
    check(0x1042, |e| { e.reg_write(Reg::R1, 0xffff); e.reg_write(Reg::R2, 1) }, Cond::Z);
}

#[test]
fn and() {
    // AND R0, R1, #-1
    check(0x507f, |e| e.reg_write(Reg::R1, 0x8001), Cond::N);
    // AND R0, R1, #0
    check(0x5060, |e| e.reg_write(Reg::R1, 0xffff), Cond::Z);
    // AND R0, R1, R2
    check(0x5042, |e| { e.reg_write(Reg::R1, 0x00ff); e.reg_write(Reg::R2, 0x0f0f) }, Cond::P);
}

#[test]
fn not() {
    // NOT R0, R1
    check(0x907f, |_| {}, Cond::N);
    check(0x907f, |e| e.reg_write(Reg::R1, 0xffff), Cond::Z);
    check(0x907f, |e| e.reg_write(Reg::R1, 0x8000), Cond::P);
}

#[test]
fn loads() {
    // LD R0, #1
    check(0x2001, |e| e.mem_write_word(0x3002, 0xfffe), Cond::N);
    check(0x2001, |e| e.mem_write_word(0x3002, 0x0001), Cond::P);
    check(0x2001, |_| {}, Cond::Z);

    // LDR R0, R1, #0
    check(0x6040, |e| { e.reg_write(Reg::R1, 0x4000); e.mem_write_word(0x4000, 0x9000) }, Cond::N);

    // LDI R0, #1
    check(0xa001, |e| { e.mem_write_word(0x3002, 0x4000); e.mem_write_word(0x4000, 0x0042) }, Cond::P);
}

#[test]
fn lea() {
    // LEA R0, #-1 from x3001
    check(0xe1ff, |_| {}, Cond::P);
    // LEA R0, #0 loaded high in memory
    let (mut emu, _) = crate::harness::load_at(0x8000, &[0xe000]);
    emu.step().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 0x8001);
    assert_eq!(emu.cond(), Cond::N);
}

#[test]
fn untouched() {
    let keep = |e: &mut emu_lib::Emulator| {
        e.get_state_mut().set_cond(Cond::N);
        e.reg_write(Reg::R0, 0);
        e.reg_write(Reg::R1, 0x4000);
    };
    // ST R0, #1
    check(0x3001, keep, Cond::N);
    // STR R0, R1, #0
    check(0x7040, keep, Cond::N);
    // STI R0, #1
    check(0xb001, keep, Cond::N);
    // JMP R1
    check(0xc040, keep, Cond::N);
    // BRnzp #0
    check(0x0e00, keep, Cond::N);
    // JSR #0
    check(0x4800, keep, Cond::N);
}
