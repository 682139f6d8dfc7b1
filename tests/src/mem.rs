use crate::harness::{load, load_at, run};

use common::asm::Reg;

#[test]
fn ldi_double_indirection() {
    let bin = &[
        0xa401,     // LDI R2, ptr
        0xf025,     // HALT
    // ptr:
        0x4000,     // .FILL x4000
    ];
    let (mut emu, _) = load(bin);
    emu.mem_write_word(0x4000, 0xbeef);

    let ptr = emu.mem_read_word(0x3002).unwrap();
    let expected = emu.mem_read_word(ptr).unwrap();

    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R2), expected);
    assert_eq!(emu.reg_read(Reg::R2), 0xbeef);
}

#[test]
fn sti_ldi_roundtrip() {
    let bin = &[
        0x5020,     // AND R0, R0, #0
        0x102c,     // ADD R0, R0, #12
        0xb003,     // STI R0, ptr
        0xa202,     // LDI R1, ptr
        0xf025,     // HALT
        0x0000,
    // ptr:
        0x5000,     // .FILL x5000
    ];
    let (emu, _) = run(bin);
    assert_eq!(emu.get_state().mem_read_word(0x5000), 12);
    assert_eq!(emu.reg_read(Reg::R1), 12);
    // The pointer itself is untouched, as are the registers the address
    // might be confused with.
    assert_eq!(emu.get_state().mem_read_word(0x3006), 0x5000);
    for reg in [Reg::R2, Reg::R3, Reg::R4, Reg::R5, Reg::R6] {
        assert_eq!(emu.reg_read(reg), 0);
    }
}

#[test]
fn ldr_str() {
    let bin = &[
        0xe205,     // LEA R1, data
        0x6441,     // LDR R2, R1, #1
        0x14a1,     // ADD R2, R2, #1
        0x7460,     // STR R2, R1, #-32
        0xf025,     // HALT
        0x0000,
    // data:
        0x0000,
        0x0063,     // .FILL 99
    ];
    let (emu, _) = run(bin);
    assert_eq!(emu.reg_read(Reg::R1), 0x3006);
    assert_eq!(emu.reg_read(Reg::R2), 100);
    assert_eq!(emu.get_state().mem_read_word(0x3006 - 32), 100);
}

#[test]
fn address_wraparound() {
    let bin = &[
        0x6040,     // LDR R0, R1, #0
        0x6041,     // LDR R0, R1, #1
    ];
    let (mut emu, _) = load(bin);
    emu.reg_write(Reg::R1, 0xffff);
    emu.mem_write_word(0xffff, 0x1111);
    emu.mem_write_word(0x0000, 0x2222);

    emu.step().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 0x1111);
    emu.step().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 0x2222);
}

#[test]
fn pc_wraparound() {
    let (mut emu, _) = load_at(0xffff, &[
        0x1021,     // ADD R0, R0, #1
    ]);
    emu.step().unwrap();
    assert_eq!(emu.pc(), 0x0000);
    assert_eq!(emu.reg_read(Reg::R0), 1);
}
