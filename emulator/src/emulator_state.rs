use common::asm::{CondMask, NUM_REGS, Reg};
use common::constants::MEM_WORDS;

use log::trace;

// Condition codes. Exactly one is set at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cond {
    N = CondMask::N as isize,
    // Registers start zeroed.
    #[default]
    Z = CondMask::Z as isize,
    P = CondMask::P as isize,
}

impl Cond {
    pub fn from_value(val: u16) -> Cond {
        if val & 0x8000 != 0 {
            Cond::N
        } else if val == 0 {
            Cond::Z
        } else {
            Cond::P
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

// Register file and plain memory. Memory mapped registers are handled a level
// up, in Emulator; this is separate so a mutable borrow can be passed to the
// MMIO handlers.
pub struct EmulatorState {
    num_ins: usize,
    mem: Vec<u16>,
    regs: [u16; NUM_REGS],
    pc: u16,
    cond: Cond,
}

impl EmulatorState {
    pub fn new() -> Self {
        EmulatorState {
            num_ins: 0usize,
            mem: vec![0; MEM_WORDS],
            regs: [0; NUM_REGS],
            pc: 0,
            cond: Cond::default(),
        }
    }

    // Registers, condition codes and the instruction count back to their
    // initial values. Memory is left alone.
    pub fn reset_cpu(&mut self) {
        self.num_ins = 0;
        self.regs = [0; NUM_REGS];
        self.pc = 0;
        self.cond = Cond::default();
    }

    pub fn inc_ins(&mut self) {
        self.num_ins += 1;
    }

    pub fn num_ins(&self) -> usize {
        self.num_ins
    }

    pub fn mem_read_word(&self, addr: u16) -> u16 {
        self.mem[addr as usize]
    }

    pub fn mem_write_word(&mut self, addr: u16, val: u16) {
        trace!("Mem: writing {val:#06x} to {addr:#06x}");
        self.mem[addr as usize] = val;
    }

    pub fn reg_read(&self, reg: Reg) -> u16 {
        self.regs[reg.index()]
    }

    pub fn reg_write(&mut self, reg: Reg, val: u16) {
        trace!("Reg: writing {val:#06x} to {reg}");
        self.regs[reg.index()] = val;
    }

    // For instructions that define a result: the condition codes always come
    // from the value written.
    pub fn reg_write_result(&mut self, reg: Reg, val: u16) {
        self.reg_write(reg, val);
        self.update_flags(val);
    }

    pub fn update_flags(&mut self, val: u16) {
        self.cond = Cond::from_value(val);
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn cond(&self) -> Cond {
        self.cond
    }

    pub fn set_cond(&mut self, cond: Cond) {
        self.cond = cond;
    }

    pub fn regs(&self) -> &[u16; NUM_REGS] {
        &self.regs
    }
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::new()
    }
}
