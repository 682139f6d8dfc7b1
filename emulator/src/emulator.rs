
use common::asm::*;
use common::constants::*;
use common::decoder::decode;
use obj::Image;

use crate::emulator_state::Cond;
use crate::error::ExecError;
use crate::io::MMIOHandler;
use crate::io::keyboard::Keyboard;
use crate::io::tty::{StdIo, Tty};
use crate::EmulatorState;

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use delegate::delegate;
use log::{debug, trace};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt,
}

// Where PUTSP finds its string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PutspBase {
    // Always address 0, regardless of R0.
    #[default]
    Zero,
    // The address in R0, like PUTS.
    R0,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    pub putsp_base: PutspBase,
}


pub struct Emulator {
    state: EmulatorState,
    tty: Arc<dyn Tty>,
    config: Config,
    handlers: Vec<Box<dyn MMIOHandler>>,
    // Address to index into handlers.
    mmio_handlers: HashMap<u16, usize>,
    halted: bool,
}

impl Emulator {
    pub fn new() -> Emulator {
        Self::with_tty(Arc::new(StdIo::default()))
    }

    pub fn with_tty(tty: Arc<dyn Tty>) -> Emulator {
        Self::with_config(Config::default(), tty)
    }

    pub fn with_config(config: Config, tty: Arc<dyn Tty>) -> Emulator {
        let mut emu = Emulator {
            state: EmulatorState::new(),
            tty: tty.clone(),
            config,
            handlers: vec![],
            mmio_handlers: HashMap::new(),
            halted: false,
        };
        emu.set_mmio_handler(Keyboard::new(tty));
        emu
    }

    delegate! {
        to self.state {
            pub fn pc(&self) -> u16;
            pub fn set_pc(&mut self, pc: u16);
            pub fn reg_read(&self, reg: Reg) -> u16;
            pub fn reg_write(&mut self, reg: Reg, val: u16);
            pub fn cond(&self) -> Cond;
            pub fn num_ins(&self) -> usize;
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn tty(&self) -> Arc<dyn Tty> {
        self.tty.clone()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub(crate) fn halt(&mut self) {
        self.halted = true;
    }

    // Resets the registers, condition codes and instruction count, copies the
    // image into memory and points the PC at its origin. Memory outside the
    // image is kept, so several images can be layered.
    pub fn load_image(&mut self, image: &Image) {
        self.state.reset_cpu();
        let mut addr = image.origin();
        for word in image.words() {
            self.state.mem_write_word(addr, *word);
            addr = addr.wrapping_add(1);
        }
        debug!("Emulator: loaded {} words at {:#06x}", image.words().len(), image.origin());
        self.state.set_pc(image.origin());
        self.halted = false;
    }

    // Run until a halt.
    pub fn run(&mut self) -> Result<(), ExecError> {
        while self.step()? != ExecRet::Halt {}
        Ok(())
    }

    pub fn run_at(&mut self, pc: u16) -> Result<(), ExecError> {
        self.state.set_pc(pc);
        self.run()
    }

    // Run a single instruction. Once halted, whether by HALT or an error,
    // this does nothing.
    pub fn step(&mut self) -> Result<ExecRet, ExecError> {
        if self.halted {
            return Ok(ExecRet::Halt);
        }
        let ret = self.cycle();
        if ret.is_err() {
            self.halted = true;
        }
        ret
    }

    fn cycle(&mut self) -> Result<ExecRet, ExecError> {
        let pc = self.state.pc();
        let word = self.mem_read_word(pc)?;
        let ins = decode(word).map_err(|source| ExecError::Decode { pc, word, source })?;
        trace!("PC: {pc:#06x}: {}", ins.display_with_pc(pc));

        // Targets are relative to the incremented PC.
        self.state.set_pc(pc.wrapping_add(1));
        self.state.inc_ins();
        self.exec(&ins)
    }

    fn register_handler(&mut self, idx: usize, addr: u16) {
        assert!(addr >= MMIO_START, "MMIOHandler addr {addr:#06x} below MMIO space");
        let prev = self.mmio_handlers.insert(addr, idx);
        assert!(prev.is_none(), "Duplicate MMIOHandler for {addr:#06x}");
    }

    pub fn set_mmio_handler_for<M, I>(&mut self, handler: M, addrs: I)
    where
        M: MMIOHandler + 'static,
        I: IntoIterator<Item = u16> {

        let idx = self.handlers.len();
        self.handlers.push(Box::new(handler));
        for addr in addrs {
            self.register_handler(idx, addr);
        }
    }

    pub fn set_mmio_handler(&mut self, handler: impl MMIOHandler + 'static) {
        let addrs = handler.default_addrs().to_vec();
        self.set_mmio_handler_for(handler, addrs);
    }


    ///////////////////////////////////////////////////////////////////////////
    // Memory bus
    ///////////////////////////////////////////////////////////////////////////

    pub fn mem_read_word(&mut self, addr: u16) -> io::Result<u16> {
        if addr >= MMIO_START {
            if let Some(&idx) = self.mmio_handlers.get(&addr) {
                return self.handlers[idx].read_word(&mut self.state, addr);
            }
        }
        Ok(self.state.mem_read_word(addr))
    }

    // Writes are never intercepted.
    pub fn mem_write_word(&mut self, addr: u16, val: u16) {
        self.state.mem_write_word(addr, val);
    }

    pub fn get_state(&self) -> &EmulatorState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut EmulatorState {
        &mut self.state
    }


    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    fn read_operand(&self, src: Operand) -> u16 {
        match src {
            Operand::Reg(r) => self.state.reg_read(r),
            Operand::Imm(v) => v,
        }
    }

    fn pc_relative(&self, offset: u16) -> u16 {
        self.state.pc().wrapping_add(offset)
    }

    fn exec(&mut self, ins: &Ins) -> Result<ExecRet, ExecError> {
        match *ins {
            Ins::Add { dr, sr1, src2 } => {
                let res = self.state.reg_read(sr1).wrapping_add(self.read_operand(src2));
                self.state.reg_write_result(dr, res);
            }
            Ins::And { dr, sr1, src2 } => {
                let res = self.state.reg_read(sr1) & self.read_operand(src2);
                self.state.reg_write_result(dr, res);
            }
            Ins::Not { dr, sr } => {
                let res = !self.state.reg_read(sr);
                self.state.reg_write_result(dr, res);
            }
            Ins::Br { mask, offset } => {
                if mask.matches(self.state.cond().bits()) {
                    let target = self.pc_relative(offset);
                    trace!("PC: {:#06x}: branch taken to {target:#06x}", self.state.pc());
                    self.state.set_pc(target);
                }
            }
            Ins::Jmp { base } => {
                let target = self.state.reg_read(base);
                self.state.set_pc(target);
            }
            Ins::Jsr { target } => {
                // Resolve first, so JSRR R7 jumps to R7's old value.
                let target = match target {
                    JsrTarget::Offset(offset) => self.pc_relative(offset),
                    JsrTarget::Reg(base) => self.state.reg_read(base),
                };
                self.state.reg_write(Reg::LINK, self.state.pc());
                self.state.set_pc(target);
            }
            Ins::Ld { dr, offset } => {
                let val = self.mem_read_word(self.pc_relative(offset))?;
                self.state.reg_write_result(dr, val);
            }
            Ins::Ldi { dr, offset } => {
                let ptr = self.mem_read_word(self.pc_relative(offset))?;
                let val = self.mem_read_word(ptr)?;
                self.state.reg_write_result(dr, val);
            }
            Ins::Ldr { dr, base, offset } => {
                let addr = self.state.reg_read(base).wrapping_add(offset);
                let val = self.mem_read_word(addr)?;
                self.state.reg_write_result(dr, val);
            }
            Ins::Lea { dr, offset } => {
                let addr = self.pc_relative(offset);
                self.state.reg_write_result(dr, addr);
            }
            Ins::St { sr, offset } => {
                self.mem_write_word(self.pc_relative(offset), self.state.reg_read(sr));
            }
            Ins::Sti { sr, offset } => {
                let ptr = self.mem_read_word(self.pc_relative(offset))?;
                self.mem_write_word(ptr, self.state.reg_read(sr));
            }
            Ins::Str { sr, base, offset } => {
                let addr = self.state.reg_read(base).wrapping_add(offset);
                self.mem_write_word(addr, self.state.reg_read(sr));
            }
            Ins::Trap { vector } => return self.exec_trap(vector),
        }
        Ok(ExecRet::Ok)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
