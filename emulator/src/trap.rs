// Built-in trap service routines.

use std::io;

use common::asm::{Reg, TrapVector};
use common::constants::MEM_WORDS;
use log::debug;

use crate::emulator::{Emulator, ExecRet, PutspBase};
use crate::error::ExecError;

impl Emulator {
    pub(crate) fn exec_trap(&mut self, vector: TrapVector) -> Result<ExecRet, ExecError> {
        // Return address, so a service routine can be treated as a subroutine.
        let pc = self.pc();
        self.reg_write(Reg::LINK, pc);
        debug!("Trap: {vector} from {:#06x}", pc.wrapping_sub(1));

        match vector {
            TrapVector::Getc => {
                let ch = self.tty().read_input()?;
                self.reg_write(Reg::R0, ch as u16);
            }
            TrapVector::Out => {
                let ch = self.reg_read(Reg::R0) as u8;
                self.tty().handle_output(&[ch])?;
            }
            TrapVector::Puts => {
                let start = self.reg_read(Reg::R0);
                let bytes = self.collect_string(start, |word, out| out.push(word as u8))?;
                self.tty().handle_output(&bytes)?;
            }
            TrapVector::In => {
                let tty = self.tty();
                let ch = tty.read_input()?;
                tty.handle_output(&[ch])?;
                self.get_state_mut().reg_write_result(Reg::R0, ch as u16);
            }
            TrapVector::Putsp => {
                let start = match self.config().putsp_base {
                    PutspBase::Zero => 0,
                    PutspBase::R0 => self.reg_read(Reg::R0),
                };
                let bytes = self.collect_string(start, |word, out| {
                    out.push(word as u8);
                    let upper = (word >> u8::BITS) as u8;
                    if upper != 0 {
                        out.push(upper);
                    }
                })?;
                self.tty().handle_output(&bytes)?;
            }
            TrapVector::Halt => {
                debug!("Trap: halted after {} instructions", self.num_ins());
                self.halt();
                return Ok(ExecRet::Halt);
            }
        }
        Ok(ExecRet::Ok)
    }

    // Walks a zero terminated run of words from `start` over the bus, passing
    // each to `unpack`. Stops after wrapping all of memory.
    fn collect_string(
        &mut self,
        start: u16,
        unpack: impl Fn(u16, &mut Vec<u8>),
    ) -> io::Result<Vec<u8>> {
        let mut out = vec![];
        let mut addr = start;
        for _ in 0..MEM_WORDS {
            let word = self.mem_read_word(addr)?;
            if word == 0 {
                break;
            }
            unpack(word, &mut out);
            addr = addr.wrapping_add(1);
        }
        Ok(out)
    }
}
