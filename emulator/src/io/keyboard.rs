use std::io;
use std::sync::Arc;

use common::constants::{KBDR, KBSR, KBSR_READY};
use log::debug;

use crate::EmulatorState;
use crate::io::MMIOHandler;
use crate::io::tty::Tty;

// Keyboard status and data registers. The status register is re-evaluated on
// every read, never cached from an earlier poll.
pub struct Keyboard {
    device: Arc<dyn Tty>,
}

impl Keyboard {
    pub fn new(device: Arc<dyn Tty>) -> Self {
        Keyboard { device }
    }

    fn kbsr_read(&mut self, state: &mut EmulatorState) -> io::Result<()> {
        match self.device.poll_input()? {
            Some(ch) => {
                debug!("Keyboard: latched {ch:#04x}");
                state.mem_write_word(KBSR, KBSR_READY);
                state.mem_write_word(KBDR, ch as u16);
            }
            None => state.mem_write_word(KBSR, 0),
        }
        Ok(())
    }
}

impl MMIOHandler for Keyboard {
    fn read_word(&mut self, state: &mut EmulatorState, addr: u16) -> io::Result<u16> {
        if addr == KBSR {
            self.kbsr_read(state)?;
        }
        Ok(state.mem_read_word(addr))
    }

    fn default_addrs(&self) -> &[u16] {
        &[KBSR]
    }
}
