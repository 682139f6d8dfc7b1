pub mod keyboard;
pub mod tty;

use crate::EmulatorState;

use std::io;

// A device claiming one or more memory mapped addresses. Only reads are
// intercepted; writes always land in plain memory.
pub trait MMIOHandler: Send {
    fn default_addrs(&self) -> &[u16] {
        &[]
    }

    fn read_word(&mut self, state: &mut EmulatorState, addr: u16) -> io::Result<u16>;
}
