use std::io;

use common::decoder::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid instruction {word:#06x} at pc {pc:#06x}: {source}")]
    Decode {
        // Address the instruction was fetched from.
        pc: u16,
        word: u16,
        #[source]
        source: DecodeError,
    },

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl ExecError {
    pub fn pc(&self) -> Option<u16> {
        match self {
            ExecError::Decode { pc, .. } => Some(*pc),
            ExecError::Io(_) => None,
        }
    }

    pub fn opcode(&self) -> Option<u16> {
        match self {
            ExecError::Decode { source, .. } => Some(source.opcode()),
            ExecError::Io(_) => None,
        }
    }
}
