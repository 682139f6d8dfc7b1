
use std::fmt;

use common::decoder::decode;
use obj::Image;

pub struct Disassembled {
    pub addr: u16,
    pub word: u16,
    // None for words that don't decode, typically data.
    pub interp: Option<String>,
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{:04X}: {:#06x}", self.addr, self.word)?;
        if let Some(interp) = &self.interp {
            write!(f, "\t{interp}")?;
        }
        Ok(())
    }
}

pub fn disassemble(image: &Image) -> Vec<Disassembled> {
    let mut addr = image.origin();
    let mut out = vec![];
    for word in image.words() {
        let interp = decode(*word).ok().map(|ins| ins.display_with_pc(addr).to_string());
        out.push(Disassembled { addr, word: *word, interp });
        addr = addr.wrapping_add(1);
    }
    out
}
