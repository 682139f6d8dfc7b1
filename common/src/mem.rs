use std::io::{self, Read, Write};

use bytemuck::cast_slice;

// Words must already be in the desired byte order.
pub fn as_byte_slice(input: &[u16]) -> &[u8] {
    cast_slice(input)
}

////////////////////////////////////////////////////////////////////////////////

// Image files are big endian.
pub trait ReadU16Be {
    fn read_u16_be(&mut self) -> io::Result<u16>;
}

impl<T: Read> ReadU16Be for T {
    fn read_u16_be(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }
}

////////////////////////////////////////////////////////////////////////////////

pub trait WriteU16Be {
    fn write_u16_be(&mut self, val: u16) -> io::Result<()>;
}

impl<T: Write> WriteU16Be for T {
    fn write_u16_be(&mut self, val: u16) -> io::Result<()> {
        self.write_all(&val.to_be_bytes())
    }
}
