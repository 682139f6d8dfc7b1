
pub const WORD_SIZE: u16 = 2; // Bytes, in an image file

pub const MEM_WORDS: usize = (u16::MAX as usize) + 1;

// Conventional load address for user programs.
pub const USER_START: u16 = 0x3000;

pub const MMIO_START: u16 = 0xfe00;

// Keyboard status; bit 15 set when a character is ready.
pub const KBSR: u16 = 0xfe00;
// Keyboard data; low byte holds the last character.
pub const KBDR: u16 = 0xfe02;

pub const KBSR_READY: u16 = 0x1 << 15;
