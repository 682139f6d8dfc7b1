
use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum Opcode {
    Br = 0,
    Add,
    Ld,
    St,
    Jsr,
    And,
    Ldr,
    Str,
    Rti,
    Not,
    Ldi,
    Sti,
    Jmp,
    Res,
    Lea,
    Trap,
}

impl Opcode {
    pub const NUM_BITS: u32 = 4;
    pub const SHIFT: u32 = u16::BITS - Self::NUM_BITS;

    pub const ALL: [Opcode; 1 << Self::NUM_BITS] = [
        Opcode::Br, Opcode::Add, Opcode::Ld, Opcode::St,
        Opcode::Jsr, Opcode::And, Opcode::Ldr, Opcode::Str,
        Opcode::Rti, Opcode::Not, Opcode::Ldi, Opcode::Sti,
        Opcode::Jmp, Opcode::Res, Opcode::Lea, Opcode::Trap,
    ];

    // Every 4 bit value is an opcode, reserved ones included.
    pub fn decode(word: u16) -> Opcode {
        Self::ALL[usize::from(word >> Self::SHIFT)]
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format!("{self:?}").to_uppercase())
    }
}


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

pub const NUM_REGS: usize = 8;

impl Reg {
    pub const NUM_BITS: u32 = 3;
    pub const MASK: u16 = (1u16 << Self::NUM_BITS) - 1;

    // Holds the return address after JSR, JSRR and TRAP.
    pub const LINK: Reg = Reg::R7;

    pub const ALL: [Reg; NUM_REGS] = [
        Reg::R0, Reg::R1, Reg::R2, Reg::R3, Reg::R4, Reg::R5, Reg::R6, Reg::R7,
    ];

    // Only the low 3 bits are considered.
    pub fn from_field(bits: u16) -> Reg {
        Self::ALL[usize::from(bits & Self::MASK)]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq, Hash)]
pub enum TrapVector {
    Getc = 0x20,
    Out,
    Puts,
    In,
    Putsp,
    Halt,
}

impl TrapVector {
    pub const NUM_BITS: u32 = 8;

    pub fn from_vector(vector: u8) -> Option<TrapVector> {
        TrapVector::from_u8(vector)
    }
}

impl fmt::Display for TrapVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format!("{self:?}").to_uppercase())
    }
}


////////////////////////////////////////////////////////////////////////////////


// The nzp field of BR, using the same bit layout as the condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CondMask(u8);

impl CondMask {
    pub const N: u8 = 0b100;
    pub const Z: u8 = 0b010;
    pub const P: u8 = 0b001;
    pub const NUM_BITS: u32 = 3;

    pub fn from_bits(bits: u16) -> CondMask {
        CondMask((bits & 0b111) as u8)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    // A mask test, so BRnz is taken on either N or Z.
    pub fn matches(self, cond_bits: u8) -> bool {
        self.0 & cond_bits != 0
    }
}

impl fmt::Display for CondMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 & Self::N != 0 {
            write!(f, "n")?;
        }
        if self.0 & Self::Z != 0 {
            write!(f, "z")?;
        }
        if self.0 & Self::P != 0 {
            write!(f, "p")?;
        }
        Ok(())
    }
}


// Second source of ADD and AND. Immediates are stored sign extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(u16),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{r}"),
            Operand::Imm(v) => write!(f, "#{}", *v as i16),
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsrTarget {
    // JSR: PC relative, 11 bit offset.
    Offset(u16),
    // JSRR: through a base register.
    Reg(Reg),
}


////////////////////////////////////////////////////////////////////////////////


// A decoded instruction. All offsets are sign extended and, where PC
// relative, relative to the incremented PC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ins {
    Add { dr: Reg, sr1: Reg, src2: Operand },
    And { dr: Reg, sr1: Reg, src2: Operand },
    Not { dr: Reg, sr: Reg },
    Br { mask: CondMask, offset: u16 },
    Jmp { base: Reg },
    Jsr { target: JsrTarget },
    Ld { dr: Reg, offset: u16 },
    Ldi { dr: Reg, offset: u16 },
    Ldr { dr: Reg, base: Reg, offset: u16 },
    Lea { dr: Reg, offset: u16 },
    St { sr: Reg, offset: u16 },
    Sti { sr: Reg, offset: u16 },
    Str { sr: Reg, base: Reg, offset: u16 },
    Trap { vector: TrapVector },
}

impl Ins {
    pub fn opcode(&self) -> Opcode {
        match self {
            Ins::Add { .. } => Opcode::Add,
            Ins::And { .. } => Opcode::And,
            Ins::Not { .. } => Opcode::Not,
            Ins::Br { .. } => Opcode::Br,
            Ins::Jmp { .. } => Opcode::Jmp,
            Ins::Jsr { .. } => Opcode::Jsr,
            Ins::Ld { .. } => Opcode::Ld,
            Ins::Ldi { .. } => Opcode::Ldi,
            Ins::Ldr { .. } => Opcode::Ldr,
            Ins::Lea { .. } => Opcode::Lea,
            Ins::St { .. } => Opcode::St,
            Ins::Sti { .. } => Opcode::Sti,
            Ins::Str { .. } => Opcode::Str,
            Ins::Trap { .. } => Opcode::Trap,
        }
    }

    // `pc` is the address the instruction was fetched from. PC relative
    // operands are shown as absolute addresses.
    pub fn fmt_with_pc(&self, f: &mut fmt::Formatter, pc: u16) -> fmt::Result {
        let next = pc.wrapping_add(1);
        match *self {
            Ins::Br { mask, offset } => write!(f, "BR{mask}\tx{:04X}", next.wrapping_add(offset)),
            Ins::Jsr { target: JsrTarget::Offset(offset) } => {
                write!(f, "JSR\tx{:04X}", next.wrapping_add(offset))
            }
            Ins::Ld { dr, offset } | Ins::Ldi { dr, offset } | Ins::Lea { dr, offset } => {
                write!(f, "{}\t{dr}, x{:04X}", self.opcode(), next.wrapping_add(offset))
            }
            Ins::St { sr, offset } | Ins::Sti { sr, offset } => {
                write!(f, "{}\t{sr}, x{:04X}", self.opcode(), next.wrapping_add(offset))
            }
            _ => fmt::Display::fmt(self, f),
        }
    }

    pub fn display_with_pc(&self, pc: u16) -> DisplayWithPc<'_> {
        DisplayWithPc { ins: self, pc }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = self.opcode();
        match *self {
            Ins::Add { dr, sr1, src2 } | Ins::And { dr, sr1, src2 } => {
                write!(f, "{op}\t{dr}, {sr1}, {src2}")
            }
            Ins::Not { dr, sr } => write!(f, "{op}\t{dr}, {sr}"),
            Ins::Br { mask, offset } => write!(f, "BR{mask}\t#{}", offset as i16),
            Ins::Jmp { base: Reg::R7 } => write!(f, "RET"),
            Ins::Jmp { base } => write!(f, "{op}\t{base}"),
            Ins::Jsr { target: JsrTarget::Offset(offset) } => write!(f, "JSR\t#{}", offset as i16),
            Ins::Jsr { target: JsrTarget::Reg(base) } => write!(f, "JSRR\t{base}"),
            Ins::Ld { dr, offset } | Ins::Ldi { dr, offset } | Ins::Lea { dr, offset } => {
                write!(f, "{op}\t{dr}, #{}", offset as i16)
            }
            Ins::Ldr { dr, base, offset } => write!(f, "{op}\t{dr}, {base}, #{}", offset as i16),
            Ins::St { sr, offset } | Ins::Sti { sr, offset } => {
                write!(f, "{op}\t{sr}, #{}", offset as i16)
            }
            Ins::Str { sr, base, offset } => write!(f, "{op}\t{sr}, {base}, #{}", offset as i16),
            Ins::Trap { vector } => write!(f, "{vector}"),
        }
    }
}

pub struct DisplayWithPc<'a> {
    ins: &'a Ins,
    pc: u16,
}

impl fmt::Display for DisplayWithPc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ins.fmt_with_pc(f, self.pc)
    }
}
