
use thiserror::Error;

use crate::asm::*;
use crate::misc::{field, sign_extend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("reserved opcode {0}")]
    Reserved(Opcode),

    #[error("unknown trap vector {0:#04x}")]
    UnknownTrap(u8),
}

impl DecodeError {
    // The opcode field of the offending word.
    pub fn opcode(&self) -> u16 {
        match self {
            DecodeError::Reserved(op) => *op as u16,
            DecodeError::UnknownTrap(_) => Opcode::Trap as u16,
        }
    }
}

fn dr(word: u16) -> Reg {
    Reg::from_field(word >> 9)
}

fn sr1(word: u16) -> Reg {
    Reg::from_field(word >> 6)
}

fn pc_offset9(word: u16) -> u16 {
    sign_extend(word, 9)
}

fn alu_src2(word: u16) -> Operand {
    if field(word, 5, 1) != 0 {
        Operand::Imm(sign_extend(word, 5))
    } else {
        Operand::Reg(Reg::from_field(word))
    }
}

pub fn decode(word: u16) -> Result<Ins, DecodeError> {
    let op = Opcode::decode(word);

    let ins = match op {
        Opcode::Add => Ins::Add { dr: dr(word), sr1: sr1(word), src2: alu_src2(word) },
        Opcode::And => Ins::And { dr: dr(word), sr1: sr1(word), src2: alu_src2(word) },
        Opcode::Not => Ins::Not { dr: dr(word), sr: sr1(word) },
        Opcode::Br => Ins::Br {
            mask: CondMask::from_bits(word >> 9),
            offset: pc_offset9(word),
        },
        Opcode::Jmp => Ins::Jmp { base: sr1(word) },
        Opcode::Jsr => {
            let target = if field(word, 11, 1) != 0 {
                JsrTarget::Offset(sign_extend(word, 11))
            } else {
                JsrTarget::Reg(sr1(word))
            };
            Ins::Jsr { target }
        }
        Opcode::Ld => Ins::Ld { dr: dr(word), offset: pc_offset9(word) },
        Opcode::Ldi => Ins::Ldi { dr: dr(word), offset: pc_offset9(word) },
        Opcode::Ldr => Ins::Ldr { dr: dr(word), base: sr1(word), offset: sign_extend(word, 6) },
        Opcode::Lea => Ins::Lea { dr: dr(word), offset: pc_offset9(word) },
        Opcode::St => Ins::St { sr: dr(word), offset: pc_offset9(word) },
        Opcode::Sti => Ins::Sti { sr: dr(word), offset: pc_offset9(word) },
        Opcode::Str => Ins::Str { sr: dr(word), base: sr1(word), offset: sign_extend(word, 6) },
        Opcode::Trap => {
            let vector = field(word, 0, TrapVector::NUM_BITS) as u8;
            let vector = TrapVector::from_vector(vector).ok_or(DecodeError::UnknownTrap(vector))?;
            Ins::Trap { vector }
        }
        Opcode::Rti | Opcode::Res => return Err(DecodeError::Reserved(op)),
    };
    Ok(ins)
}
