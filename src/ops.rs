use std::fmt;

use crate::symbol::Register;

pub const OPCODE_HALT: u8 = 0b0000_0001;
pub const OPCODE_JMP: u8 = 0b1000_0000;
pub const OPCODE_LDI: u8 = 0b1100_0000;
pub const OPCODE_ADD: u8 = 0b0111_0000;
pub const OPCODE_SUB: u8 = 0b0001_0000;
pub const OPCODE_SKIPNZ: u8 = 0b0100_0000;

const TOP2: u8 = 0b1100_0000;
const TOP4: u8 = 0b1111_0000;

/// Largest immediate an `LDI` can carry (4 bits).
pub const LDI_MAX: u8 = 15;
/// Largest address a `JMP` can reach (6 bits).
pub const JMP_MAX: u8 = 63;

/// One fully decoded ISA-206 instruction. Every instruction is exactly one byte, so an
/// instruction's index in the program is also its address.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Op {
    /// Set PC to an absolute address
    Jmp(u8),
    /// Load a 4-bit unsigned immediate into a register
    Ldi(Register, u8),
    /// `dest += src`, wrapping
    Add(Register, Register),
    /// `dest -= src`, wrapping
    Sub(Register, Register),
    /// Skip the next instruction if the register is non-zero
    SkipNz(Register),
    Halt,
    /// Byte matching no instruction pattern
    Invalid(u8),
}

impl Op {
    /// Classify a byte by its bit pattern.
    pub fn decode(byte: u8) -> Op {
        // HALT must match all 8 bits, it shares its top nibble with nothing else
        if byte == OPCODE_HALT {
            return Op::Halt;
        }
        let rd = Register::from_code(byte >> 2);
        let rs = Register::from_code(byte);
        match byte & TOP2 {
            OPCODE_JMP => return Op::Jmp(byte & JMP_MAX),
            OPCODE_LDI => {
                let imm = ((byte >> 4) & 0b11) << 2 | (byte & 0b11);
                return Op::Ldi(rd, imm);
            }
            _ => (),
        }
        match byte & TOP4 {
            OPCODE_ADD => Op::Add(rd, rs),
            OPCODE_SUB => Op::Sub(rd, rs),
            OPCODE_SKIPNZ => Op::SkipNz(rd),
            _ => Op::Invalid(byte),
        }
    }

    /// Produce the machine byte. Operands are masked to their field widths, range checks
    /// belong to the assembler.
    pub fn encode(self) -> u8 {
        match self {
            Op::Jmp(addr) => OPCODE_JMP | (addr & JMP_MAX),
            Op::Ldi(dest, imm) => {
                let hi = (imm >> 2) & 0b11;
                let lo = imm & 0b11;
                OPCODE_LDI | hi << 4 | dest.code() << 2 | lo
            }
            Op::Add(dest, src) => OPCODE_ADD | dest.code() << 2 | src.code(),
            Op::Sub(dest, src) => OPCODE_SUB | dest.code() << 2 | src.code(),
            Op::SkipNz(reg) => OPCODE_SKIPNZ | reg.code() << 2,
            Op::Halt => OPCODE_HALT,
            Op::Invalid(byte) => byte,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Jmp(addr) => write!(f, "JMP {addr}"),
            Op::Ldi(dest, imm) => write!(f, "LDI {dest}, {imm}"),
            Op::Add(dest, src) => write!(f, "ADD {dest}, {src}"),
            Op::Sub(dest, src) => write!(f, "SUB {dest}, {src}"),
            Op::SkipNz(reg) => write!(f, "SKIPNZ {reg}"),
            Op::Halt => write!(f, "HALT"),
            Op::Invalid(byte) => write!(f, "??? 0x{byte:02X}"),
        }
    }
}
