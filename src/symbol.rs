use std::{fmt, str::FromStr};

use fxhash::FxBuildHasher;
use indexmap::{map::Entry, IndexMap};

// Symbol table of label -> instruction address
type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Represents the CPU registers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Register {
    A = 0,
    B,
    C,
    D,
}

impl Register {
    pub const ALL: [Register; 4] = [Register::A, Register::B, Register::C, Register::D];

    /// Two-bit field value used in encoded instructions.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Only the low two bits of `code` are considered.
    pub fn from_code(code: u8) -> Self {
        Self::ALL[(code & 0b11) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Register {
    type Err = ();

    /// Expects an already upper-cased name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Register::A),
            "B" => Ok(Register::B),
            "C" => Ok(Register::C),
            "D" => Ok(Register::D),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::A => "A",
            Register::B => "B",
            Register::C => "C",
            Register::D => "D",
        };
        f.write_str(name)
    }
}

/// Textual opcode names accepted by the assembler.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    Ldi,
    Add,
    Sub,
    SkipNz,
    Jmp,
    Halt,
}

impl Mnemonic {
    /// Amount of operands the instruction takes.
    pub fn arity(self) -> usize {
        match self {
            Mnemonic::Ldi | Mnemonic::Add | Mnemonic::Sub => 2,
            Mnemonic::SkipNz | Mnemonic::Jmp => 1,
            Mnemonic::Halt => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Ldi => "LDI",
            Mnemonic::Add => "ADD",
            Mnemonic::Sub => "SUB",
            Mnemonic::SkipNz => "SKIPNZ",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Halt => "HALT",
        }
    }
}

impl FromStr for Mnemonic {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LDI" => Ok(Mnemonic::Ldi),
            "ADD" => Ok(Mnemonic::Add),
            "SUB" => Ok(Mnemonic::Sub),
            "SKIPNZ" => Ok(Mnemonic::SkipNz),
            "JMP" => Ok(Mnemonic::Jmp),
            "HALT" => Ok(Mnemonic::Halt),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only table of label -> address built during the first pass.
///
/// A name defined more than once keeps its first address; later definitions
/// are never found by [`LabelTable::get`].
#[derive(Default, Debug)]
pub struct LabelTable {
    labels: FxMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable {
            labels: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Record `name` at `address`. Returns the earlier address if the name was already defined,
    /// in which case the table is left unchanged.
    pub fn insert(&mut self, name: impl Into<String>, address: usize) -> Option<usize> {
        match self.labels.entry(name.into()) {
            Entry::Occupied(first) => Some(*first.get()),
            Entry::Vacant(slot) => {
                slot.insert(address);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Distinct label names.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
