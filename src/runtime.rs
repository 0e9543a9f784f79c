use std::fmt;

use crate::{image::Image, ops::Op, output::Output, symbol::Register};

/// Why the fetch-decode-execute loop stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HaltReason {
    /// A `HALT` instruction was executed.
    Halt,
    /// PC moved past the last byte of memory.
    EndOfMemory,
    /// Abnormal halt on a byte that matches no instruction pattern.
    InvalidOpcode { byte: u8, addr: usize },
}

/// Represents complete program state during runtime.
pub struct RunState {
    /// Program bytes. Memory size is exactly the program size.
    mem: Box<[u8]>,
    /// Program counter
    pc: usize,
    /// A, B, C and D
    reg: [i8; 4],
    /// Set once the loop has stopped
    halted: Option<HaltReason>,
    /// Print every executed instruction
    trace: bool,
}

impl RunState {
    pub fn from_image(image: Image) -> RunState {
        Self::from_raw(image.into_bytes())
    }

    pub fn from_raw(raw: impl Into<Box<[u8]>>) -> RunState {
        RunState {
            mem: raw.into(),
            pc: 0,
            reg: [0; 4],
            halted: None,
            trace: false,
        }
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Run until halted or PC falls off the end of memory. There is no step limit.
    pub fn run(&mut self) -> HaltReason {
        loop {
            if let Some(reason) = self.step() {
                return reason;
            }
        }
    }

    /// Execute a single instruction. Returns the halt reason once the machine has stopped.
    pub fn step(&mut self) -> Option<HaltReason> {
        if self.halted.is_some() {
            return self.halted;
        }
        let Some(&byte) = self.mem.get(self.pc) else {
            self.halted = Some(HaltReason::EndOfMemory);
            return self.halted;
        };
        let addr = self.pc;
        // PC incremented before instruction is performed
        self.pc += 1;

        let op = Op::decode(byte);
        match op {
            Op::Halt => self.halted = Some(HaltReason::Halt),
            Op::Jmp(target) => self.pc = target as usize,
            Op::Ldi(dest, imm) => *self.reg_mut(dest) = imm as i8,
            Op::Add(dest, src) => self.add(dest, src),
            Op::Sub(dest, src) => self.sub(dest, src),
            Op::SkipNz(reg) => self.skipnz(reg),
            Op::Invalid(byte) => self.halted = Some(HaltReason::InvalidOpcode { byte, addr }),
        }

        if self.trace {
            Output::Trace.print_step(addr, byte, op, self);
        }
        self.halted
    }

    fn add(&mut self, dest: Register, src: Register) {
        let val = self.reg(dest).wrapping_add(self.reg(src));
        *self.reg_mut(dest) = val;
    }

    fn sub(&mut self, dest: Register, src: Register) {
        let val = self.reg(dest).wrapping_sub(self.reg(src));
        *self.reg_mut(dest) = val;
    }

    fn skipnz(&mut self, reg: Register) {
        if self.reg(reg) != 0 {
            self.pc += 1;
        }
    }

    #[inline]
    fn reg_mut(&mut self, reg: Register) -> &mut i8 {
        &mut self.reg[reg.index()]
    }

    pub fn reg(&self, reg: Register) -> i8 {
        self.reg[reg.index()]
    }

    pub fn registers(&self) -> [i8; 4] {
        self.reg
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn memory(&self) -> &[u8] {
        &self.mem
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halted
    }
}

/// Final register dump, e.g. `A = 0\tB = 1\tC = 0\tD = 0\tPC = 7`.
impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.reg;
        write!(f, "A = {a}\tB = {b}\tC = {c}\tD = {d}\tPC = {}", self.pc)
    }
}
