use std::{io, path::PathBuf};

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Broad category of an assembler failure.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// File could not be read or written.
    Io,
    /// Malformed statement, unknown mnemonic or register.
    Syntax,
    /// Operand outside of the range its bit field can hold.
    Range,
    /// Reference to a label that was never defined.
    UnknownSymbol,
}

/// Any error which aborts assembly. No output is produced once one is raised.
#[derive(Error, Diagnostic, Debug)]
pub enum AsmError {
    #[error("cannot {op} {}", .path.display())]
    #[diagnostic(code(asm::io))]
    Io {
        /// `open` or `write`
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: unknown opcode: {mnemonic}")]
    #[diagnostic(
        code(parse::unknown_opcode),
        help("available instructions are LDI, ADD, SUB, SKIPNZ, JMP and HALT")
    )]
    UnknownOpcode {
        mnemonic: String,
        line: usize,
        #[label("unknown opcode")]
        span: SourceSpan,
    },

    #[error("line {line}: unknown register {name}")]
    #[diagnostic(code(parse::unknown_register), help("registers are named A, B, C and D"))]
    UnknownRegister {
        name: String,
        line: usize,
        #[label("not a register")]
        span: SourceSpan,
    },

    #[error("line {line}: {mnemonic} expects {expected} operand(s)")]
    #[diagnostic(code(parse::missing_operand), help("check the operands for this instruction"))]
    MissingOperand {
        mnemonic: &'static str,
        expected: usize,
        line: usize,
        #[label("missing operand")]
        span: SourceSpan,
    },

    #[error("line {line}: unexpected operand for {mnemonic}")]
    #[diagnostic(code(parse::unexpected_operand), help("check the operands for this instruction"))]
    UnexpectedOperand {
        mnemonic: &'static str,
        line: usize,
        #[label("unexpected operand")]
        span: SourceSpan,
    },

    #[error("line {line}: invalid integer literal {text}")]
    #[diagnostic(code(parse::bad_lit), help("integer operands are written in decimal, like 12"))]
    InvalidInteger {
        text: String,
        line: usize,
        #[label("incorrect literal")]
        span: SourceSpan,
    },

    #[error("line {line}: invalid label definition")]
    #[diagnostic(
        code(parse::bad_label),
        help("labels are a single word followed by a colon, alone on their line")
    )]
    InvalidLabel {
        line: usize,
        #[label("incorrect label")]
        span: SourceSpan,
    },

    #[error("line {line}: duplicate label {name}")]
    #[diagnostic(
        code(parse::duplicate_label),
        help("labels are only allowed once per file with `strict-labels`")
    )]
    DuplicateLabel {
        name: String,
        line: usize,
        #[label("duplicate label")]
        span: SourceSpan,
    },

    #[error("line {line}: LDI immediate out of range: {value}")]
    #[diagnostic(code(encode::immediate_range), help("LDI immediates range from 0 to 15"))]
    ImmediateOutOfRange {
        /// Operand as written
        value: String,
        line: usize,
        #[label("out of range")]
        span: SourceSpan,
    },

    #[error("line {line}: JMP address out of range: {value}")]
    #[diagnostic(code(encode::address_range), help("JMP targets range from 0 to 63"))]
    AddressOutOfRange {
        value: String,
        line: usize,
        #[label("out of range")]
        span: SourceSpan,
    },

    #[error("line {line}: unknown label: {name}")]
    #[diagnostic(code(resolve::unknown_label), help("define the label on its own line, followed by a colon"))]
    UnknownLabel {
        name: String,
        line: usize,
        #[label("undefined label")]
        span: SourceSpan,
    },
}

impl AsmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::UnknownOpcode { .. }
            | Self::UnknownRegister { .. }
            | Self::MissingOperand { .. }
            | Self::UnexpectedOperand { .. }
            | Self::InvalidInteger { .. }
            | Self::InvalidLabel { .. }
            | Self::DuplicateLabel { .. } => ErrorKind::Syntax,
            Self::ImmediateOutOfRange { .. } | Self::AddressOutOfRange { .. } => ErrorKind::Range,
            Self::UnknownLabel { .. } => ErrorKind::UnknownSymbol,
        }
    }

    /// 1-based source line the error was raised on, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::UnknownOpcode { line, .. }
            | Self::UnknownRegister { line, .. }
            | Self::MissingOperand { line, .. }
            | Self::UnexpectedOperand { line, .. }
            | Self::InvalidInteger { line, .. }
            | Self::InvalidLabel { line, .. }
            | Self::DuplicateLabel { line, .. }
            | Self::ImmediateOutOfRange { line, .. }
            | Self::AddressOutOfRange { line, .. }
            | Self::UnknownLabel { line, .. } => Some(*line),
        }
    }
}

/// Failure to bring a `.bin206` program into emulator memory.
#[derive(Error, Diagnostic, Debug)]
pub enum LoadError {
    #[error("could not open file {}", .path.display())]
    #[diagnostic(code(load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
