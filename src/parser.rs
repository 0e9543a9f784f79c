use std::num::IntErrorKind;

use crate::{
    air::{Air, AirStmt},
    error::AsmError,
    features::Features,
    lexer::{Line, Stmt, Token},
    ops::{Op, JMP_MAX, LDI_MAX},
    source::Source,
    span::Span,
    symbol::{LabelTable, Mnemonic, Register},
};

/// Two-pass assembler over normalized source lines.
///
/// The first pass only counts instruction lines to give every label its address; the
/// second pass decodes each instruction into [`Air`]. Addresses are instruction indices,
/// which only equal byte offsets because every ISA-206 instruction is one byte.
pub struct AsmParser {
    lines: Vec<Line>,
    features: Features,
}

impl AsmParser {
    pub fn new(src: &Source, features: Features) -> Self {
        AsmParser {
            lines: src.lines().map(Line::normalize).collect(),
            features,
        }
    }

    /// First pass: bind each label to the address of the next instruction line.
    pub fn resolve_labels(&self) -> Result<LabelTable, AsmError> {
        let mut labels = LabelTable::new();
        let mut pc = 0;
        for line in &self.lines {
            match line.classify()? {
                Stmt::Blank => (),
                Stmt::Label(name) => {
                    let shadowed = labels.insert(name.text, pc);
                    if shadowed.is_some() && self.features.strict_labels {
                        return Err(AsmError::DuplicateLabel {
                            name: name.text.to_string(),
                            line: line.number,
                            span: name.span.into(),
                        });
                    }
                }
                // Decoded in the second pass
                Stmt::Instr(_) => pc += 1,
            }
        }
        Ok(labels)
    }

    /// Second pass: one statement per instruction line. Jumps to labels are left for
    /// [`Air::backpatch`].
    pub fn parse(&self) -> Result<Air, AsmError> {
        let mut air = Air::new();
        for line in &self.lines {
            if let Stmt::Instr(toks) = line.classify()? {
                air.add_stmt(parse_instr(line, &toks)?);
            }
        }
        Ok(air)
    }
}

fn parse_instr(line: &Line, toks: &[Token]) -> Result<AirStmt, AsmError> {
    // A line of bare commas has no mnemonic at all
    let Some((first, operands)) = toks.split_first() else {
        return Err(AsmError::UnknownOpcode {
            mnemonic: line.text().trim().to_string(),
            line: line.number,
            span: line.span().into(),
        });
    };
    let number = line.number;
    let mnemonic: Mnemonic = first.text.parse().map_err(|_| AsmError::UnknownOpcode {
        mnemonic: first.text.to_string(),
        line: number,
        span: first.span.into(),
    })?;
    expect_operands(line, mnemonic, first.span, operands)?;

    let op = match mnemonic {
        Mnemonic::Ldi => {
            let imm = &operands[1];
            let Some(value) = integer(number, imm)?.filter(|v| (0..=LDI_MAX as i64).contains(v))
            else {
                return Err(AsmError::ImmediateOutOfRange {
                    value: imm.text.to_string(),
                    line: number,
                    span: imm.span.into(),
                });
            };
            Op::Ldi(register(number, &operands[0])?, value as u8)
        }
        Mnemonic::Add => Op::Add(
            register(number, &operands[0])?,
            register(number, &operands[1])?,
        ),
        Mnemonic::Sub => Op::Sub(
            register(number, &operands[0])?,
            register(number, &operands[1])?,
        ),
        Mnemonic::SkipNz => Op::SkipNz(register(number, &operands[0])?),
        Mnemonic::Jmp => {
            let target = &operands[0];
            // Digit-led operands are literal addresses, anything else names a label
            if !target.text.starts_with(|c: char| c.is_ascii_digit()) {
                return Ok(AirStmt::jump(number, target.text, target.span));
            }
            let Some(addr) = integer(number, target)?.filter(|v| (0..=JMP_MAX as i64).contains(v))
            else {
                return Err(AsmError::AddressOutOfRange {
                    value: target.text.to_string(),
                    line: number,
                    span: target.span.into(),
                });
            };
            Op::Jmp(addr as u8)
        }
        Mnemonic::Halt => Op::Halt,
    };
    Ok(AirStmt::ready(number, op))
}

fn expect_operands(
    line: &Line,
    mnemonic: Mnemonic,
    mnemonic_span: Span,
    operands: &[Token],
) -> Result<(), AsmError> {
    let expected = mnemonic.arity();
    if operands.len() < expected {
        let span = operands.last().map_or(mnemonic_span, |tok| tok.span);
        return Err(AsmError::MissingOperand {
            mnemonic: mnemonic.as_str(),
            expected,
            line: line.number,
            span: span.into(),
        });
    }
    if let Some(extra) = operands.get(expected) {
        return Err(AsmError::UnexpectedOperand {
            mnemonic: mnemonic.as_str(),
            line: line.number,
            span: extra.span.into(),
        });
    }
    Ok(())
}

fn register(line: usize, tok: &Token) -> Result<Register, AsmError> {
    tok.text.parse().map_err(|_| AsmError::UnknownRegister {
        name: tok.text.to_string(),
        line,
        span: tok.span.into(),
    })
}

/// Decimal integer, optionally signed. `None` when the literal is well formed but too
/// large for any field.
fn integer(line: usize, tok: &Token) -> Result<Option<i64>, AsmError> {
    match tok.text.parse::<i64>() {
        Ok(value) => Ok(Some(value)),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(None)
        }
        Err(_) => Err(AsmError::InvalidInteger {
            text: tok.text.to_string(),
            line,
            span: tok.span.into(),
        }),
    }
}
