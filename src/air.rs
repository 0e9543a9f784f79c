use crate::{
    error::AsmError,
    image::Image,
    ops::{Op, JMP_MAX},
    span::Span,
    symbol::LabelTable,
};

/// Assembly intermediate representation, one statement per instruction line.
///
/// Statement index is the instruction address, since every instruction encodes to one byte.
#[derive(Default, Debug)]
pub struct Air {
    ast: Vec<AirStmt>,
}

impl Air {
    pub fn new() -> Self {
        Air { ast: Vec::new() }
    }

    pub fn add_stmt(&mut self, stmt: AirStmt) {
        self.ast.push(stmt)
    }

    /// Use labels filled during the first pass to resolve jump targets.
    pub fn backpatch(&mut self, labels: &LabelTable) -> Result<(), AsmError> {
        for stmt in &mut self.ast {
            let AirKind::Jump { label, span } = &stmt.kind else {
                continue;
            };
            let address = labels.get(label).ok_or_else(|| AsmError::UnknownLabel {
                name: label.clone(),
                line: stmt.line,
                span: (*span).into(),
            })?;
            if address > JMP_MAX as usize {
                return Err(AsmError::AddressOutOfRange {
                    value: address.to_string(),
                    line: stmt.line,
                    span: (*span).into(),
                });
            }
            stmt.kind = AirKind::Ready(Op::Jmp(address as u8));
        }
        Ok(())
    }

    /// Encode every statement. Fails on the first unresolved label.
    pub fn emit(&self) -> Result<Image, AsmError> {
        let bytes = self
            .ast
            .iter()
            .map(AirStmt::emit)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Image::new(bytes))
    }
}

impl<'a> IntoIterator for &'a Air {
    type Item = &'a AirStmt;
    type IntoIter = std::slice::Iter<'a, AirStmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.ast.iter()
    }
}

/// Single ISA-206 statement with the source line it came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AirStmt {
    pub line: usize,
    pub kind: AirKind,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AirKind {
    /// Fully known instruction
    Ready(Op),
    /// `JMP` to a label that still needs backpatching
    Jump { label: String, span: Span },
}

impl AirStmt {
    pub fn ready(line: usize, op: Op) -> Self {
        AirStmt {
            line,
            kind: AirKind::Ready(op),
        }
    }

    pub fn jump(line: usize, label: impl Into<String>, span: Span) -> Self {
        AirStmt {
            line,
            kind: AirKind::Jump {
                label: label.into(),
                span,
            },
        }
    }

    pub fn emit(&self) -> Result<u8, AsmError> {
        match &self.kind {
            AirKind::Ready(op) => Ok(op.encode()),
            AirKind::Jump { label, span } => Err(AsmError::UnknownLabel {
                name: label.clone(),
                line: self.line,
                span: (*span).into(),
            }),
        }
    }
}
