use crate::error::AsmError;
use crate::lexer::cursor::Cursor;
use crate::source::SourceLine;
use crate::span::Span;

pub mod cursor;

/// A single word of an instruction line, already upper-cased.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Location within the whole source
    pub span: Span,
}

/// Source line with comments removed, leading whitespace trimmed and identifiers upper-cased.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub number: usize,
    /// Byte offset of `text` within the whole source
    offset: usize,
    text: String,
}

/// What a normalized line contributes to the program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Stmt<'a> {
    /// Nothing but whitespace or comments.
    Blank,
    /// `NAME:` declaration, binds to the next instruction.
    Label(Token<'a>),
    /// Mnemonic followed by its operands.
    Instr(Vec<Token<'a>>),
}

/// Test if a character is considered to be whitespace.
pub(crate) fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Commas are essentially whitespace between operands.
pub(crate) fn is_separator(c: char) -> bool {
    c == ',' || is_whitespace(c)
}

/// Strip the comment starting at the first `;` or `//`, whichever comes first.
pub fn strip_comment(text: &str) -> &str {
    let semi = text.find(';').unwrap_or(text.len());
    let slash = text.find("//").unwrap_or(text.len());
    &text[..semi.min(slash)]
}

impl Line {
    pub fn normalize(line: SourceLine) -> Self {
        let trimmed = line.raw.trim_start_matches([' ', '\t', '\r', '\n']);
        let lead = line.raw.len() - trimmed.len();
        // Only ASCII is upper-cased so byte offsets stay valid for diagnostics
        let text = strip_comment(trimmed).to_ascii_uppercase();
        Line {
            number: line.number,
            offset: line.offset + lead,
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Span of the whole normalized text, used when no single token is at fault.
    pub fn span(&self) -> Span {
        Span::at(self.offset, self.text.trim_end().len())
    }

    pub fn is_blank(&self) -> bool {
        self.text.chars().all(is_whitespace)
    }

    /// Decide whether this line is blank, a label or an instruction.
    pub fn classify(&self) -> Result<Stmt<'_>, AsmError> {
        if self.is_blank() {
            return Ok(Stmt::Blank);
        }
        let Some(colon) = self.text.find(':') else {
            return Ok(Stmt::Instr(self.tokens()));
        };

        let (before, after) = (&self.text[..colon], &self.text[colon + 1..]);
        let name = before.trim_end();
        let invalid = name.is_empty()
            || name.contains(is_separator)
            || !after.chars().all(is_whitespace);
        if invalid {
            return Err(AsmError::InvalidLabel {
                line: self.number,
                span: self.span().into(),
            });
        }
        Ok(Stmt::Label(Token {
            text: name,
            span: Span::at(self.offset, name.len()),
        }))
    }

    /// Split the line into words. Commas are treated like whitespace.
    pub fn tokens(&self) -> Vec<Token<'_>> {
        let mut cursor = Cursor::new(&self.text);
        std::iter::from_fn(|| cursor.advance_token())
            .map(|tok| Token {
                span: tok.span.shifted(self.offset),
                ..tok
            })
            .collect()
    }
}

impl<'a> Cursor<'a> {
    /// Next word with a span relative to the start of the line.
    pub fn advance_token(&mut self) -> Option<Token<'a>> {
        self.take_while(is_separator);
        if self.is_eof() {
            return None;
        }
        self.reset_pos();
        let start = self.abs_pos();
        self.take_while(|c| !is_separator(c));
        Some(Token {
            text: self.slice_from(start),
            span: Span::at(start, self.pos_in_token()),
        })
    }
}
