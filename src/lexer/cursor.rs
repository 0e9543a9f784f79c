// Heavily inspired by `rustc_lexer` and adapted to suit single ISA-206 lines.
// See https://doc.rust-lang.org/beta/nightly-rustc/src/rustc_lexer/cursor.rs.html

use std::str::Chars;

/// Peekable iterator over a char sequence.
pub struct Cursor<'a> {
    len_remaining: usize,
    /// Iterator over chars in a &str
    chars: Chars<'a>,
    src: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            len_remaining: input.len(),
            chars: input.chars(),
            src: input,
        }
    }

    /// Peek the next char without consuming it. Returns `'\0'` at the end of input.
    pub fn first(&self) -> char {
        self.chars.clone().next().unwrap_or('\0')
    }

    /// Line is finished lexing
    pub fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// Byte offset of the cursor from the start of the input.
    pub fn abs_pos(&self) -> usize {
        self.src.len() - self.chars.as_str().len()
    }

    /// Bytes consumed since the last [`Cursor::reset_pos`].
    pub fn pos_in_token(&self) -> usize {
        self.len_remaining - self.chars.as_str().len()
    }

    /// Start a new token at the current position.
    pub fn reset_pos(&mut self) {
        self.len_remaining = self.chars.as_str().len();
    }

    /// Move to the next char
    pub fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Eat chars while predicate returns true or until the end of input.
    pub fn take_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while predicate(self.first()) && !self.is_eof() {
            self.bump();
        }
    }

    /// Slice of the input from `start` up to the cursor.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.src[start..self.abs_pos()]
    }
}
