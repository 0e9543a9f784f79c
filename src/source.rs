use std::{fs, path::Path};

use crate::error::AsmError;

/// Text of an `.asm206` program, kept whole so diagnostics can point into it.
#[derive(Clone, Debug)]
pub struct Source {
    name: String,
    text: String,
}

/// One raw line of a [`Source`], without its line terminator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the first character of the line within the source
    pub offset: usize,
    pub raw: &'a str,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AsmError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AsmError::Io {
            op: "open",
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Source::new(path.display().to_string(), text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines in file order. Both `\n` and `\r\n` terminators are accepted.
    pub fn lines(&self) -> impl Iterator<Item = SourceLine<'_>> {
        let mut offset = 0;
        self.text
            .split_inclusive('\n')
            .enumerate()
            .map(move |(i, chunk)| {
                let line = SourceLine {
                    number: i + 1,
                    offset,
                    raw: chunk.trim_end_matches(['\n', '\r']),
                };
                offset += chunk.len();
                line
            })
    }
}
