//! Assembler and emulator for ISA-206, a toy 8-bit instruction set with four registers.
//!
//! Assembly runs in two passes over the source: [`AsmParser::resolve_labels`] assigns each
//! label the index of the next instruction, then [`AsmParser::parse`] decodes instructions
//! into [`Air`], which is backpatched and emitted as an [`Image`]. The emulator loads an
//! [`Image`] into a [`RunState`] and runs it until it halts.

use std::path::Path;

use miette::{NamedSource, Report};

// Parsing
mod lexer;
mod parser;
pub use parser::AsmParser;
mod air;
pub use air::{Air, AirKind, AirStmt};
mod source;
pub use source::{Source, SourceLine};

// Running
mod runtime;
pub use runtime::{HaltReason, RunState};

// Shared
mod error;
pub use error::{AsmError, ErrorKind, LoadError};
mod image;
pub use image::Image;
mod ops;
pub use ops::Op;
mod span;
pub use span::Span;
mod symbol;
pub use symbol::{LabelTable, Mnemonic, Register};

pub mod features;
pub use features::Features;
pub mod output;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 2;

/// Assemble a whole program. Nothing is returned unless every line encodes.
pub fn assemble(src: &Source, features: Features) -> Result<Image, AsmError> {
    let parser = AsmParser::new(src, features);
    let labels = parser.resolve_labels()?;
    let mut air = parser.parse()?;
    air.backpatch(&labels)?;
    air.emit()
}

/// Assemble `input` and write the binary to `output`.
///
/// Errors come back as reports carrying the source text, so they render with the
/// offending line highlighted.
pub fn assemble_file(input: &Path, output: &Path, features: Features) -> miette::Result<Image> {
    let src = Source::load(input)?;
    let image = assemble(&src, features).map_err(|err| {
        Report::new(err).with_source_code(NamedSource::new(src.name(), src.text().to_string()))
    })?;
    image.write(output)?;
    Ok(image)
}
