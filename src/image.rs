use std::{fs, path::Path};

use crate::error::{AsmError, LoadError};

/// Contents of a `.bin206` file: raw instruction bytes with no header or footer.
/// Byte offset `i` is address `i`.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Image {
    bytes: Vec<u8>,
}

impl Image {
    pub fn new(bytes: Vec<u8>) -> Self {
        Image { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the whole image in one go, so a partial file is never left behind by assembly.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), AsmError> {
        let path = path.as_ref();
        fs::write(path, &self.bytes).map_err(|source| AsmError::Io {
            op: "write",
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a program. File length becomes the memory size of the emulator, so an empty
    /// file runs as a zero-byte memory that ends immediately.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Image::new(bytes))
    }
}

impl From<Vec<u8>> for Image {
    fn from(bytes: Vec<u8>) -> Self {
        Image::new(bytes)
    }
}
