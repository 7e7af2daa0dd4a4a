//! Boot image format for the Larum VM.
//!
//! An image is a little-endian stream of words:
//!
//! ```text
//! [magic][checksum][payload...]
//! ```
//!
//! The checksum is the wrapping sum of all payload words. The payload is
//! copied to memory starting at address 0.

use crate::memory::Memory;
use crate::Word;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Identifies a boot image. Reads as `LRUM` in file byte order.
pub const MAGIC: u32 = 0x4D55_524C;

/// Size of the `[magic][checksum]` header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Reasons a boot image is rejected.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read boot image: {0}")]
    Io(#[from] io::Error),

    #[error("not a boot image (magic {found:#010x})")]
    BadMagic { found: u32 },

    #[error("boot image ends in the middle of a word")]
    Truncated,

    #[error("boot image does not fit in {capacity} words of memory")]
    ImageTooLarge { capacity: usize },

    #[error("boot image checksum mismatch: stored {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: Word, actual: Word },
}

/// Wrapping sum of `words`.
pub fn checksum(words: &[Word]) -> Word {
    words.iter().fold(0, |sum: Word, word| sum.wrapping_add(*word))
}

fn read_header_word<R: Read>(reader: &mut R) -> Result<u32, LoadError> {
    reader.read_u32::<LittleEndian>().map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => LoadError::Truncated,
        _ => LoadError::Io(err),
    })
}

/// Reads one payload word; `None` at a clean end of stream.
fn read_payload_word<R: Read>(reader: &mut R) -> Result<Option<Word>, LoadError> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }

    match filled {
        0 => Ok(None),
        4 => Ok(Some(LittleEndian::read_i32(&buf))),
        _ => Err(LoadError::Truncated),
    }
}

/// Loads an image from `reader` into `memory`.
///
/// Returns the number of payload words written. Nothing beyond the memory
/// capacity is ever written; memory contents are unspecified after an error.
pub fn load<R: Read>(mut reader: R, memory: &mut Memory) -> Result<usize, LoadError> {
    let magic = read_header_word(&mut reader)?;
    if magic != MAGIC {
        return Err(LoadError::BadMagic { found: magic });
    }
    let expected = read_header_word(&mut reader)? as Word;

    let capacity = memory.len();
    let words = memory.as_mut_slice();
    let mut size = 0;
    while let Some(word) = read_payload_word(&mut reader)? {
        if size == capacity {
            return Err(LoadError::ImageTooLarge { capacity });
        }
        words[size] = word;
        size += 1;
    }

    let actual = checksum(&words[..size]);
    if actual != expected {
        return Err(LoadError::ChecksumMismatch { expected, actual });
    }

    debug!("boot image verified: {size} words, checksum {actual:#010x}");
    Ok(size)
}

/// Opens `path` and loads it into `memory`.
pub fn load_file<P: AsRef<Path>>(path: P, memory: &mut Memory) -> Result<usize, LoadError> {
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file), memory)
}

/// An in-memory boot image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootImage {
    payload: Vec<Word>,
}

impl BootImage {
    /// Wraps a payload.
    pub fn new(payload: Vec<Word>) -> Self {
        Self { payload }
    }

    /// The payload words.
    pub fn payload(&self) -> &[Word] {
        &self.payload
    }

    /// Number of payload words.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The checksum stored in the header.
    pub fn checksum(&self) -> Word {
        checksum(&self.payload)
    }

    /// Writes the header and payload.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(MAGIC)?;
        writer.write_i32::<LittleEndian>(self.checksum())?;
        for word in &self.payload {
            writer.write_i32::<LittleEndian>(*word)?;
        }
        writer.flush()
    }

    /// Serializes the image.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE + self.payload.len() * 4];
        LittleEndian::write_u32(&mut bytes[0..4], MAGIC);
        LittleEndian::write_i32(&mut bytes[4..8], self.checksum());
        LittleEndian::write_i32_into(&self.payload, &mut bytes[HEADER_SIZE..]);
        bytes
    }
}

impl From<Vec<Word>> for BootImage {
    fn from(payload: Vec<Word>) -> Self {
        Self::new(payload)
    }
}
