//! Word-addressed linear memory.

use crate::error::{VmError, VmResult};
use crate::{Word, WORD_SIZE};

/// Fixed-capacity, zero-based array of words.
///
/// Every access is bounds checked; a bad address is reported as
/// [`VmError::MemoryOutOfBounds`] instead of touching neighbouring state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    words: Vec<Word>,
}

impl Memory {
    /// Creates zeroed memory holding `size` words.
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size],
        }
    }

    /// Capacity in words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the memory has no capacity.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Converts a word-sized address into an index, checking bounds.
    pub fn resolve(&self, address: Word) -> VmResult<usize> {
        usize::try_from(address)
            .ok()
            .filter(|index| *index < self.words.len())
            .ok_or(VmError::MemoryOutOfBounds {
                address: address as i64,
                size: self.words.len(),
            })
    }

    /// Reads the word at `address`.
    pub fn load(&self, address: Word) -> VmResult<Word> {
        let index = self.resolve(address)?;
        Ok(self.words[index])
    }

    /// Writes `value` at `address`.
    pub fn store(&mut self, address: Word, value: Word) -> VmResult<()> {
        let index = self.resolve(address)?;
        self.words[index] = value;
        Ok(())
    }

    /// Reads the word at an already resolved index.
    pub fn load_index(&self, index: usize) -> VmResult<Word> {
        self.words
            .get(index)
            .copied()
            .ok_or(VmError::MemoryOutOfBounds {
                address: index as i64,
                size: self.words.len(),
            })
    }

    /// Copies `words` into memory starting at address 0.
    pub fn write_image(&mut self, words: &[Word]) -> VmResult<()> {
        if words.len() > self.words.len() {
            return Err(VmError::MemoryOutOfBounds {
                address: words.len() as i64 - 1,
                size: self.words.len(),
            });
        }
        self.words[..words.len()].copy_from_slice(words);
        Ok(())
    }

    /// Reads `len` bytes starting at byte offset `byte_address`, viewing the
    /// memory as a little-endian byte array.
    pub fn read_bytes(&self, byte_address: Word, len: Word) -> VmResult<Vec<u8>> {
        let byte_size = self.words.len() * WORD_SIZE;
        let range = usize::try_from(byte_address)
            .ok()
            .zip(usize::try_from(len).ok())
            .and_then(|(start, len)| Some(start..start.checked_add(len)?))
            .filter(|range| range.end <= byte_size)
            .ok_or(VmError::MemoryOutOfBounds {
                address: byte_address as i64 / WORD_SIZE as i64,
                size: self.words.len(),
            })?;

        Ok(range
            .map(|offset| self.words[offset / WORD_SIZE].to_le_bytes()[offset % WORD_SIZE])
            .collect())
    }

    /// Returns the whole memory as a slice.
    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }

    /// Returns the whole memory as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [Word] {
        &mut self.words
    }
}
