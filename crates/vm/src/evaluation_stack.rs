//! Evaluation stack module for the Larum VM.
//!
//! This module provides the bounded word stack used for both the data stack
//! and the return stack.

use crate::error::{VmError, VmResult};
use crate::Word;
use std::fmt;

/// Represents a fixed-capacity stack of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationStack {
    /// Name used in diagnostics
    name: &'static str,

    /// The underlying stack storage, bottom first
    stack: Vec<Word>,

    /// Maximum number of items
    capacity: usize,
}

impl EvaluationStack {
    /// Creates an empty stack that can hold `capacity` words.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            stack: Vec::new(),
            capacity,
        }
    }

    /// Returns the diagnostic name of the stack.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the maximum number of items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pushes a word onto the stack.
    pub fn push(&mut self, value: Word) -> VmResult<()> {
        if self.stack.len() >= self.capacity {
            return Err(VmError::stack_overflow(self.name, self.capacity));
        }
        self.stack.push(value);
        Ok(())
    }

    /// Pops a word from the stack.
    pub fn pop(&mut self) -> VmResult<Word> {
        self.stack
            .pop()
            .ok_or_else(|| VmError::stack_underflow(self.name))
    }

    /// Returns the word `n` positions below the top without removing it.
    pub fn peek(&self, n: usize) -> VmResult<Word> {
        self.stack
            .len()
            .checked_sub(n + 1)
            .map(|index| self.stack[index])
            .ok_or_else(|| VmError::stack_underflow(self.name))
    }

    /// Returns a mutable reference to the top word.
    pub fn top_mut(&mut self) -> VmResult<&mut Word> {
        let name = self.name;
        self.stack
            .last_mut()
            .ok_or_else(|| VmError::stack_underflow(name))
    }

    /// Replaces the top word.
    pub fn replace_top(&mut self, value: Word) -> VmResult<()> {
        *self.top_mut()? = value;
        Ok(())
    }

    /// Returns the number of items on the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns true if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Clears the stack.
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Returns the items bottom first.
    pub fn as_slice(&self) -> &[Word] {
        &self.stack
    }

    /// Returns an iterator over the items from top to bottom.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &Word> {
        self.stack.iter().rev()
    }
}

impl fmt::Display for EvaluationStack {
    /// Writes the height, then one tab-indented line per item, top first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stack (height {}):", self.stack.len())?;
        for value in self.iter_from_top() {
            writeln!(f, "\t{value}")?;
        }
        Ok(())
    }
}
