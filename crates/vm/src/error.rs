//! Error types for the Larum VM.

use crate::boot_image::LoadError;
use crate::Word;
use thiserror::Error;

/// Represents errors during VM execution.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("{stack} stack overflow (capacity {capacity})")]
    StackOverflow {
        stack: &'static str,
        capacity: usize,
    },

    #[error("{stack} stack underflow")]
    StackUnderflow { stack: &'static str },

    #[error("memory access out of bounds: address {address}, memory size {size}")]
    MemoryOutOfBounds { address: i64, size: usize },

    #[error("invalid jump target {target} (memory size {size})")]
    InvalidJump { target: Word, size: usize },

    #[error("invalid opcode field: {0}")]
    InvalidOpcode(u8),

    #[error("bad built-in ID {id} (valid range 0..{count})")]
    InvalidBuiltin { id: Word, count: usize },

    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("boot image rejected: {0}")]
    Load(#[from] LoadError),

    #[error("host I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl VmError {
    /// Creates an invalid operation error with a message.
    pub fn invalid_operation_msg(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Creates a stack overflow error for the named stack.
    pub fn stack_overflow(stack: &'static str, capacity: usize) -> Self {
        Self::StackOverflow { stack, capacity }
    }

    /// Creates a stack underflow error for the named stack.
    pub fn stack_underflow(stack: &'static str) -> Self {
        Self::StackUnderflow { stack }
    }

    /// Errors that stem from a malformed image or encoding rather than a
    /// program misbehaving at run time.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidBuiltin { .. } | Self::Load(_))
    }
}

/// Result type for VM operations
pub type VmResult<T> = Result<T, VmError>;
