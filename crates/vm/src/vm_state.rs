//! VM state implementation.

/// Indicates the status of the VM.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMState {
    /// Indicates that the execution is in progress or has not yet begun.
    NONE = 0,

    /// Indicates that a built-in requested termination.
    HALT = 1 << 0,

    /// Indicates that the execution stopped on an error.
    FAULT = 1 << 1,
}

impl VMState {
    #[inline]
    pub fn is_none(self) -> bool {
        self == VMState::NONE
    }

    #[inline]
    pub fn is_halt(self) -> bool {
        self == VMState::HALT
    }

    #[inline]
    pub fn is_fault(self) -> bool {
        self == VMState::FAULT
    }

    /// Returns true once the engine can no longer make progress.
    #[inline]
    pub fn is_terminal(self) -> bool {
        self.is_halt() || self.is_fault()
    }
}
