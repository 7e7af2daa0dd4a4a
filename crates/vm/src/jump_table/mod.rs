//! Jump table module for the Larum VM.
//!
//! This module maps every opcode to the function that executes it.

pub mod bitwise;
pub mod builtin;
pub mod control;
pub mod memory;
pub mod numeric;
pub mod push;
pub mod stack;

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::op_code::OpCode;
use strum::EnumCount;

/// A handler for a VM instruction.
pub type InstructionHandler = fn(&mut ExecutionEngine, OpCode) -> VmResult<()>;

/// Represents a jump table for the VM.
#[derive(Clone)]
pub struct JumpTable {
    /// The handlers for each opcode, indexed by field value.
    handlers: [Option<InstructionHandler>; OpCode::COUNT],
}

impl Default for JumpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpTable {
    /// Creates a jump table with the standard handlers.
    pub fn new() -> Self {
        let mut jump_table = Self {
            handlers: [None; OpCode::COUNT],
        };

        jump_table.register_default_handlers();

        jump_table
    }

    /// Registers a handler for an opcode, replacing any previous one.
    pub fn register(&mut self, opcode: OpCode, handler: InstructionHandler) {
        self.handlers[opcode as usize] = Some(handler);
    }

    /// Gets the handler for an opcode.
    pub fn get_handler(&self, opcode: OpCode) -> Option<InstructionHandler> {
        self.handlers[opcode as usize]
    }

    /// Registers the default handlers for all opcodes.
    fn register_default_handlers(&mut self) {
        control::register_handlers(self);
        stack::register_handlers(self);
        numeric::register_handlers(self);
        bitwise::register_handlers(self);
        push::register_handlers(self);
        memory::register_handlers(self);
        builtin::register_handlers(self);
    }
}
