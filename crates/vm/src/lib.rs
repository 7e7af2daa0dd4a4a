//! Larum Virtual Machine implementation.
//!
//! A small stack machine in the Gullwing style. Instruction words carry six
//! packed 5-bit opcodes, operands follow their packed word in the
//! instruction stream, and host services are reached through numbered
//! built-ins.
//!
//! ```no_run
//! use larum_vm::{BuiltinTable, ExecutionEngine, VMState};
//! use std::sync::Arc;
//!
//! let mut engine = ExecutionEngine::new(Arc::new(BuiltinTable::standard()));
//! engine.boot_file("program.lrm")?;
//! assert_eq!(engine.execute(), VMState::HALT);
//! # Ok::<(), larum_vm::VmError>(())
//! ```

pub mod boot_image;
pub mod builtins;
pub mod error;
pub mod evaluation_stack;
pub mod execution_engine;
pub mod execution_state;
pub mod instruction;
pub mod jump_table;
pub mod memory;
pub mod op_code;
pub mod program_builder;
pub mod vm_state;

/// The machine word.
pub type Word = i32;

/// Size of a word in bytes.
pub const WORD_SIZE: usize = std::mem::size_of::<Word>();

pub use boot_image::{BootImage, LoadError, MAGIC};
pub use builtins::{BuiltinHandler, BuiltinOutcome, BuiltinTable, StandardBuiltin};
pub use error::{VmError, VmResult};
pub use evaluation_stack::EvaluationStack;
pub use execution_engine::{ExecutionEngine, ExecutionEngineLimits};
pub use execution_state::ExecutionState;
pub use instruction::InstructionRegister;
pub use jump_table::JumpTable;
pub use memory::Memory;
pub use op_code::OpCode;
pub use program_builder::ProgramBuilder;
pub use vm_state::VMState;
