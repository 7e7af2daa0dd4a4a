//! # Larum-RS: a packed-bytecode stack machine in Rust
//!
//! Larum is a small stack machine in the Gullwing tradition. Six 5-bit
//! opcodes share one 32-bit instruction word, operands follow their word in
//! the instruction stream, and host services are reached through numbered
//! built-ins.
//!
//! ## Quick Start
//!
//! ```rust
//! use larum_rs::prelude::*;
//! use std::sync::Arc;
//!
//! let mut program = ProgramBuilder::new();
//! program
//!     .emit_lit(3)
//!     .emit_lit(9)
//!     .emit(OpCode::XOR)
//!     .emit_builtin(StandardBuiltin::Exit.id());
//!
//! let mut engine = ExecutionEngine::new(Arc::new(BuiltinTable::standard()));
//! engine.boot(&program.to_boot_image().to_bytes()[..])?;
//! assert_eq!(engine.execute(), VMState::HALT);
//! assert_eq!(engine.execution_state().data_stack().peek(0)?, 10);
//! # Ok::<(), VmError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - resource limits and TOML settings
//! - [`vm`] - boot image loader, execution engine and built-ins

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use larum_config as config;
pub use larum_vm as vm;

/// Common imports for Larum development
pub mod prelude {
    pub use crate::config::VmSettings;
    pub use crate::vm::{
        BootImage, BuiltinOutcome, BuiltinTable, ExecutionEngine, ExecutionEngineLimits,
        ExecutionState, OpCode, ProgramBuilder, StandardBuiltin, VMState, VmError, VmResult, Word,
    };
}

/// Larum library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
