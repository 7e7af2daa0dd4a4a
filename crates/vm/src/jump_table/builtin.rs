//! The BUILTIN operation.
//!
//! The operand selects an entry of the engine's [`BuiltinTable`]. Dispatch
//! itself lives on the engine so that host code can invoke a built-in
//! without going through the instruction stream.
//!
//! [`BuiltinTable`]: crate::builtins::BuiltinTable

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;

/// Registers the BUILTIN handler.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::BUILTIN, builtin);
}

/// Implements the BUILTIN operation.
fn builtin(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let id = engine.execution_state_mut().read_stream()?;
    engine.invoke_builtin(id)
}
