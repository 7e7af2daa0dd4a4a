//! Literal push operations for the Larum VM.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;

/// Registers the push handlers.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::LIT, lit);
    jump_table.register(OpCode::LIT1, lit1);
}

/// Implements the LIT operation: pushes the next stream word.
fn lit(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let value = state.read_stream()?;
    state.push(value)
}

/// Implements the LIT1 operation.
fn lit1(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    engine.execution_state_mut().push(1)
}
