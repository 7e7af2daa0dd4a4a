//! Stack operations for the Larum VM.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;

/// Registers the stack operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::DUP, dup);
    jump_table.register(OpCode::DROP, drop);
    jump_table.register(OpCode::OVER, over);
    jump_table.register(OpCode::PUSHA, pusha);
    jump_table.register(OpCode::POPA, popa);
    jump_table.register(OpCode::PUSHR, pushr);
    jump_table.register(OpCode::POPR, popr);
}

/// Implements the DUP operation.
fn dup(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let value = state.peek()?;
    state.push(value)
}

/// Implements the DROP operation.
fn drop(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    engine.execution_state_mut().pop()?;
    Ok(())
}

/// Implements the OVER operation.
fn over(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let value = state.data_stack().peek(1)?;
    state.push(value)
}

/// Implements the PUSHA operation: copies A onto the data stack.
fn pusha(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let a = state.a();
    state.push(a)
}

/// Implements the POPA operation: moves the data stack top into A.
fn popa(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let value = state.pop()?;
    state.set_a(value);
    Ok(())
}

/// Implements the PUSHR operation: moves the data stack top to the return stack.
fn pushr(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let value = state.peek()?;
    state.return_stack_mut().push(value)?;
    state.pop()?;
    Ok(())
}

/// Implements the POPR operation: moves the return stack top to the data stack.
fn popr(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let value = state.return_stack_mut().pop()?;
    state.push(value)
}
