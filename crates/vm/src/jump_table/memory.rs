//! Memory access operations for the Larum VM.
//!
//! LDA/STA and their auto-increment forms address memory through A.
//! LDRINC/STRINC use the top of the return stack as a pointer and bump it in
//! place, which lets a routine walk a buffer without touching A.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;

/// Registers the memory access handlers.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::LDA, lda);
    jump_table.register(OpCode::STA, sta);
    jump_table.register(OpCode::LDAINC, ldainc);
    jump_table.register(OpCode::STAINC, stainc);
    jump_table.register(OpCode::LDRINC, ldrinc);
    jump_table.register(OpCode::STRINC, strinc);
}

fn load_via_a(engine: &mut ExecutionEngine, increment: bool) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let address = state.a();
    let value = state.memory().load(address)?;
    state.push(value)?;
    if increment {
        state.set_a(address.wrapping_add(1));
    }
    Ok(())
}

fn store_via_a(engine: &mut ExecutionEngine, increment: bool) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let address = state.a();
    let value = state.peek()?;
    state.memory_mut().store(address, value)?;
    state.pop()?;
    if increment {
        state.set_a(address.wrapping_add(1));
    }
    Ok(())
}

/// Implements the LDA operation.
fn lda(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    load_via_a(engine, false)
}

/// Implements the STA operation.
fn sta(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    store_via_a(engine, false)
}

/// Implements the LDAINC operation.
fn ldainc(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    load_via_a(engine, true)
}

/// Implements the STAINC operation.
fn stainc(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    store_via_a(engine, true)
}

/// Implements the LDRINC operation.
fn ldrinc(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let address = state.return_stack().peek(0)?;
    let value = state.memory().load(address)?;
    state.push(value)?;
    state.return_stack_mut().replace_top(address.wrapping_add(1))
}

/// Implements the STRINC operation.
fn strinc(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let address = state.return_stack().peek(0)?;
    let value = state.peek()?;
    state.memory_mut().store(address, value)?;
    state.pop()?;
    state.return_stack_mut().replace_top(address.wrapping_add(1))
}
