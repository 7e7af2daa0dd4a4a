//! Control flow operations for the Larum VM.
//!
//! Every handler here either refills the instruction register or moves the
//! program counter. Jump targets are absolute word addresses read from the
//! instruction stream.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;
use log::debug;

/// Registers the control flow handlers.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::FETCH, fetch);
    jump_table.register(OpCode::NOP, nop);
    jump_table.register(OpCode::JMP, jmp);
    jump_table.register(OpCode::JMPZ, jmpz);
    jump_table.register(OpCode::JMPN, jmpn);
    jump_table.register(OpCode::CALL, call);
    jump_table.register(OpCode::RET, ret);
}

/// Implements the FETCH operation.
fn fetch(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let address = state.pc();
    let word = state.read_stream()?;
    debug!("fetched instruction word {word:#010x} at {address}");
    state.isr_mut().load(word);
    Ok(())
}

/// Implements the NOP operation.
fn nop(_engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    Ok(())
}

/// Implements the JMP operation.
fn jmp(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let target = state.read_stream()?;
    state.jump(target)
}

/// Implements the JMPZ operation. The tested value stays on the stack.
fn jmpz(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let target = state.read_stream()?;
    if state.peek()? == 0 {
        state.jump(target)?;
    }
    Ok(())
}

/// Implements the JMPN operation. The tested value stays on the stack.
fn jmpn(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let target = state.read_stream()?;
    if state.peek()? < 0 {
        state.jump(target)?;
    }
    Ok(())
}

/// Implements the CALL operation.
fn call(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let target = state.read_stream()?;

    // PC already points past the operand.
    let return_address = state.pc();
    state.return_stack_mut().push(return_address)?;
    state.jump(target)
}

/// Implements the RET operation.
fn ret(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    let state = engine.execution_state_mut();
    let target = state.return_stack().peek(0)?;
    state.jump(target)?;
    state.return_stack_mut().pop()?;
    Ok(())
}
