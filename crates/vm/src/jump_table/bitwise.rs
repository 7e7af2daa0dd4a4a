//! Bitwise operations for the Larum VM.
//!
//! This module provides the shift and logic handlers.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::numeric::binary;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;
use crate::Word;

/// Registers the bitwise operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::SHR, shr);
    jump_table.register(OpCode::SHL, shl);
    jump_table.register(OpCode::NOT, not);
    jump_table.register(OpCode::AND, and);
    jump_table.register(OpCode::XOR, xor);
    jump_table.register(OpCode::OR, or);
}

fn unary(engine: &mut ExecutionEngine, f: fn(Word) -> Word) -> VmResult<()> {
    let top = engine.execution_state_mut().data_stack_mut().top_mut()?;
    *top = f(*top);
    Ok(())
}

/// Implements the SHR operation: arithmetic shift right by one.
fn shr(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    unary(engine, |x| x >> 1)
}

/// Implements the SHL operation: logical shift left by one.
fn shl(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    unary(engine, |x| ((x as u32) << 1) as Word)
}

/// Implements the NOT operation.
fn not(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    unary(engine, |x| !x)
}

/// Implements the AND operation.
fn and(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    binary(engine, |a, b| a & b)
}

/// Implements the XOR operation.
fn xor(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    binary(engine, |a, b| a ^ b)
}

/// Implements the OR operation.
fn or(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    binary(engine, |a, b| a | b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinTable;
    use std::sync::Arc;

    fn engine_with(values: &[Word]) -> ExecutionEngine {
        let mut engine = ExecutionEngine::new(Arc::new(BuiltinTable::standard()));
        for value in values {
            engine.execution_state_mut().push(*value).unwrap();
        }
        engine
    }

    #[test]
    fn test_shifts() {
        let mut engine = engine_with(&[-8]);
        shr(&mut engine, OpCode::SHR).unwrap();
        assert_eq!(engine.execution_state().peek().unwrap(), -4);

        let mut engine = engine_with(&[0x4000_0001]);
        shl(&mut engine, OpCode::SHL).unwrap();
        assert_eq!(engine.execution_state().peek().unwrap(), 0x8000_0002u32 as Word);
    }

    #[test]
    fn test_not() {
        let mut engine = engine_with(&[0]);
        not(&mut engine, OpCode::NOT).unwrap();
        assert_eq!(engine.execution_state().peek().unwrap(), -1);
    }

    #[test]
    fn test_logic() {
        let mut engine = engine_with(&[0b1100, 0b1010]);
        and(&mut engine, OpCode::AND).unwrap();
        assert_eq!(engine.execution_state().peek().unwrap(), 0b1000);

        let mut engine = engine_with(&[0b1100, 0b1010]);
        xor(&mut engine, OpCode::XOR).unwrap();
        assert_eq!(engine.execution_state().peek().unwrap(), 0b0110);

        let mut engine = engine_with(&[0b1100, 0b1010]);
        or(&mut engine, OpCode::OR).unwrap();
        assert_eq!(engine.execution_state().peek().unwrap(), 0b1110);
        assert_eq!(engine.execution_state().data_stack().len(), 1);
    }

    #[test]
    fn test_unary_on_empty_stack() {
        let mut engine = engine_with(&[]);
        assert!(not(&mut engine, OpCode::NOT).is_err());
    }
}
