//! Arithmetic operations for the Larum VM.
//!
//! All arithmetic wraps on overflow.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::op_code::OpCode;
use crate::Word;

/// Registers the arithmetic handlers.
pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::ADD, add);
    jump_table.register(OpCode::SUB, sub);
    jump_table.register(OpCode::MUL, mul);
}

/// Replaces `a b` with `f(a, b)`. The stack is untouched on underflow.
pub(crate) fn binary(engine: &mut ExecutionEngine, f: fn(Word, Word) -> Word) -> VmResult<()> {
    let stack = engine.execution_state_mut().data_stack_mut();
    let b = stack.peek(0)?;
    let a = stack.peek(1)?;
    stack.pop()?;
    stack.replace_top(f(a, b))
}

/// Implements the ADD operation.
fn add(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    binary(engine, Word::wrapping_add)
}

/// Implements the SUB operation: second minus top.
fn sub(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    binary(engine, Word::wrapping_sub)
}

/// Implements the MUL operation.
fn mul(engine: &mut ExecutionEngine, _opcode: OpCode) -> VmResult<()> {
    binary(engine, Word::wrapping_mul)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinTable;
    use std::sync::Arc;

    fn run(handler: fn(&mut ExecutionEngine, OpCode) -> VmResult<()>, a: Word, b: Word) -> Word {
        let mut engine = ExecutionEngine::new(Arc::new(BuiltinTable::standard()));
        engine.execution_state_mut().push(a).unwrap();
        engine.execution_state_mut().push(b).unwrap();
        handler(&mut engine, OpCode::NOP).unwrap();
        assert_eq!(engine.execution_state().data_stack().len(), 1);
        engine.execution_state_mut().pop().unwrap()
    }

    #[test]
    fn test_sub_order() {
        assert_eq!(run(sub, 10, 3), 7);
        assert_eq!(run(sub, 3, 10), -7);
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(run(add, Word::MAX, 1), Word::MIN);
        assert_eq!(run(sub, Word::MIN, 1), Word::MAX);
        assert_eq!(run(mul, 0x4000_0000, 4), 0);
        assert_eq!(run(mul, -6, 7), -42);
    }

    #[test]
    fn test_underflow_leaves_error() {
        let mut engine = ExecutionEngine::new(Arc::new(BuiltinTable::standard()));
        engine.execution_state_mut().push(1).unwrap();
        assert!(add(&mut engine, OpCode::ADD).is_err());
        assert_eq!(engine.execution_state().data_stack().as_slice(), &[1]);
    }
}
