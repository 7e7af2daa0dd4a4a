//! Integration tests for the Larum VM execution engine.

use larum_vm::error::VmError;
use larum_vm::execution_engine::{ExecutionEngine, ExecutionEngineLimits};
use larum_vm::instruction::pack;
use larum_vm::op_code::OpCode;
use larum_vm::program_builder::ProgramBuilder;
use larum_vm::vm_state::VMState;
use larum_vm::{BuiltinTable, StandardBuiltin, Word};
use std::io;
use std::sync::Arc;

const EXIT: Word = StandardBuiltin::Exit as Word;

fn engine_with_limits(limits: ExecutionEngineLimits) -> ExecutionEngine {
    ExecutionEngine::with_output(
        Arc::new(BuiltinTable::standard()),
        limits,
        Box::new(io::sink()),
    )
}

fn run(program: &[Word]) -> ExecutionEngine {
    let mut engine = engine_with_limits(ExecutionEngineLimits::default());
    engine.load_program(program).unwrap();
    engine.execute();
    engine
}

fn data_stack(engine: &ExecutionEngine) -> Vec<Word> {
    engine.execution_state().data_stack().as_slice().to_vec()
}

#[test]
fn test_bitwise_program() {
    let mut builder = ProgramBuilder::new();
    builder
        .emit_lit(3)
        .emit_lit(9)
        .emit(OpCode::XOR)
        .emit_lit(3)
        .emit_lit(9)
        .emit(OpCode::AND)
        .emit_lit(3)
        .emit_lit(9)
        .emit(OpCode::OR)
        .emit_builtin(EXIT);

    let engine = run(&builder.build());

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(data_stack(&engine), vec![10, 1, 11]);
    assert!(engine.fault().is_none());
}

#[test]
fn test_invalid_builtin_faults() {
    let mut builder = ProgramBuilder::new();
    builder.emit_lit(1).emit_builtin(99);

    let engine = run(&builder.build());

    assert_eq!(engine.state(), VMState::FAULT);
    let fault = engine.fault().unwrap();
    assert!(matches!(fault, VmError::InvalidBuiltin { id: 99, count: 4 }));
    assert!(fault.is_fatal());
}

#[test]
fn test_six_fields_then_refill() {
    let mut builder = ProgramBuilder::new();
    for _ in 0..6 {
        builder.emit(OpCode::LIT1);
    }
    builder.emit_builtin(EXIT);
    let program = builder.build();
    assert_eq!(program.len(), 3);

    let engine = run(&program);

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(data_stack(&engine), vec![1; 6]);
    // FETCH, six LIT1, FETCH, BUILTIN
    assert_eq!(engine.steps(), 9);
}

#[test]
fn test_unused_top_bits_are_ignored() {
    let program = [
        pack(&[OpCode::LIT1; 6]).unwrap() | (0b11u32 << 30) as Word,
        pack(&[OpCode::BUILTIN]).unwrap(),
        EXIT,
    ];

    let engine = run(&program);

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(data_stack(&engine).len(), 6);
}

#[test]
fn test_call_and_ret() {
    let mut builder = ProgramBuilder::new();
    let call = builder.emit_forward_jump(OpCode::CALL);
    builder.emit_lit(5).emit_builtin(EXIT);
    let subroutine = builder.label();
    builder.emit(OpCode::LIT1).emit(OpCode::RET);
    builder.patch(call, subroutine).unwrap();

    let engine = run(&builder.build());

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(data_stack(&engine), vec![1, 5]);
    assert!(engine.execution_state().return_stack().is_empty());
}

#[test]
fn test_nested_calls() {
    let mut builder = ProgramBuilder::new();
    let outer = builder.emit_forward_jump(OpCode::CALL);
    builder.emit_builtin(EXIT);

    let outer_address = builder.label();
    builder.emit_lit(10);
    let inner = builder.emit_forward_jump(OpCode::CALL);
    builder.emit(OpCode::ADD).emit(OpCode::RET);

    let inner_address = builder.label();
    builder.emit_lit(32).emit(OpCode::RET);

    builder.patch(outer, outer_address).unwrap();
    builder.patch(inner, inner_address).unwrap();

    let engine = run(&builder.build());

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(data_stack(&engine), vec![42]);
}

#[test]
fn test_unbounded_recursion_overflows_return_stack() {
    let mut engine = engine_with_limits(ExecutionEngineLimits {
        return_stack_size: 8,
        ..ExecutionEngineLimits::default()
    });
    let mut builder = ProgramBuilder::new();
    let top = builder.label();
    builder.emit_call(top);
    engine.load_program(&builder.build()).unwrap();

    assert_eq!(engine.execute(), VMState::FAULT);
    assert!(matches!(
        engine.fault(),
        Some(VmError::StackOverflow { stack: "return", capacity: 8 })
    ));
    assert_eq!(engine.execution_state().return_stack().len(), 8);
}

#[test]
fn test_countdown_loop() {
    let mut builder = ProgramBuilder::new();
    builder.emit_lit(5);
    let top = builder.label();
    let done = builder.emit_forward_jump(OpCode::JMPZ);
    builder
        .emit(OpCode::LIT1)
        .emit(OpCode::SUB)
        .emit_jump(OpCode::JMP, top);
    let end = builder.label();
    builder.emit_builtin(EXIT);
    builder.patch(done, end).unwrap();

    let engine = run(&builder.build());

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(data_stack(&engine), vec![0]);
}

#[test]
fn test_jmpn_branches_on_negative() {
    let mut builder = ProgramBuilder::new();
    builder.emit_lit(-3);
    let negative = builder.emit_forward_jump(OpCode::JMPN);
    builder.emit_lit(100).emit_builtin(EXIT);
    let target = builder.label();
    builder.emit(OpCode::NOT).emit_builtin(EXIT);
    builder.patch(negative, target).unwrap();

    let engine = run(&builder.build());

    assert_eq!(data_stack(&engine), vec![2]);
}

#[test]
fn test_memory_walks() {
    let mut builder = ProgramBuilder::new();
    builder
        .emit_lit(200)
        .emit(OpCode::POPA)
        .emit_lit(7)
        .emit(OpCode::STAINC)
        .emit_lit(8)
        .emit(OpCode::STAINC)
        .emit(OpCode::PUSHA)
        .emit_lit(200)
        .emit(OpCode::PUSHR)
        .emit(OpCode::LDRINC)
        .emit(OpCode::LDRINC)
        .emit(OpCode::ADD)
        .emit(OpCode::POPR)
        .emit_builtin(EXIT);

    let engine = run(&builder.build());

    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(data_stack(&engine), vec![202, 15, 202]);
    assert_eq!(engine.execution_state().a(), 202);
    assert_eq!(
        &engine.execution_state().memory().as_slice()[200..202],
        &[7, 8]
    );
}

#[test]
fn test_running_off_memory_faults() {
    let mut engine = engine_with_limits(ExecutionEngineLimits {
        ram_size: 2,
        ..ExecutionEngineLimits::default()
    });
    engine.load_program(&[pack(&[OpCode::NOP]).unwrap()]).unwrap();

    assert_eq!(engine.execute(), VMState::FAULT);
    assert!(matches!(
        engine.fault(),
        Some(VmError::MemoryOutOfBounds { address: 2, size: 2 })
    ));
}

#[test]
fn test_data_stack_overflow() {
    let mut engine = engine_with_limits(ExecutionEngineLimits {
        data_stack_size: 2,
        ..ExecutionEngineLimits::default()
    });
    let mut builder = ProgramBuilder::new();
    builder
        .emit(OpCode::LIT1)
        .emit(OpCode::DUP)
        .emit(OpCode::DUP)
        .emit_builtin(EXIT);
    engine.load_program(&builder.build()).unwrap();

    assert_eq!(engine.execute(), VMState::FAULT);
    assert!(matches!(
        engine.fault(),
        Some(VmError::StackOverflow { stack: "data", .. })
    ));
    assert_eq!(data_stack(&engine), vec![1, 1]);
    assert!(!engine.fault().unwrap().is_fatal());
}

#[test]
fn test_boot_arguments_visible_to_program() {
    let mut engine = engine_with_limits(ExecutionEngineLimits {
        ram_size: 32,
        ..ExecutionEngineLimits::default()
    });
    let mut builder = ProgramBuilder::new();
    builder.emit(OpCode::SUB).emit_builtin(EXIT);
    let image = builder.to_boot_image();

    let size = engine.boot(&image.to_bytes()[..]).unwrap();
    assert_eq!(size, 2);

    assert_eq!(engine.execute(), VMState::HALT);
    assert_eq!(data_stack(&engine), vec![30]);
}
