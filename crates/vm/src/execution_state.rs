//! Execution state of the Larum VM.
//!
//! The register file (PC, A, ISR), both stacks and memory live here. The
//! engine and every built-in work on this one structure, so nothing has to
//! be copied out and back around a built-in call.

use crate::error::{VmError, VmResult};
use crate::evaluation_stack::EvaluationStack;
use crate::execution_engine::ExecutionEngineLimits;
use crate::instruction::InstructionRegister;
use crate::memory::Memory;
use crate::Word;
use std::fmt;
use std::io::{self, Write};

/// Registers, stacks and memory of one VM run.
pub struct ExecutionState {
    /// Program counter, an index into memory
    pc: usize,

    /// Address register used by LDA/STA and friends
    a: Word,

    /// Pending packed opcode fields
    isr: InstructionRegister,

    /// Linear word memory
    memory: Memory,

    /// Operand stack
    data_stack: EvaluationStack,

    /// Saved program counters
    return_stack: EvaluationStack,

    /// Sink for host output produced by built-ins
    output: Box<dyn Write>,
}

impl ExecutionState {
    /// Creates a zeroed state sized by `limits`, writing host output to stdout.
    pub fn new(limits: &ExecutionEngineLimits) -> Self {
        Self::with_output(limits, Box::new(io::stdout()))
    }

    /// Creates a zeroed state sized by `limits` with a custom output sink.
    pub fn with_output(limits: &ExecutionEngineLimits, output: Box<dyn Write>) -> Self {
        Self {
            pc: 0,
            a: 0,
            isr: InstructionRegister::new(),
            memory: Memory::new(limits.ram_size),
            data_stack: EvaluationStack::new("data", limits.data_stack_size),
            return_stack: EvaluationStack::new("return", limits.return_stack_size),
            output,
        }
    }

    /// Returns the program counter as a word.
    pub fn pc(&self) -> Word {
        self.pc as Word
    }

    /// Moves the program counter. The target must lie inside memory.
    ///
    /// The instruction register is left untouched; use [`Self::jump`] to
    /// transfer control.
    pub fn set_pc(&mut self, target: Word) -> VmResult<()> {
        self.pc = self.memory.resolve(target).map_err(|_| VmError::InvalidJump {
            target,
            size: self.memory.len(),
        })?;
        Ok(())
    }

    /// Transfers control to `target` and discards the pending fields.
    pub fn jump(&mut self, target: Word) -> VmResult<()> {
        self.set_pc(target)?;
        self.isr.invalidate();
        Ok(())
    }

    /// Reads the next word of the instruction stream and advances PC.
    pub fn read_stream(&mut self) -> VmResult<Word> {
        let word = self.memory.load_index(self.pc)?;
        self.pc += 1;
        Ok(word)
    }

    /// Returns the address register.
    pub fn a(&self) -> Word {
        self.a
    }

    /// Sets the address register.
    pub fn set_a(&mut self, value: Word) {
        self.a = value;
    }

    /// Returns the instruction register.
    pub fn isr(&self) -> &InstructionRegister {
        &self.isr
    }

    /// Returns the instruction register (mutable).
    pub fn isr_mut(&mut self) -> &mut InstructionRegister {
        &mut self.isr
    }

    /// Returns the memory.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the memory (mutable).
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Returns the data stack.
    pub fn data_stack(&self) -> &EvaluationStack {
        &self.data_stack
    }

    /// Returns the data stack (mutable).
    pub fn data_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.data_stack
    }

    /// Returns the return stack.
    pub fn return_stack(&self) -> &EvaluationStack {
        &self.return_stack
    }

    /// Returns the return stack (mutable).
    pub fn return_stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.return_stack
    }

    /// Returns the host output sink.
    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Replaces the host output sink.
    pub fn set_output(&mut self, output: Box<dyn Write>) {
        self.output = output;
    }

    /// Pushes onto the data stack.
    pub fn push(&mut self, value: Word) -> VmResult<()> {
        self.data_stack.push(value)
    }

    /// Pops from the data stack.
    pub fn pop(&mut self) -> VmResult<Word> {
        self.data_stack.pop()
    }

    /// Returns the top of the data stack.
    pub fn peek(&self) -> VmResult<Word> {
        self.data_stack.peek(0)
    }
}

impl fmt::Debug for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionState")
            .field("pc", &self.pc)
            .field("a", &self.a)
            .field("isr", &self.isr)
            .field("memory_size", &self.memory.len())
            .field("data_stack", &self.data_stack.as_slice())
            .field("return_stack", &self.return_stack.as_slice())
            .finish()
    }
}
