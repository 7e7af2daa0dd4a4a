//! Execution engine module for the Larum VM.
//!
//! This module provides the fetch/decode/execute loop. The engine owns an
//! [`ExecutionState`], a [`JumpTable`] and a shared [`BuiltinTable`].

use crate::boot_image;
use crate::builtins::{BuiltinOutcome, BuiltinTable};
use crate::error::{VmError, VmResult};
use crate::execution_state::ExecutionState;
use crate::jump_table::JumpTable;
use crate::vm_state::VMState;
use crate::Word;
use larum_config::{VmSettings, DEFAULT_DATA_STACK_SIZE, DEFAULT_RAM_SIZE, DEFAULT_RETURN_STACK_SIZE};
use log::{debug, trace, warn};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Restrictions on the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionEngineLimits {
    /// Memory capacity in words.
    pub ram_size: usize,

    /// The maximum number of items on the data stack.
    pub data_stack_size: usize,

    /// The maximum number of items on the return stack.
    pub return_stack_size: usize,

    /// Faults the run after this many executed opcodes, FETCH included.
    pub max_steps: Option<u64>,
}

impl ExecutionEngineLimits {
    /// The default execution engine limits.
    pub const DEFAULT: Self = Self {
        ram_size: DEFAULT_RAM_SIZE,
        data_stack_size: DEFAULT_DATA_STACK_SIZE,
        return_stack_size: DEFAULT_RETURN_STACK_SIZE,
        max_steps: None,
    };
}

impl Default for ExecutionEngineLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<&VmSettings> for ExecutionEngineLimits {
    fn from(settings: &VmSettings) -> Self {
        Self {
            ram_size: settings.ram_size,
            data_stack_size: settings.data_stack_size,
            return_stack_size: settings.return_stack_size,
            max_steps: settings.max_steps,
        }
    }
}

/// The execution engine for the Larum VM.
pub struct ExecutionEngine {
    /// The current state of the VM
    state: VMState,

    /// The jump table used to execute instructions
    jump_table: JumpTable,

    /// Host routines reachable through BUILTIN
    builtins: Arc<BuiltinTable>,

    /// Restrictions on the VM
    limits: ExecutionEngineLimits,

    /// Registers, stacks and memory
    execution_state: ExecutionState,

    /// Number of opcodes executed so far
    steps: u64,

    /// The error that put the VM into FAULT
    fault: Option<VmError>,
}

impl ExecutionEngine {
    /// Creates an engine with default limits that writes host output to stdout.
    pub fn new(builtins: Arc<BuiltinTable>) -> Self {
        Self::new_with_limits(builtins, ExecutionEngineLimits::default())
    }

    /// Creates an engine with the specified limits that writes host output to stdout.
    pub fn new_with_limits(builtins: Arc<BuiltinTable>, limits: ExecutionEngineLimits) -> Self {
        Self::from_state(builtins, limits, ExecutionState::new(&limits))
    }

    /// Creates an engine whose built-ins write to `output`.
    pub fn with_output(
        builtins: Arc<BuiltinTable>,
        limits: ExecutionEngineLimits,
        output: Box<dyn Write>,
    ) -> Self {
        Self::from_state(builtins, limits, ExecutionState::with_output(&limits, output))
    }

    fn from_state(
        builtins: Arc<BuiltinTable>,
        limits: ExecutionEngineLimits,
        execution_state: ExecutionState,
    ) -> Self {
        Self {
            state: VMState::NONE,
            jump_table: JumpTable::default(),
            builtins,
            limits,
            execution_state,
            steps: 0,
            fault: None,
        }
    }

    /// Returns the current state of the VM.
    pub fn state(&self) -> VMState {
        self.state
    }

    /// Sets the state of the VM.
    pub fn set_state(&mut self, state: VMState) {
        if self.state != state {
            debug!("vm state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Called when an error causes the VM to enter the FAULT state.
    fn on_fault(&mut self, err: VmError) {
        warn!(
            "vm fault at pc {} after {} steps: {}",
            self.execution_state.pc(),
            self.steps,
            err
        );
        self.fault = Some(err);
        self.set_state(VMState::FAULT);
    }

    /// Returns the error that faulted the VM, if any.
    pub fn fault(&self) -> Option<&VmError> {
        self.fault.as_ref()
    }

    /// Takes the fault error out of the engine.
    pub fn take_fault(&mut self) -> Option<VmError> {
        self.fault.take()
    }

    /// Number of opcodes executed so far, FETCH included.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Returns the limits the engine was created with.
    pub fn limits(&self) -> &ExecutionEngineLimits {
        &self.limits
    }

    /// Returns the built-in table.
    pub fn builtins(&self) -> &Arc<BuiltinTable> {
        &self.builtins
    }

    /// Returns the execution state.
    pub fn execution_state(&self) -> &ExecutionState {
        &self.execution_state
    }

    /// Returns the execution state (mutable).
    pub fn execution_state_mut(&mut self) -> &mut ExecutionState {
        &mut self.execution_state
    }

    /// Returns the jump table.
    pub fn jump_table(&self) -> &JumpTable {
        &self.jump_table
    }

    /// Returns the jump table (mutable).
    pub fn jump_table_mut(&mut self) -> &mut JumpTable {
        &mut self.jump_table
    }

    /// Copies raw program words to address 0 without pushing boot arguments.
    pub fn load_program(&mut self, program: &[Word]) -> VmResult<()> {
        self.execution_state.memory_mut().write_image(program)?;
        self.execution_state.set_pc(0)?;
        self.execution_state.isr_mut().invalidate();
        debug!("loaded {} program words", program.len());
        Ok(())
    }

    /// Loads a boot image and pushes the boot arguments.
    ///
    /// Any earlier run is discarded: memory is zeroed, both stacks are
    /// cleared and the state, fault and step count start over. After a
    /// successful boot the data stack holds the memory capacity with the
    /// program size above it. Returns the program size in words.
    pub fn boot<R: Read>(&mut self, reader: R) -> VmResult<usize> {
        self.state = VMState::NONE;
        self.fault = None;
        self.steps = 0;
        self.execution_state.data_stack_mut().clear();
        self.execution_state.return_stack_mut().clear();
        self.execution_state.memory_mut().as_mut_slice().fill(0);

        let size = boot_image::load(reader, self.execution_state.memory_mut())?;
        self.execution_state.set_pc(0)?;
        self.execution_state.set_a(0);
        self.execution_state.isr_mut().invalidate();

        let capacity = self.execution_state.memory().len() as Word;
        self.execution_state.push(capacity)?;
        self.execution_state.push(size as Word)?;

        debug!("booted {size} word image into {capacity} words of memory");
        Ok(size)
    }

    /// Opens and boots an image file.
    pub fn boot_file<P: AsRef<Path>>(&mut self, path: P) -> VmResult<usize> {
        let file = std::fs::File::open(path.as_ref()).map_err(boot_image::LoadError::from)?;
        self.boot(std::io::BufReader::new(file))
    }

    /// Starts execution of the VM and runs until HALT or FAULT.
    pub fn execute(&mut self) -> VMState {
        while !self.state.is_terminal() {
            if let Err(err) = self.execute_next() {
                self.on_fault(err);
            }
        }

        self.state
    }

    /// Executes a single opcode and returns the resulting state.
    pub fn step_next(&mut self) -> VMState {
        if let Err(err) = self.execute_next() {
            self.on_fault(err);
        }
        self.state
    }

    /// Executes the next opcode.
    pub fn execute_next(&mut self) -> VmResult<()> {
        if self.state.is_terminal() {
            return Ok(());
        }

        if let Some(max_steps) = self.limits.max_steps {
            if self.steps >= max_steps {
                return Err(VmError::StepLimitExceeded(max_steps));
            }
        }

        let opcode = self.execution_state.isr_mut().next_opcode()?;
        trace!(
            "pc={} a={} op={} depth={}",
            self.execution_state.pc(),
            self.execution_state.a(),
            opcode,
            self.execution_state.data_stack().len()
        );

        let handler = self
            .jump_table
            .get_handler(opcode)
            .ok_or(VmError::InvalidOpcode(opcode as u8))?;
        self.steps += 1;
        handler(self, opcode)
    }

    /// Calls the built-in registered under `id`.
    ///
    /// A built-in that moves the program counter discards the pending fields
    /// of the instruction register. A built-in that asks to halt puts the VM
    /// into HALT.
    pub fn invoke_builtin(&mut self, id: Word) -> VmResult<()> {
        let descriptor = *self.builtins.get(id)?;
        debug!("builtin {} ({})", id, descriptor.name);

        let pc = self.execution_state.pc();
        let outcome = (descriptor.handler)(&mut self.execution_state)?;
        if self.execution_state.pc() != pc {
            self.execution_state.isr_mut().invalidate();
        }

        if outcome == BuiltinOutcome::Halt {
            self.set_state(VMState::HALT);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("state", &self.state)
            .field("limits", &self.limits)
            .field("steps", &self.steps)
            .field("fault", &self.fault)
            .field("execution_state", &self.execution_state)
            .finish_non_exhaustive()
    }
}
