//! Built-in dispatch table for the Larum VM.
//!
//! A built-in is a host routine invoked by `BUILTIN <id>`. It receives the
//! whole [`ExecutionState`] and may change any register, stack or memory
//! cell. Its return value tells the engine whether to keep running.

use crate::error::{VmError, VmResult};
use crate::execution_state::ExecutionState;
use crate::Word;
use log::debug;
use std::fmt;

/// What the engine does after a built-in returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
    /// Resume the fetch/execute loop.
    Continue,
    /// Stop the loop; the VM enters HALT.
    Halt,
}

/// A host routine reachable through `BUILTIN`.
pub type BuiltinHandler = fn(state: &mut ExecutionState) -> VmResult<BuiltinOutcome>;

/// Represents one entry of the dispatch table.
#[derive(Clone, Copy)]
pub struct BuiltinDescriptor {
    /// Name shown in diagnostics
    pub name: &'static str,

    /// The handler function
    pub handler: BuiltinHandler,
}

impl fmt::Debug for BuiltinDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// IDs of the standard built-ins.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardBuiltin {
    /// Ends the run.
    Exit = 0,
    /// Writes a greeting.
    Hello = 1,
    /// Writes the data stack, top first, without changing it.
    DumpStack = 2,
    /// Pops length, then address, and writes that many bytes of memory.
    WriteStdout = 3,
}

impl StandardBuiltin {
    /// Returns the ID used as the `BUILTIN` operand.
    pub fn id(self) -> Word {
        self as Word
    }
}

/// Maps built-in IDs in `[0, len)` to handlers.
///
/// The table is filled before it is handed to an engine and is read-only
/// afterwards; engines share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct BuiltinTable {
    entries: Vec<BuiltinDescriptor>,
}

impl BuiltinTable {
    /// Creates a table without entries.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates the standard table: exit, hello, dump_stack, write_stdout.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register("exit", exit);
        table.register("hello", hello);
        table.register("dump_stack", dump_stack);
        table.register("write_stdout", write_stdout);
        table
    }

    /// Appends a handler and returns its ID. IDs stay contiguous.
    pub fn register(&mut self, name: &'static str, handler: BuiltinHandler) -> Word {
        let id = self.entries.len() as Word;
        self.entries.push(BuiltinDescriptor { name, handler });
        id
    }

    /// Looks up a built-in, rejecting IDs outside the registered range.
    pub fn get(&self, id: Word) -> VmResult<&BuiltinDescriptor> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.entries.get(index))
            .ok_or(VmError::InvalidBuiltin {
                id,
                count: self.entries.len(),
            })
    }

    /// Number of registered built-ins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the registered names in ID order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
}

fn exit(_state: &mut ExecutionState) -> VmResult<BuiltinOutcome> {
    debug!("exit requested");
    Ok(BuiltinOutcome::Halt)
}

fn hello(state: &mut ExecutionState) -> VmResult<BuiltinOutcome> {
    let output = state.output();
    output.write_all(b"Hello, world!\n")?;
    output.flush()?;
    Ok(BuiltinOutcome::Continue)
}

fn dump_stack(state: &mut ExecutionState) -> VmResult<BuiltinOutcome> {
    let dump = state.data_stack().to_string();
    let output = state.output();
    output.write_all(dump.as_bytes())?;
    output.flush()?;
    Ok(BuiltinOutcome::Continue)
}

fn write_stdout(state: &mut ExecutionState) -> VmResult<BuiltinOutcome> {
    let len = state.data_stack().peek(0)?;
    let address = state.data_stack().peek(1)?;
    let bytes = state.memory().read_bytes(address, len)?;
    state.pop()?;
    state.pop()?;

    let output = state.output();
    output.write_all(&bytes)?;
    output.flush()?;
    Ok(BuiltinOutcome::Continue)
}
