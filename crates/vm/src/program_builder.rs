//! Program builder module for the Larum VM.
//!
//! This module provides a way to assemble packed programs without hand
//! computing instruction words.

use crate::boot_image::BootImage;
use crate::error::{VmError, VmResult};
use crate::instruction::{pack_fields, FIELDS_PER_WORD};
use crate::op_code::OpCode;
use crate::Word;

/// Location of an operand word, used to patch forward jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandRef(usize);

impl OperandRef {
    /// Word address of the operand.
    pub fn address(self) -> usize {
        self.0
    }
}

/// Helps construct VM programs programmatically.
///
/// Opcodes are grouped six to a word. Operands of the grouped opcodes are
/// placed right after the packed word, in emission order. A group is closed
/// when it is full, after an unconditional transfer of control, and
/// whenever a label is taken.
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    /// Words already laid out
    words: Vec<Word>,

    /// Opcodes of the open group
    group: Vec<OpCode>,

    /// Operands of the open group
    operands: Vec<Word>,
}

impl ProgramBuilder {
    /// Creates a new program builder.
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            group: Vec::with_capacity(FIELDS_PER_WORD),
            operands: Vec::new(),
        }
    }

    /// Emits an opcode. Operand opcodes get a zero operand.
    ///
    /// FETCH is never stored; emitting it closes the open group.
    pub fn emit(&mut self, opcode: OpCode) -> &mut Self {
        if opcode == OpCode::FETCH {
            return self.flush();
        }
        if opcode.has_operand() {
            self.emit_with_operand(opcode, 0);
            return self;
        }

        self.reserve_field();
        self.group.push(opcode);
        if opcode.always_transfers_control() {
            self.flush();
        }
        self
    }

    /// Emits an opcode followed by its operand and returns the operand location.
    fn push_with_operand(&mut self, opcode: OpCode, operand: Word) -> OperandRef {
        self.reserve_field();
        let reference = OperandRef(self.words.len() + 1 + self.operands.len());
        self.group.push(opcode);
        self.operands.push(operand);
        if opcode.always_transfers_control() {
            self.flush();
        }
        reference
    }

    /// Emits an opcode with an explicit operand.
    pub fn emit_with_operand(&mut self, opcode: OpCode, operand: Word) -> &mut Self {
        self.push_with_operand(opcode, operand);
        self
    }

    /// Emits `LIT value`, or `LIT1` when the value is one.
    pub fn emit_lit(&mut self, value: Word) -> &mut Self {
        if value == 1 {
            return self.emit(OpCode::LIT1);
        }
        self.emit_with_operand(OpCode::LIT, value)
    }

    /// Emits `BUILTIN id`.
    pub fn emit_builtin(&mut self, id: Word) -> &mut Self {
        self.emit_with_operand(OpCode::BUILTIN, id)
    }

    /// Emits a jump or call to a known address.
    pub fn emit_jump(&mut self, opcode: OpCode, target: Word) -> &mut Self {
        self.emit_with_operand(opcode, target)
    }

    /// Emits `CALL target`.
    pub fn emit_call(&mut self, target: Word) -> &mut Self {
        self.emit_with_operand(OpCode::CALL, target)
    }

    /// Emits a jump whose target is patched later with [`Self::patch`].
    pub fn emit_forward_jump(&mut self, opcode: OpCode) -> OperandRef {
        self.push_with_operand(opcode, 0)
    }

    /// Sets the operand at `reference` to `target`.
    pub fn patch(&mut self, reference: OperandRef, target: Word) -> VmResult<()> {
        let index = reference.0;
        if let Some(word) = self.words.get_mut(index) {
            *word = target;
            return Ok(());
        }

        // Still pending in the open group.
        index
            .checked_sub(self.words.len() + 1)
            .and_then(|pending| self.operands.get_mut(pending))
            .map(|word| *word = target)
            .ok_or_else(|| VmError::invalid_operation_msg(format!("no operand at word {index}")))
    }

    /// Closes the open group and returns the address of the next word.
    pub fn label(&mut self) -> Word {
        self.flush();
        self.words.len() as Word
    }

    /// Appends raw data words and returns the address of the first one.
    pub fn emit_data(&mut self, data: &[Word]) -> Word {
        let address = self.label();
        self.words.extend_from_slice(data);
        address
    }

    /// Appends bytes packed little-endian into words, zero padded, and
    /// returns the byte address of the first byte.
    pub fn emit_bytes(&mut self, bytes: &[u8]) -> Word {
        let words: Vec<Word> = bytes
            .chunks(4)
            .map(|chunk| {
                let mut buf = [0u8; 4];
                buf[..chunk.len()].copy_from_slice(chunk);
                Word::from_le_bytes(buf)
            })
            .collect();
        self.emit_data(&words) * 4
    }

    /// Writes out the open group, if any.
    pub fn flush(&mut self) -> &mut Self {
        if !self.group.is_empty() {
            self.words.push(pack_fields(&self.group));
            self.words.append(&mut self.operands);
            self.group.clear();
        }
        self
    }

    /// Number of words laid out so far, excluding the open group.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.group.is_empty()
    }

    /// Closes the open group and returns the program words.
    pub fn build(&mut self) -> Vec<Word> {
        self.flush();
        self.words.clone()
    }

    /// Closes the open group and wraps the program in a boot image.
    pub fn to_boot_image(&mut self) -> BootImage {
        BootImage::new(self.build())
    }

    fn reserve_field(&mut self) {
        if self.group.len() == FIELDS_PER_WORD {
            self.flush();
        }
    }
}
