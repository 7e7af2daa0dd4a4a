//! Packed instruction words and the instruction shift register.
//!
//! One 32-bit word carries up to six 5-bit opcode fields, lowest field first.
//! The two top bits are unused and ignored on decode.

use crate::error::{VmError, VmResult};
use crate::op_code::{OpCode, OPCODE_BITS, OPCODE_MASK};
use crate::Word;

/// Number of opcode fields in one packed word.
pub const FIELDS_PER_WORD: usize = 6;

/// Packs up to six opcodes into one instruction word, first opcode in the
/// lowest field. Unused fields are left as FETCH.
pub fn pack(opcodes: &[OpCode]) -> VmResult<Word> {
    if opcodes.len() > FIELDS_PER_WORD {
        return Err(VmError::invalid_operation_msg(format!(
            "cannot pack {} opcodes into one word (max {})",
            opcodes.len(),
            FIELDS_PER_WORD
        )));
    }

    Ok(pack_fields(opcodes))
}

/// Packs opcodes without checking the field count. Fields past the sixth
/// are shifted out of the word.
pub(crate) fn pack_fields(opcodes: &[OpCode]) -> Word {
    let bits = opcodes
        .iter()
        .rev()
        .fold(0u32, |acc, op| (acc << OPCODE_BITS) | op.field());
    bits as Word
}

/// Splits an instruction word into its six opcode fields.
pub fn unpack(word: Word) -> VmResult<[OpCode; FIELDS_PER_WORD]> {
    let mut bits = word as u32;
    let mut opcodes = [OpCode::FETCH; FIELDS_PER_WORD];
    for slot in opcodes.iter_mut() {
        *slot = decode_field(bits)?;
        bits >>= OPCODE_BITS;
    }
    Ok(opcodes)
}

fn decode_field(bits: u32) -> VmResult<OpCode> {
    let field = bits & OPCODE_MASK;
    OpCode::from_field(field).ok_or(VmError::InvalidOpcode(field as u8))
}

/// The instruction shift register (ISR).
///
/// Holds the fields of the current packed word that have not executed yet.
/// `remaining` is the refill sentinel: once it reaches zero the register
/// yields FETCH regardless of its bit content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstructionRegister {
    bits: u32,
    remaining: u8,
}

impl InstructionRegister {
    /// Creates an empty register that requests a fetch on first use.
    pub const fn new() -> Self {
        Self {
            bits: 0,
            remaining: 0,
        }
    }

    /// Replaces the register content with a freshly fetched word.
    pub fn load(&mut self, word: Word) {
        self.bits = word as u32;
        self.remaining = FIELDS_PER_WORD as u8;
    }

    /// Discards every pending field so the next step fetches.
    pub fn invalidate(&mut self) {
        self.bits = 0;
        self.remaining = 0;
    }

    /// Returns true if no field is pending.
    pub fn needs_refill(&self) -> bool {
        self.remaining == 0
    }

    /// Number of fields not yet consumed.
    pub fn remaining(&self) -> usize {
        self.remaining as usize
    }

    /// The raw bits of the pending fields.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Takes the lowest pending field and shifts the rest down.
    pub fn next_opcode(&mut self) -> VmResult<OpCode> {
        if self.needs_refill() {
            return Ok(OpCode::FETCH);
        }

        let opcode = decode_field(self.bits)?;
        self.bits >>= OPCODE_BITS;
        self.remaining -= 1;
        Ok(opcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_places_first_opcode_lowest() {
        let word = pack(&[OpCode::LIT, OpCode::DUP]).unwrap();
        assert_eq!(word, (OpCode::LIT.field() | OpCode::DUP.field() << 5) as Word);
    }

    #[test]
    fn test_pack_rejects_seventh_field() {
        let ops = [OpCode::NOP; FIELDS_PER_WORD + 1];
        assert!(pack(&ops).is_err());
    }

    #[test]
    fn test_unpack_full_word() {
        let ops = [
            OpCode::LIT,
            OpCode::LIT,
            OpCode::XOR,
            OpCode::OVER,
            OpCode::STRINC,
            OpCode::BUILTIN,
        ];
        assert_eq!(unpack(pack(&ops).unwrap()).unwrap(), ops);
    }

    #[test]
    fn test_unpack_short_word_pads_with_fetch() {
        let fields = unpack(pack(&[OpCode::ADD]).unwrap()).unwrap();
        assert_eq!(fields[0], OpCode::ADD);
        assert!(fields[1..].iter().all(|op| *op == OpCode::FETCH));
    }

    #[test]
    fn test_register_yields_six_fields_then_fetch() {
        let ops = [OpCode::BUILTIN; FIELDS_PER_WORD];
        let mut isr = InstructionRegister::new();
        isr.load(pack(&ops).unwrap());

        for _ in 0..FIELDS_PER_WORD {
            assert_eq!(isr.next_opcode().unwrap(), OpCode::BUILTIN);
        }
        assert!(isr.needs_refill());
        assert_eq!(isr.next_opcode().unwrap(), OpCode::FETCH);
    }

    #[test]
    fn test_register_ignores_top_bits() {
        let mut isr = InstructionRegister::new();
        isr.load(pack(&[OpCode::BUILTIN; FIELDS_PER_WORD]).unwrap() | (0b11u32 << 30) as Word);
        for _ in 0..FIELDS_PER_WORD {
            isr.next_opcode().unwrap();
        }
        assert_eq!(isr.next_opcode().unwrap(), OpCode::FETCH);
    }

    #[test]
    fn test_invalidate_forces_fetch() {
        let mut isr = InstructionRegister::new();
        isr.load(pack(&[OpCode::DUP, OpCode::DUP]).unwrap());
        isr.invalidate();
        assert!(isr.needs_refill());
        assert_eq!(isr.next_opcode().unwrap(), OpCode::FETCH);
    }
}
