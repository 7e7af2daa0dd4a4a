//! OpCode definitions for the Larum VM.
//!
//! The set follows the Gullwing stack CPU: 32 opcodes, one per value of a
//! 5-bit field. Value 0 is reserved for FETCH so that an exhausted packed
//! word naturally requests a refill.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumCount, EnumIter};

/// Width of one packed opcode field in bits.
pub const OPCODE_BITS: u32 = 5;

/// Mask selecting one opcode field.
pub const OPCODE_MASK: u32 = (1 << OPCODE_BITS) - 1;

/// Represents an opcode of the Larum instruction set.
///
/// Opcodes tagged `<operand>` read one full word from the instruction stream
/// when they execute.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    EnumIter,
    EnumCount,
    Display,
)]
#[repr(u8)]
pub enum OpCode {
    /*---------- Special -----------------------------------*/
    /// Refill the instruction register from the stream.
    FETCH = 0,
    NOP = 1,

    /*---------- Control -----------------------------------*/
    /// Jump unconditionally `<address>`.
    JMP = 2,
    /// Jump if the top of stack is zero `<address>`.
    JMPZ = 3,
    /// Jump if the top of stack is negative `<address>`.
    JMPN = 4,
    /// Push PC onto the return stack, then jump `<address>`.
    CALL = 5,
    /// Pop the return stack into PC.
    RET = 6,

    /*---------- Stack manipulation ------------------------*/
    /// `a -> a a`
    DUP = 7,
    /// `a b -> a`
    DROP = 8,
    /// `a b -> a b a`
    OVER = 9,

    /*---------- Internal moves ----------------------------*/
    /// Push the A register onto the data stack.
    PUSHA = 10,
    /// Pop the data stack into the A register.
    POPA = 11,
    /// Move the top of the data stack onto the return stack.
    PUSHR = 12,
    /// Move the top of the return stack onto the data stack.
    POPR = 13,

    /*---------- Arithmetic --------------------------------*/
    ADD = 14,
    SUB = 15,
    MUL = 16,

    /*---------- Bitwise operations ------------------------*/
    /// Shift right arithmetically.
    SHR = 17,
    /// Shift left.
    SHL = 18,
    /// Bit negation.
    NOT = 19,
    AND = 20,
    XOR = 21,
    OR = 22,

    /*---------- Fetch/store -------------------------------*/
    /// Push literal `<constant>`.
    LIT = 23,
    /// Push the literal number 1.
    LIT1 = 24,
    /// Load from memory at A.
    LDA = 25,
    /// Store to memory at A.
    STA = 26,
    /// Load from memory at A, then increment A.
    LDAINC = 27,
    /// Store to memory at A, then increment A.
    STAINC = 28,
    /// Load from memory at the top of the return stack, then increment it.
    LDRINC = 29,
    /// Store to memory at the top of the return stack, then increment it.
    STRINC = 30,

    /*---------- Special operations ------------------------*/
    /// Invoke a host built-in `<id>`.
    BUILTIN = 31,
}

impl OpCode {
    /// Decodes one 5-bit field. Bits above the field are ignored.
    pub fn from_field(field: u32) -> Option<Self> {
        Self::try_from((field & OPCODE_MASK) as u8).ok()
    }

    /// Returns the 5-bit field value of this opcode.
    pub fn field(self) -> u32 {
        u8::from(self) as u32
    }

    /// Returns true if the opcode reads an operand word from the stream.
    pub fn has_operand(self) -> bool {
        matches!(
            self,
            OpCode::JMP
                | OpCode::JMPZ
                | OpCode::JMPN
                | OpCode::CALL
                | OpCode::LIT
                | OpCode::BUILTIN
        )
    }

    /// Returns true if the opcode always discards the rest of the packed word.
    pub fn always_transfers_control(self) -> bool {
        matches!(self, OpCode::JMP | OpCode::CALL | OpCode::RET)
    }
}
