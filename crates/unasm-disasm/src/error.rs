//! Decode error types.

use thiserror::Error;
use unasm_core::Mnemonic;

use crate::prefix::Prefix;

/// Error type for instruction decoding.
///
/// Every variant carries the offset of the instruction being decoded and
/// the byte values that failed to resolve; none of them is recoverable
/// within a single decode attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No opcode-table row for the effective prefix and opcode, after the
    /// prefix-fallback chain was exhausted.
    #[error("unknown opcode at offset {start}: ({prefix:?}, {opcode:#04x})")]
    UnknownOpcode {
        start: usize,
        prefix: Prefix,
        opcode: u16,
    },

    /// The mnemonic resolved but the operand table has no matching row.
    #[error("unknown operand form at offset {start}: ({prefix:?}, {mnemonic}, {opcode:#04x})")]
    UnknownOperandForm {
        start: usize,
        prefix: Prefix,
        mnemonic: Mnemonic,
        opcode: u16,
    },

    /// The byte stream ended while a required ModR/M, SIB, displacement, or
    /// immediate byte was still pending.
    #[error("truncated instruction at offset {start}: need {needed} bytes, have {available}")]
    Truncated {
        start: usize,
        needed: usize,
        available: usize,
    },
}

impl DecodeError {
    /// Creates a new UnknownOpcode error.
    pub fn unknown_opcode(start: usize, prefix: Prefix, opcode: u16) -> Self {
        Self::UnknownOpcode {
            start,
            prefix,
            opcode,
        }
    }

    /// Creates a new UnknownOperandForm error.
    pub fn unknown_operand_form(
        start: usize,
        prefix: Prefix,
        mnemonic: Mnemonic,
        opcode: u16,
    ) -> Self {
        Self::UnknownOperandForm {
            start,
            prefix,
            mnemonic,
            opcode,
        }
    }

    /// Creates a new Truncated error.
    pub fn truncated(start: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            start,
            needed,
            available,
        }
    }
}
