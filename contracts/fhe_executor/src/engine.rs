use crate::ciphertext::CipherKind;

/// Clear-value evaluation of the encrypted primitives.
///
/// Every operation is written without branching on operand values so that
/// the evaluation shape is identical for every input, the same property a
/// real coprocessor guarantees for its ciphertext circuits.
pub struct HomomorphicEngine;

impl HomomorphicEngine {
    /// Bit mask of the plaintext domain of `kind`.
    pub fn mask(kind: CipherKind) -> u64 {
        match kind {
            CipherKind::Bool => 1,
            CipherKind::U8 => 0xff,
            CipherKind::U64 => u64::MAX,
        }
    }

    /// Modular addition within the width of `kind`.
    pub fn add(kind: CipherKind, lhs: u64, rhs: u64) -> u64 {
        lhs.wrapping_add(rhs) & Self::mask(kind)
    }

    pub fn ge(lhs: u64, rhs: u64) -> u64 {
        u64::from(lhs >= rhs)
    }

    pub fn le(lhs: u64, rhs: u64) -> u64 {
        u64::from(lhs <= rhs)
    }

    pub fn and(lhs: u64, rhs: u64) -> u64 {
        lhs & rhs & 1
    }

    /// Multiplexer: `cond ? if_true : if_false` via a full-width mask.
    pub fn select(cond: u64, if_true: u64, if_false: u64) -> u64 {
        let mask = 0u64.wrapping_sub(cond & 1);
        (if_true & mask) | (if_false & !mask)
    }

    /// Width conversion. Widening keeps the value, narrowing truncates and
    /// casting to `Bool` tests for non-zero.
    pub fn cast(value: u64, to: CipherKind) -> u64 {
        match to {
            CipherKind::Bool => u64::from(value != 0),
            _ => value & Self::mask(to),
        }
    }
}
