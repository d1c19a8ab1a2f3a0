//! Range validation of encrypted severities.
//!
//! The same fixed sequence of primitive calls runs for every input. Nothing
//! here may branch on an encrypted value: an out-of-range severity is not an
//! error, it simply contributes zero to both accumulators.

use crate::fhe::{Fhe, Handle};
use crate::ContractError;

pub const MIN_SEVERITY: u64 = 1;
pub const MAX_SEVERITY: u64 = 5;

/// Encrypted amounts to fold into a project's accumulators.
pub struct Contribution {
    /// `severity` when valid, otherwise 0 (encrypted u64).
    pub value: Handle,
    /// 1 when valid, otherwise 0 (encrypted u64).
    pub increment: Handle,
}

pub fn validate(fhe: &Fhe, severity: &Handle) -> Result<Contribution, ContractError> {
    let at_least_min = fhe.ge(severity, MIN_SEVERITY)?;
    let at_most_max = fhe.le(severity, MAX_SEVERITY)?;
    let is_valid = fhe.and(&at_least_min, &at_most_max)?;

    let widened = fhe.widen(severity)?;
    let zero = fhe.constant_u64(0)?;
    let one = fhe.constant_u64(1)?;

    Ok(Contribution {
        value: fhe.select(&is_valid, &widened, &zero)?,
        increment: fhe.select(&is_valid, &one, &zero)?,
    })
}
