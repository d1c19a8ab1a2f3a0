//! Gateway to the encrypted-value abstraction.
//!
//! Wraps the executor client so the rest of the crate works with opaque
//! handles and [`ContractError`]. Every call passes this contract's own
//! address as the caller, which the host authorizes implicitly.

use fhe_executor::{CipherKind, FheError, FheExecutorContractClient};
use soroban_sdk::{Address, Bytes, BytesN, Env, InvokeError};

use crate::ContractError;

/// Opaque 32-byte ciphertext reference.
pub type Handle = BytesN<32>;

pub struct Fhe<'a> {
    client: FheExecutorContractClient<'a>,
    this: Address,
}

/// Collapses a `try_*` client result. A rejected proof keeps its identity,
/// everything else is an executor failure.
fn lift<T, C>(result: Result<Result<T, C>, Result<FheError, InvokeError>>) -> Result<T, ContractError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(FheError::InvalidProof)) => Err(ContractError::ProofInvalid),
        _ => Err(ContractError::ExecutorFailure),
    }
}

impl<'a> Fhe<'a> {
    pub fn new(env: &'a Env, executor: &Address) -> Self {
        Self {
            client: FheExecutorContractClient::new(env, executor),
            this: env.current_contract_address(),
        }
    }

    /// Deserialize an external 8-bit input submitted by `user`.
    pub fn import_u8(&self, user: &Address, input: &Handle, proof: &Bytes) -> Result<Handle, ContractError> {
        lift(
            self.client
                .try_verify_input(&self.this, user, input, proof, &CipherKind::U8),
        )
    }

    pub fn constant_u64(&self, value: u64) -> Result<Handle, ContractError> {
        lift(self.client.try_trivial(&self.this, &value, &CipherKind::U64))
    }

    pub fn add(&self, lhs: &Handle, rhs: &Handle) -> Result<Handle, ContractError> {
        lift(self.client.try_add(&self.this, lhs, rhs))
    }

    pub fn ge(&self, lhs: &Handle, rhs: u64) -> Result<Handle, ContractError> {
        lift(self.client.try_ge_scalar(&self.this, lhs, &rhs))
    }

    pub fn le(&self, lhs: &Handle, rhs: u64) -> Result<Handle, ContractError> {
        lift(self.client.try_le_scalar(&self.this, lhs, &rhs))
    }

    pub fn and(&self, lhs: &Handle, rhs: &Handle) -> Result<Handle, ContractError> {
        lift(self.client.try_and(&self.this, lhs, rhs))
    }

    pub fn select(&self, cond: &Handle, if_true: &Handle, if_false: &Handle) -> Result<Handle, ContractError> {
        lift(self.client.try_select(&self.this, cond, if_true, if_false))
    }

    /// 8 → 64 bit widening.
    pub fn widen(&self, value: &Handle) -> Result<Handle, ContractError> {
        lift(self.client.try_cast(&self.this, value, &CipherKind::U64))
    }

    pub fn grant_self(&self, handle: &Handle) -> Result<bool, ContractError> {
        lift(self.client.try_allow(&self.this, handle, &self.this))
    }

    pub fn grant_public(&self, handle: &Handle) -> Result<bool, ContractError> {
        lift(self.client.try_allow_public(&self.this, handle))
    }

    /// Decrypt-only grant. A no-op on handles `account` can already read.
    pub fn grant_to(&self, handle: &Handle, account: &Address) -> Result<bool, ContractError> {
        lift(self.client.try_allow_decrypt(&self.this, handle, account))
    }
}
