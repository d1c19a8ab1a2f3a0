//! Decrypt-right management for aggregate ciphertexts.
//!
//! A ciphertext produced by a mutation carries no persistent rights, so every
//! operation that produces one must call [`secure`] before it commits, or the
//! value becomes unusable once the producing ledger closes.

use soroban_sdk::{contracttype, Address, Env, String};

use crate::fhe::{Fhe, Handle};
use crate::store::AggregateHandles;
use crate::{ContractError, DataKey};

/// The all-zero ed25519 account, treated as the null identity.
const NULL_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

/// Who may decrypt aggregates after each mutation.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DisclosurePolicy {
    /// Every new aggregate handle is publicly decryptable.
    Public = 0,
    /// Every new aggregate handle is decryptable by the current owner only.
    OwnerOnly = 1,
}

pub fn policy(env: &Env) -> DisclosurePolicy {
    env.storage()
        .instance()
        .get(&DataKey::Policy)
        .unwrap_or(DisclosurePolicy::Public)
}

pub fn set_policy(env: &Env, policy: DisclosurePolicy) {
    env.storage().instance().set(&DataKey::Policy, &policy);
}

pub fn null_account(env: &Env) -> Address {
    Address::from_string(&String::from_str(env, NULL_ACCOUNT))
}

pub fn is_null_account(env: &Env, account: &Address) -> bool {
    *account == null_account(env)
}

/// Re-establish rights on a freshly produced handle: this contract keeps
/// operating on it, and the configured policy decides who may decrypt it.
pub fn secure(env: &Env, fhe: &Fhe, handle: &Handle) -> Result<(), ContractError> {
    fhe.grant_self(handle)?;
    match policy(env) {
        DisclosurePolicy::Public => {
            fhe.grant_public(handle)?;
        }
        DisclosurePolicy::OwnerOnly => {
            let owner: Address = env
                .storage()
                .instance()
                .get(&DataKey::Owner)
                .ok_or(ContractError::NotInitialized)?;
            fhe.grant_to(handle, &owner)?;
        }
    }
    Ok(())
}

/// Grant `account` decrypt rights on the given handles only. Later mutations
/// produce new handles that do not inherit this grant.
pub fn share(fhe: &Fhe, handles: &AggregateHandles, account: &Address) -> Result<(), ContractError> {
    fhe.grant_to(&handles.sum, account)?;
    fhe.grant_to(&handles.count, account)?;
    Ok(())
}
