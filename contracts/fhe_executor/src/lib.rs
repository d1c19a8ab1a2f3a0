#![no_std]

//! # FHE Executor
//!
//! Reference coprocessor for encrypted integer computation, used by the
//! severity aggregator on local networks and in tests.
//!
//! - **Inputs**: `encrypt_input` stands in for client-side encryption and
//!   binds a value to one contract and one user; `verify_input` imports it.
//! - **Primitives**: `add`, `ge_scalar`, `le_scalar`, `and`, `select`,
//!   `cast`, `trivial`. Every call returns a new opaque handle.
//! - **Access control**: an append-only grant list per handle (see [`acl`]).
//! - **Decryption oracle**: `public_decrypt` and `user_decrypt`.
//!
//! Clear values live in this contract's storage, so it provides no
//! confidentiality of its own. It reproduces the interface and the access
//! rules of a real coprocessor, which is what the calling contract relies on.

pub mod acl;
pub mod ciphertext;
pub mod engine;

#[cfg(test)]
extern crate std;


use soroban_sdk::{contract, contracterror, contractimpl, contracttype, log, Address, Bytes, BytesN, Env, Vec};

pub use acl::Grantee;
pub use ciphertext::{CipherKind, Ciphertext, EncryptedInput};

use ciphertext::Op;
use engine::HomomorphicEngine;

// ── Storage keys ────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Nonce,
    Cipher(BytesN<32>),
    Input(BytesN<32>),
    Acl(BytesN<32>),
    Transient(BytesN<32>),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FheError {
    UnknownHandle = 100,
    KindMismatch = 101,
    AccessDenied = 102,
    InvalidProof = 103,
    NotDecryptable = 104,
    ValueOutOfRange = 105,
}

// ── Contract ───────────────────────────────────────────────────────────────────

#[contract]
pub struct FheExecutorContract;

#[contractimpl]
impl FheExecutorContract {
    // ── Inputs ────────────────────────────────────────────────────────────────

    /// Encrypt `value` for use by `contract` on behalf of `user`.
    pub fn encrypt_input(
        env: Env,
        contract: Address,
        user: Address,
        value: u64,
        kind: CipherKind,
    ) -> Result<EncryptedInput, FheError> {
        if !kind.fits(value) {
            return Err(FheError::ValueOutOfRange);
        }
        Ok(ciphertext::bind_input(&env, contract, user, kind, value))
    }

    /// Import an external input. The proof must match the input and the
    /// input must have been bound to `(caller, user)` with the same kind.
    pub fn verify_input(
        env: Env,
        caller: Address,
        user: Address,
        input: BytesN<32>,
        proof: Bytes,
        kind: CipherKind,
    ) -> Result<BytesN<32>, FheError> {
        caller.require_auth();

        let binding = ciphertext::load_input(&env, &input).ok_or(FheError::InvalidProof)?;
        let expected: Bytes = binding.proof.clone().into();
        if binding.contract != caller || binding.user != user || binding.kind != kind || expected != proof {
            log!(&env, "input rejected", input);
            return Err(FheError::InvalidProof);
        }

        Ok(Self::produce(&env, &caller, Op::Import, kind, binding.value, &[input]))
    }

    // ── Primitives ────────────────────────────────────────────────────────────

    /// Encrypt a public constant.
    pub fn trivial(env: Env, caller: Address, value: u64, kind: CipherKind) -> Result<BytesN<32>, FheError> {
        caller.require_auth();
        if !kind.fits(value) {
            return Err(FheError::ValueOutOfRange);
        }
        Ok(Self::produce(&env, &caller, Op::Trivial, kind, value, &[]))
    }

    pub fn add(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> Result<BytesN<32>, FheError> {
        caller.require_auth();
        let a = Self::operand(&env, &caller, &lhs)?;
        let b = Self::operand(&env, &caller, &rhs)?;
        if a.kind != b.kind || !a.kind.is_integer() {
            return Err(FheError::KindMismatch);
        }

        let value = HomomorphicEngine::add(a.kind, a.value, b.value);
        Ok(Self::produce(&env, &caller, Op::Add, a.kind, value, &[lhs, rhs]))
    }

    /// Encrypted `lhs >= rhs` against a clear scalar.
    pub fn ge_scalar(env: Env, caller: Address, lhs: BytesN<32>, rhs: u64) -> Result<BytesN<32>, FheError> {
        caller.require_auth();
        let a = Self::operand(&env, &caller, &lhs)?;
        if !a.kind.is_integer() {
            return Err(FheError::KindMismatch);
        }

        let value = HomomorphicEngine::ge(a.value, rhs);
        Ok(Self::produce(&env, &caller, Op::Ge, CipherKind::Bool, value, &[lhs]))
    }

    /// Encrypted `lhs <= rhs` against a clear scalar.
    pub fn le_scalar(env: Env, caller: Address, lhs: BytesN<32>, rhs: u64) -> Result<BytesN<32>, FheError> {
        caller.require_auth();
        let a = Self::operand(&env, &caller, &lhs)?;
        if !a.kind.is_integer() {
            return Err(FheError::KindMismatch);
        }

        let value = HomomorphicEngine::le(a.value, rhs);
        Ok(Self::produce(&env, &caller, Op::Le, CipherKind::Bool, value, &[lhs]))
    }

    pub fn and(env: Env, caller: Address, lhs: BytesN<32>, rhs: BytesN<32>) -> Result<BytesN<32>, FheError> {
        caller.require_auth();
        let a = Self::operand(&env, &caller, &lhs)?;
        let b = Self::operand(&env, &caller, &rhs)?;
        if a.kind != CipherKind::Bool || b.kind != CipherKind::Bool {
            return Err(FheError::KindMismatch);
        }

        let value = HomomorphicEngine::and(a.value, b.value);
        Ok(Self::produce(&env, &caller, Op::And, CipherKind::Bool, value, &[lhs, rhs]))
    }

    /// Encrypted `cond ? if_true : if_false`.
    pub fn select(
        env: Env,
        caller: Address,
        cond: BytesN<32>,
        if_true: BytesN<32>,
        if_false: BytesN<32>,
    ) -> Result<BytesN<32>, FheError> {
        caller.require_auth();
        let c = Self::operand(&env, &caller, &cond)?;
        let t = Self::operand(&env, &caller, &if_true)?;
        let f = Self::operand(&env, &caller, &if_false)?;
        if c.kind != CipherKind::Bool || t.kind != f.kind {
            return Err(FheError::KindMismatch);
        }

        let value = HomomorphicEngine::select(c.value, t.value, f.value);
        Ok(Self::produce(&env, &caller, Op::Select, t.kind, value, &[cond, if_true, if_false]))
    }

    pub fn cast(env: Env, caller: Address, value: BytesN<32>, to: CipherKind) -> Result<BytesN<32>, FheError> {
        caller.require_auth();
        let v = Self::operand(&env, &caller, &value)?;

        let converted = HomomorphicEngine::cast(v.value, to);
        Ok(Self::produce(&env, &caller, Op::Cast, to, converted, &[value]))
    }

    // ── Access control ────────────────────────────────────────────────────────

    /// Grant `account` persistent rights on `handle`. The caller must itself
    /// be allowed on the handle. Returns `false` for a redundant grant.
    pub fn allow(env: Env, caller: Address, handle: BytesN<32>, account: Address) -> Result<bool, FheError> {
        caller.require_auth();
        Self::operand(&env, &caller, &handle)?;
        Ok(acl::grant(&env, &handle, Grantee::Account(account)))
    }

    /// Let `account` decrypt `handle` without operating on it or passing the
    /// right on. Returns `false`, recording nothing, when `account` can
    /// already decrypt, which includes every public handle.
    pub fn allow_decrypt(env: Env, caller: Address, handle: BytesN<32>, account: Address) -> Result<bool, FheError> {
        caller.require_auth();
        Self::operand(&env, &caller, &handle)?;
        Ok(acl::grant_reader(&env, &handle, &account))
    }

    /// Make `handle` decryptable by anyone. Irreversible for this handle.
    pub fn allow_public(env: Env, caller: Address, handle: BytesN<32>) -> Result<bool, FheError> {
        caller.require_auth();
        Self::operand(&env, &caller, &handle)?;
        Ok(acl::grant(&env, &handle, Grantee::Public))
    }

    pub fn is_allowed(env: Env, handle: BytesN<32>, account: Address) -> bool {
        acl::is_allowed(&env, &handle, &account)
    }

    pub fn is_public(env: Env, handle: BytesN<32>) -> bool {
        acl::is_public(&env, &handle)
    }

    pub fn grantees(env: Env, handle: BytesN<32>) -> Vec<Grantee> {
        acl::grantees(&env, &handle)
    }

    // ── Decryption oracle ─────────────────────────────────────────────────────

    pub fn public_decrypt(env: Env, handle: BytesN<32>) -> Result<u64, FheError> {
        let ct = ciphertext::load(&env, &handle).ok_or(FheError::UnknownHandle)?;
        if !acl::is_public(&env, &handle) {
            return Err(FheError::NotDecryptable);
        }
        Ok(ct.value)
    }

    /// Authenticated decryption for a named grantee (or any caller on a
    /// public handle).
    pub fn user_decrypt(env: Env, user: Address, handle: BytesN<32>) -> Result<u64, FheError> {
        user.require_auth();
        let ct = ciphertext::load(&env, &handle).ok_or(FheError::UnknownHandle)?;
        if !acl::can_decrypt(&env, &handle, &user) {
            return Err(FheError::NotDecryptable);
        }
        Ok(ct.value)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn operand(env: &Env, caller: &Address, handle: &BytesN<32>) -> Result<Ciphertext, FheError> {
        let ct = ciphertext::load(env, handle).ok_or(FheError::UnknownHandle)?;
        if !acl::is_allowed(env, handle, caller) {
            return Err(FheError::AccessDenied);
        }
        Ok(ct)
    }

    fn produce(
        env: &Env,
        caller: &Address,
        op: Op,
        kind: CipherKind,
        value: u64,
        operands: &[BytesN<32>],
    ) -> BytesN<32> {
        let handle = ciphertext::derive_handle(env, op, kind, operands);
        ciphertext::store(env, &handle, &Ciphertext { kind, value });
        acl::grant_transient(env, &handle, caller);
        handle
    }
}
