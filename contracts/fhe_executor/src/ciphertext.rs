use soroban_sdk::{contracttype, Address, Bytes, BytesN, Env};

use crate::engine::HomomorphicEngine;
use crate::DataKey;

const TTL_THRESHOLD: u32 = 17_280;
const TTL_EXTEND_TO: u32 = 518_400;

/// Plaintext domain of a ciphertext.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CipherKind {
    Bool = 0,
    U8 = 1,
    U64 = 2,
}

impl CipherKind {
    pub fn fits(self, value: u64) -> bool {
        value & !HomomorphicEngine::mask(self) == 0
    }

    pub fn is_integer(self) -> bool {
        self != CipherKind::Bool
    }
}

/// A ciphertext held by the coprocessor. The clear value never leaves this
/// contract except through the decryption oracle.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ciphertext {
    pub kind: CipherKind,
    pub value: u64,
}

/// What a client receives after encrypting a value for a target contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncryptedInput {
    pub handle: BytesN<32>,
    pub proof: Bytes,
}

/// Binds an external input to the contract and user allowed to import it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputBinding {
    pub contract: Address,
    pub user: Address,
    pub kind: CipherKind,
    pub value: u64,
    pub proof: BytesN<32>,
}

/// Operation tags mixed into handle derivation.
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Op {
    External = 1,
    Import = 2,
    Trivial = 3,
    Add = 4,
    Ge = 5,
    Le = 6,
    And = 7,
    Select = 8,
    Cast = 9,
}

/// Derives a fresh handle. The nonce makes every derivation unique, so
/// recomputing the same value never yields a previously issued handle.
pub fn derive_handle(env: &Env, op: Op, kind: CipherKind, operands: &[BytesN<32>]) -> BytesN<32> {
    let nonce: u64 = env
        .storage()
        .instance()
        .get(&DataKey::Nonce)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&DataKey::Nonce, &nonce);

    let mut preimage = Bytes::new(env);
    preimage.push_back(op as u8);
    preimage.push_back(kind as u8);
    preimage.extend_from_array(&nonce.to_be_bytes());
    for operand in operands {
        preimage.extend_from_array(&operand.to_array());
    }
    env.crypto().sha256(&preimage).into()
}

pub fn store(env: &Env, handle: &BytesN<32>, ciphertext: &Ciphertext) {
    let key = DataKey::Cipher(handle.clone());
    env.storage().persistent().set(&key, ciphertext);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn load(env: &Env, handle: &BytesN<32>) -> Option<Ciphertext> {
    env.storage()
        .persistent()
        .get(&DataKey::Cipher(handle.clone()))
}

/// Registers an encrypted input for `(contract, user)` and returns its
/// external handle together with the binding proof.
pub fn bind_input(
    env: &Env,
    contract: Address,
    user: Address,
    kind: CipherKind,
    value: u64,
) -> EncryptedInput {
    let handle = derive_handle(env, Op::External, kind, &[]);

    let mut preimage = Bytes::from_slice(env, b"input-proof");
    preimage.extend_from_array(&handle.to_array());
    let proof: BytesN<32> = env.crypto().sha256(&preimage).into();

    let binding = InputBinding {
        contract,
        user,
        kind,
        value,
        proof: proof.clone(),
    };
    let key = DataKey::Input(handle.clone());
    env.storage().persistent().set(&key, &binding);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    EncryptedInput {
        handle,
        proof: proof.into(),
    }
}

pub fn load_input(env: &Env, handle: &BytesN<32>) -> Option<InputBinding> {
    env.storage()
        .persistent()
        .get(&DataKey::Input(handle.clone()))
}
