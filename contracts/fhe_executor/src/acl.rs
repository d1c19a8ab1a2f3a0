//! Per-handle access control list.
//!
//! Grants form an append-only relation from a ciphertext handle to a set of
//! grantees. Nothing is ever revoked and nothing is inherited: a handle
//! produced by an operation starts with an empty list and only a transient
//! right for the producer, valid in the ledger that produced it.

use soroban_sdk::{contracttype, Address, BytesN, Env, Vec};

use crate::DataKey;

const TTL_THRESHOLD: u32 = 17_280;
const TTL_EXTEND_TO: u32 = 518_400;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Grantee {
    /// Anyone may decrypt through the public oracle.
    Public,
    /// This account may operate on, grant on and decrypt the value.
    Account(Address),
    /// This account may decrypt the value and nothing else.
    Reader(Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransientGrant {
    pub account: Address,
    pub ledger: u32,
}

pub fn grantees(env: &Env, handle: &BytesN<32>) -> Vec<Grantee> {
    env.storage()
        .persistent()
        .get(&DataKey::Acl(handle.clone()))
        .unwrap_or(Vec::new(env))
}

/// Records `grantee` on `handle`. Returns `false` when the exact grant was
/// already present.
pub fn grant(env: &Env, handle: &BytesN<32>, grantee: Grantee) -> bool {
    let mut list = grantees(env, handle);
    if list.contains(&grantee) {
        return false;
    }
    list.push_back(grantee);

    let key = DataKey::Acl(handle.clone());
    env.storage().persistent().set(&key, &list);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    true
}

pub fn grant_transient(env: &Env, handle: &BytesN<32>, account: &Address) {
    env.storage().temporary().set(
        &DataKey::Transient(handle.clone()),
        &TransientGrant {
            account: account.clone(),
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn is_public(env: &Env, handle: &BytesN<32>) -> bool {
    grantees(env, handle).contains(&Grantee::Public)
}

/// Records a decrypt-only grant for `account`. Nothing is recorded when the
/// account can already decrypt, including when the handle is public.
pub fn grant_reader(env: &Env, handle: &BytesN<32>, account: &Address) -> bool {
    if can_decrypt(env, handle, account) {
        return false;
    }
    grant(env, handle, Grantee::Reader(account.clone()))
}

/// Whether `account` may decrypt `handle`, either as a named grantee or
/// because the value is public.
pub fn can_decrypt(env: &Env, handle: &BytesN<32>, account: &Address) -> bool {
    let list = grantees(env, handle);
    list.contains(&Grantee::Public)
        || list.contains(&Grantee::Account(account.clone()))
        || list.contains(&Grantee::Reader(account.clone()))
}

/// Whether `account` may use `handle` as an operand or grant rights on it.
/// Neither public decryptability nor a reader grant confers this.
pub fn is_allowed(env: &Env, handle: &BytesN<32>, account: &Address) -> bool {
    if grantees(env, handle).contains(&Grantee::Account(account.clone())) {
        return true;
    }
    let transient: Option<TransientGrant> = env
        .storage()
        .temporary()
        .get(&DataKey::Transient(handle.clone()));
    match transient {
        Some(t) => t.account == *account && t.ledger == env.ledger().sequence(),
        None => false,
    }
}
