#![no_std]

//! # Severity Aggregator
//!
//! Confidential bug-severity scoring. Reporters submit an encrypted severity
//! (1–5) for a report on a project; the contract keeps, per project, an
//! encrypted running sum of valid severities and an encrypted running count
//! of valid reports.
//!
//! - **Validation without leakage**: out-of-range severities are accepted and
//!   contribute zero; see [`validator`].
//! - **Replace-on-write accumulators**: every mutation issues new handles; see
//!   [`store`] and [`accumulation`].
//! - **Explicit decrypt rights**: re-granted after every mutation according
//!   to the [`DisclosurePolicy`]; see [`access`].
//!
//! Averages are left to readers: decrypt `sum` and `count`, then divide.
//!
//! Under the default `Public` policy every submission makes the new handles
//! public again. A grant from `share_aggregates` covers only the handles
//! current at the time of the call.

pub mod access;
pub mod accumulation;
pub mod events;
pub mod fhe;
pub mod store;
pub mod validator;


use soroban_sdk::{contract, contractimpl, contracttype, log, Address, Bytes, BytesN, Env, String};

pub use access::DisclosurePolicy;
pub use store::{AggregateHandles, ProjectAggregate};

use accumulation::Submission;
use fhe::Fhe;

const VERSION: &str = "severity-aggregator/1.0.0";

// ── Storage keys ────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Executor,
    Policy,
    Aggregate(u64),
}

// ── Error codes ───────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidProjectId = 4,
    EmptyContentReference = 5,
    EmptyProof = 6,
    InvalidAccount = 7,
    ProofInvalid = 8,
    NotFound = 9,
    ExecutorFailure = 10,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct SeverityAggregatorContract;

#[contractimpl]
impl SeverityAggregatorContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the aggregator.
    ///
    /// * `owner`: the single privileged account.
    /// * `executor`: address of the FHE executor contract that holds the
    ///   ciphertexts and their access lists.
    pub fn initialize(env: Env, owner: Address, executor: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(ContractError::AlreadyInitialized);
        }
        if access::is_null_account(&env, &owner) {
            return Err(ContractError::InvalidAccount);
        }

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Executor, &executor);
        access::set_policy(&env, DisclosurePolicy::Public);

        Ok(())
    }

    pub fn version(env: Env) -> String {
        String::from_str(&env, VERSION)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn executor(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&DataKey::Executor)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn disclosure_policy(env: Env) -> DisclosurePolicy {
        access::policy(&env)
    }

    // ── Submission ────────────────────────────────────────────────────────────

    /// Submit an encrypted severity for the report identified by
    /// `content_ref` on `project_id`.
    ///
    /// Succeeds for any well-formed input, including severities outside
    /// 1–5, which are counted as zero in both accumulators.
    pub fn submit_report(
        env: Env,
        reporter: Address,
        project_id: u64,
        content_ref: BytesN<32>,
        severity_input: BytesN<32>,
        proof: Bytes,
    ) -> Result<(), ContractError> {
        let executor = Self::executor(env.clone())?;
        reporter.require_auth();

        if project_id == 0 {
            return Err(ContractError::InvalidProjectId);
        }
        if content_ref == BytesN::from_array(&env, &[0u8; 32]) {
            return Err(ContractError::EmptyContentReference);
        }
        if proof.is_empty() {
            return Err(ContractError::EmptyProof);
        }

        let fhe = Fhe::new(&env, &executor);
        let severity = fhe.import_u8(&reporter, &severity_input, &proof)?;
        let contribution = validator::validate(&fhe, &severity)?;
        let current = store::ensure_initialized(&env, &fhe, project_id)?;

        let next = accumulation::accumulate(
            &env,
            &fhe,
            project_id,
            &current,
            &contribution,
            Submission {
                reporter,
                content_ref,
                severity,
            },
        )?;

        log!(&env, "report accepted", project_id, next.submissions);
        Ok(())
    }

    // ── Privileged operations ─────────────────────────────────────────────────

    /// Create a project's accumulators ahead of the first submission.
    /// Idempotent: existing totals are never touched.
    pub fn open_project(env: Env, caller: Address, project_id: u64) -> Result<(), ContractError> {
        let executor = Self::require_owner(&env, &caller)?;
        if project_id == 0 {
            return Err(ContractError::InvalidProjectId);
        }

        store::ensure_initialized(&env, &Fhe::new(&env, &executor), project_id)?;
        Ok(())
    }

    /// Reset a project's sum and count to encrypted zero under new handles.
    pub fn reset_aggregates(env: Env, caller: Address, project_id: u64) -> Result<AggregateHandles, ContractError> {
        let executor = Self::require_owner(&env, &caller)?;

        let handles = store::reset(&env, &Fhe::new(&env, &executor), project_id)?;
        log!(&env, "aggregates reset", project_id);
        Ok(handles)
    }

    /// Let `account` decrypt the current sum and count of `project_id`.
    ///
    /// Applies to the current handles only; the next submission issues new
    /// handles that follow the disclosure policy instead. Sharing handles
    /// that are already public is a harmless no-op.
    pub fn share_aggregates(
        env: Env,
        caller: Address,
        project_id: u64,
        account: Address,
    ) -> Result<(), ContractError> {
        let executor = Self::require_owner(&env, &caller)?;

        let handles = store::handles(&env, project_id)?;
        if access::is_null_account(&env, &account) {
            return Err(ContractError::InvalidAccount);
        }

        access::share(&Fhe::new(&env, &executor), &handles, &account)?;
        events::publish_aggregates_shared(&env, project_id, &account);
        Ok(())
    }

    pub fn set_disclosure_policy(env: Env, caller: Address, policy: DisclosurePolicy) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;

        access::set_policy(&env, policy);
        events::publish_policy_changed(&env, policy);
        Ok(())
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;
        if access::is_null_account(&env, &new_owner) {
            return Err(ContractError::InvalidAccount);
        }

        env.storage().instance().set(&DataKey::Owner, &new_owner);
        events::publish_ownership_transferred(&env, &caller, &new_owner);
        Ok(())
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    pub fn project_exists(env: Env, project_id: u64) -> bool {
        store::exists(&env, project_id)
    }

    pub fn get_aggregate_handles(env: Env, project_id: u64) -> Result<AggregateHandles, ContractError> {
        store::handles(&env, project_id)
    }

    /// Number of accepted submissions for `project_id`, valid or not.
    pub fn submission_count(env: Env, project_id: u64) -> u64 {
        store::submissions(&env, project_id)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Authorizes `caller` as the owner and returns the executor address.
    fn require_owner(env: &Env, caller: &Address) -> Result<Address, ContractError> {
        caller.require_auth();
        let owner = Self::owner(env.clone())?;
        if *caller != owner {
            return Err(ContractError::Unauthorized);
        }
        Self::executor(env.clone())
    }
}
