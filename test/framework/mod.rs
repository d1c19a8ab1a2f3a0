//! # Severity Aggregator Testing Framework
//!
//! A reusable harness for the severity aggregator and its FHE executor,
//! supporting property-based testing and invariant checking over decrypted
//! aggregate snapshots.
//!
//! ## Architecture
//!
//! ```text
//! test/framework/
//! ├── mod.rs          # TestEnv, AggregatorTestHarness, snapshots
//! ├── generators.rs   # proptest strategies for severities and actions
//! └── invariants.rs   # snapshot and transition invariants
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use test_framework::{AggregatorTestHarness, TestEnv};
//!
//! let mut env = TestEnv::new();
//! let harness = AggregatorTestHarness::new(&mut env);
//! let reporter = harness.create_reporter();
//! harness.submit(&reporter, 1, 3);
//! assert_eq!(harness.snapshot(1).sum, 3);
//! ```

extern crate std;

pub mod generators;

use fhe_executor::{CipherKind, EncryptedInput, FheExecutorContract, FheExecutorContractClient};
use severity_aggregator::{
    AggregateHandles, ContractError, SeverityAggregatorContract, SeverityAggregatorContractClient,
};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    Address, BytesN, Env,
};

use generators::ReportAction;

// ── Core Test Environment ────────────────────────────────────────────────────

/// Wraps the Soroban `Env` with address management and ledger control.
pub struct TestEnv {
    pub env: Env,
    generated_addresses: std::vec::Vec<Address>,
}

impl TestEnv {
    /// Create a new test environment with all auth mocked.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        Self {
            env,
            generated_addresses: std::vec::Vec::new(),
        }
    }

    /// Generate a fresh Soroban address (cached for re-use).
    pub fn generate_address(&mut self) -> Address {
        let addr = Address::generate(&self.env);
        self.generated_addresses.push(addr.clone());
        addr
    }

    /// Close the current ledger. Transient ciphertext grants expire.
    pub fn advance_ledger(&self) {
        let current = self.env.ledger().sequence();
        self.env.ledger().set_sequence_number(current.saturating_add(1));
    }

    pub fn sequence(&self) -> u32 {
        self.env.ledger().sequence()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// ── Aggregator Harness ───────────────────────────────────────────────────────

/// Executor and aggregator deployed and wired together, with an owner.
pub struct AggregatorTestHarness<'a> {
    pub env: &'a mut TestEnv,
    pub client: SeverityAggregatorContractClient<'static>,
    pub fhe: FheExecutorContractClient<'static>,
    pub contract_id: Address,
    pub owner: Address,
}

impl<'a> AggregatorTestHarness<'a> {
    pub fn new(env: &'a mut TestEnv) -> Self {
        let executor_id = env.env.register(FheExecutorContract, ());
        let fhe = FheExecutorContractClient::new(&env.env, &executor_id);

        let contract_id = env.env.register(SeverityAggregatorContract, ());
        let client = SeverityAggregatorContractClient::new(&env.env, &contract_id);
        let owner = env.generate_address();

        client.initialize(&owner, &executor_id);

        Self {
            env,
            client,
            fhe,
            contract_id,
            owner,
        }
    }

    pub fn create_reporter(&self) -> Address {
        Address::generate(&self.env.env)
    }

    /// Encrypt `severity` for `reporter` the way a client would.
    pub fn encrypt(&self, reporter: &Address, severity: u8) -> EncryptedInput {
        self.fhe.encrypt_input(
            &self.contract_id,
            reporter,
            &u64::from(severity),
            &CipherKind::U8,
        )
    }

    pub fn content_ref(&self, tag: u64) -> BytesN<32> {
        let mut raw = [0xc0u8; 32];
        raw[..8].copy_from_slice(&tag.to_be_bytes());
        BytesN::from_array(&self.env.env, &raw)
    }

    pub fn submit(&self, reporter: &Address, project_id: u64, severity: u8) {
        let input = self.encrypt(reporter, severity);
        let cref = self.content_ref(self.client.submission_count(&project_id));
        self.client
            .submit_report(reporter, &project_id, &cref, &input.handle, &input.proof);
    }

    pub fn try_reset(&self, caller: &Address, project_id: u64) -> Result<(), ContractError> {
        match self.client.try_reset_aggregates(caller, &project_id) {
            Ok(Ok(_)) => Ok(()),
            Err(Ok(e)) => Err(e),
            _ => panic!("reset_aggregates failed outside the contract error set"),
        }
    }

    pub fn handles(&self, project_id: u64) -> Option<AggregateHandles> {
        match self.client.try_get_aggregate_handles(&project_id) {
            Ok(Ok(h)) => Some(h),
            _ => None,
        }
    }

    /// Decrypted view of a project. Absent projects read as zero.
    ///
    /// Decrypts as the owner so the snapshot works under either disclosure
    /// policy.
    pub fn snapshot(&self, project_id: u64) -> AggregateSnapshot {
        let submissions = self.client.submission_count(&project_id);
        match self.handles(project_id) {
            Some(handles) => AggregateSnapshot {
                project_id,
                exists: true,
                sum: self.fhe.user_decrypt(&self.owner, &handles.sum),
                count: self.fhe.user_decrypt(&self.owner, &handles.count),
                submissions,
                handles: Some(handles),
            },
            None => AggregateSnapshot {
                project_id,
                exists: false,
                sum: 0,
                count: 0,
                submissions,
                handles: None,
            },
        }
    }

    /// Apply a generated action. Returns `true` when the action mutated
    /// aggregate state.
    pub fn apply(&self, action: &ReportAction, reporters: &[Address]) -> bool {
        match action {
            ReportAction::Submit {
                reporter_index,
                project_id,
                severity,
            } => {
                let reporter = &reporters[reporter_index % reporters.len()];
                self.submit(reporter, *project_id, *severity);
                true
            }
            ReportAction::Reset { project_id } => self.try_reset(&self.owner, *project_id).is_ok(),
            ReportAction::Share {
                project_id,
                reader_index,
            } => {
                let reader = &reporters[reader_index % reporters.len()];
                let _ = self.client.try_share_aggregates(&self.owner, project_id, reader);
                false
            }
            ReportAction::AdvanceLedger => {
                self.env.advance_ledger();
                false
            }
        }
    }
}

/// Decrypted state of one project at a point in time.
#[derive(Debug, Clone)]
pub struct AggregateSnapshot {
    pub project_id: u64,
    pub exists: bool,
    pub sum: u64,
    pub count: u64,
    pub submissions: u64,
    pub handles: Option<AggregateHandles>,
}

/// Running plaintext model of what the encrypted totals should be.
#[derive(Debug, Clone, Default)]
pub struct ReferenceModel {
    pub totals: std::collections::BTreeMap<u64, (u64, u64)>,
}

impl ReferenceModel {
    pub fn record_submission(&mut self, project_id: u64, severity: u8) {
        let entry = self.totals.entry(project_id).or_insert((0, 0));
        if (1..=5).contains(&severity) {
            entry.0 += u64::from(severity);
            entry.1 += 1;
        }
    }

    pub fn record_reset(&mut self, project_id: u64) {
        if let Some(entry) = self.totals.get_mut(&project_id) {
            *entry = (0, 0);
        }
    }

    pub fn expected(&self, project_id: u64) -> (u64, u64) {
        self.totals.get(&project_id).copied().unwrap_or((0, 0))
    }
}
