#![no_main]

use arbitrary::Arbitrary;
use fhe_executor::{CipherKind, FheExecutorContract, FheExecutorContractClient};
use libfuzzer_sys::fuzz_target;
use severity_aggregator::{SeverityAggregatorContract, SeverityAggregatorContractClient};
use soroban_sdk::{testutils::{Address as _, Ledger as _}, Address, BytesN, Env};

/// Actions modelling the submission entry point plus owner operations.
///
/// Project ids are folded into a small pool so sequences revisit projects.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Submit { project: u8, severity: u8 },
    SubmitForged { project: u8, severity: u8 },
    Reset { project: u8 },
    Share { project: u8 },
    IntruderReset { project: u8 },
    AdvanceLedger,
}

fn project_id(raw: u8) -> u64 {
    u64::from(raw % 4)
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let executor_id = env.register(FheExecutorContract, ());
    let fhe = FheExecutorContractClient::new(&env, &executor_id);
    let contract_id = env.register(SeverityAggregatorContract, ());
    let client = SeverityAggregatorContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    let intruder = Address::generate(&env);
    if client.try_initialize(&owner, &executor_id).is_err() {
        return;
    }

    let reporters: Vec<Address> = (0..3).map(|_| Address::generate(&env)).collect();
    let mut last_count = [0u64; 4];

    for (i, action) in actions.into_iter().enumerate() {
        let reporter = &reporters[i % reporters.len()];
        let cref = BytesN::from_array(&env, &[(i as u8) | 0x80; 32]);

        let touched = match action {
            FuzzAction::Submit { project, severity } => {
                let p = project_id(project);
                let input = fhe.encrypt_input(&contract_id, reporter, &u64::from(severity), &CipherKind::U8);
                let result = client.try_submit_report(reporter, &p, &cref, &input.handle, &input.proof);
                // Only the reserved project id may fail; severity never does.
                assert_eq!(result.is_ok(), p != 0, "submit outcome depended on severity {}", severity);
                Some(p)
            }
            FuzzAction::SubmitForged { project, severity } => {
                let p = project_id(project);
                let input = fhe.encrypt_input(&contract_id, &intruder, &u64::from(severity), &CipherKind::U8);
                let before = client.try_get_aggregate_handles(&p);
                let result = client.try_submit_report(reporter, &p, &cref, &input.handle, &input.proof);
                assert!(result.is_err(), "input bound to another user was accepted");
                assert_eq!(before, client.try_get_aggregate_handles(&p));
                None
            }
            FuzzAction::Reset { project } => {
                let p = project_id(project);
                if client.try_reset_aggregates(&owner, &p).is_ok() {
                    last_count[p as usize] = 0;
                }
                Some(p)
            }
            FuzzAction::Share { project } => {
                let _ = client.try_share_aggregates(&owner, &project_id(project), reporter);
                None
            }
            FuzzAction::IntruderReset { project } => {
                let p = project_id(project);
                let before = client.try_get_aggregate_handles(&p);
                assert!(client.try_reset_aggregates(&intruder, &p).is_err());
                assert_eq!(before, client.try_get_aggregate_handles(&p));
                None
            }
            FuzzAction::AdvanceLedger => {
                let seq = env.ledger().sequence().saturating_add(1);
                env.ledger().set_sequence_number(seq);
                None
            }
        };

        // ── Post-action invariant checks ──
        if let Some(p) = touched {
            if let Ok(Ok(handles)) = client.try_get_aggregate_handles(&p) {
                let sum = fhe.public_decrypt(&handles.sum);
                let count = fhe.public_decrypt(&handles.count);
                assert!(count >= last_count[p as usize], "INVARIANT VIOLATION: count decreased without reset");
                last_count[p as usize] = count;
                assert!(count <= client.submission_count(&p), "INVARIANT VIOLATION: count > submissions");
                assert!(sum >= count && sum <= count * 5, "INVARIANT VIOLATION: sum {} outside [count, 5*count] for count {}", sum, count);
            }
        }
    }
});
