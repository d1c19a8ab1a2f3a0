#![allow(deprecated)]

//! Structured event publishing for the severity aggregator.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

use crate::access::DisclosurePolicy;
use crate::store::AggregateHandles;

/// Fired for every accepted submission, valid or not. Exposes the new
/// aggregate handles to readers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportSubmittedEvent {
    pub reporter: Address,
    pub content_ref: BytesN<32>,
    pub severity: BytesN<32>,
    pub sum: BytesN<32>,
    pub count: BytesN<32>,
    pub sequence: u64,
}

pub fn publish_project_initialized(env: &Env, project_id: u64) {
    env.events()
        .publish((symbol_short!("PRJ_INIT"), project_id), ());
}

pub fn publish_report_submitted(env: &Env, project_id: u64, event: ReportSubmittedEvent) {
    env.events()
        .publish((symbol_short!("REPORT"), project_id), event);
}

pub fn publish_aggregates_reset(env: &Env, project_id: u64, handles: &AggregateHandles) {
    env.events()
        .publish((symbol_short!("RESET"), project_id), handles.clone());
}

pub fn publish_aggregates_shared(env: &Env, project_id: u64, account: &Address) {
    env.events()
        .publish((symbol_short!("SHARED"), project_id), account.clone());
}

pub fn publish_ownership_transferred(env: &Env, old_owner: &Address, new_owner: &Address) {
    env.events().publish(
        (symbol_short!("OWN_XFER"),),
        (old_owner.clone(), new_owner.clone()),
    );
}

pub fn publish_policy_changed(env: &Env, policy: DisclosurePolicy) {
    env.events()
        .publish((symbol_short!("POLICY"),), policy);
}
