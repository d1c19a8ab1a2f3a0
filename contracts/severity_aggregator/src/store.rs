use soroban_sdk::{contracttype, Env};

use crate::access;
use crate::events;
use crate::fhe::{Fhe, Handle};
use crate::{ContractError, DataKey};

const TTL_THRESHOLD: u32 = 17_280;
const TTL_EXTEND_TO: u32 = 518_400;

/// Per-project encrypted accumulators.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectAggregate {
    pub sum: Handle,
    pub count: Handle,
    /// Accepted submission calls, valid or not. Public by nature: each one is
    /// a ledger transaction.
    pub submissions: u64,
}

/// Current opaque handles of a project's accumulators.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateHandles {
    pub sum: Handle,
    pub count: Handle,
}

impl ProjectAggregate {
    pub fn handles(&self) -> AggregateHandles {
        AggregateHandles {
            sum: self.sum.clone(),
            count: self.count.clone(),
        }
    }
}

pub fn exists(env: &Env, project_id: u64) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Aggregate(project_id))
}

pub fn load(env: &Env, project_id: u64) -> Result<ProjectAggregate, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Aggregate(project_id))
        .ok_or(ContractError::NotFound)
}

pub fn handles(env: &Env, project_id: u64) -> Result<AggregateHandles, ContractError> {
    Ok(load(env, project_id)?.handles())
}

pub fn submissions(env: &Env, project_id: u64) -> u64 {
    load(env, project_id).map(|a| a.submissions).unwrap_or(0)
}

/// Commit a new aggregate. Sum and count are always written together.
pub(crate) fn replace(env: &Env, project_id: u64, aggregate: &ProjectAggregate) {
    let key = DataKey::Aggregate(project_id);
    env.storage().persistent().set(&key, aggregate);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Fresh encrypted zeros for both accumulators, already secured.
fn zeroed(env: &Env, fhe: &Fhe) -> Result<AggregateHandles, ContractError> {
    let sum = fhe.constant_u64(0)?;
    let count = fhe.constant_u64(0)?;
    access::secure(env, fhe, &sum)?;
    access::secure(env, fhe, &count)?;
    Ok(AggregateHandles { sum, count })
}

/// Create the project's accumulators if absent. Existing totals are left
/// untouched.
pub fn ensure_initialized(env: &Env, fhe: &Fhe, project_id: u64) -> Result<ProjectAggregate, ContractError> {
    if let Ok(existing) = load(env, project_id) {
        return Ok(existing);
    }

    let zeros = zeroed(env, fhe)?;
    let aggregate = ProjectAggregate {
        sum: zeros.sum,
        count: zeros.count,
        submissions: 0,
    };
    replace(env, project_id, &aggregate);
    events::publish_project_initialized(env, project_id);
    Ok(aggregate)
}

/// Replace both accumulators with encrypted zero under new handles, so stale
/// handles held by readers keep pointing at pre-reset values.
pub fn reset(env: &Env, fhe: &Fhe, project_id: u64) -> Result<AggregateHandles, ContractError> {
    let current = load(env, project_id)?;

    let zeros = zeroed(env, fhe)?;
    let aggregate = ProjectAggregate {
        sum: zeros.sum.clone(),
        count: zeros.count.clone(),
        submissions: current.submissions,
    };
    replace(env, project_id, &aggregate);
    events::publish_aggregates_reset(env, project_id, &zeros);
    Ok(zeros)
}
