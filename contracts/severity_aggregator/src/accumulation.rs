use soroban_sdk::{Address, BytesN, Env};

use crate::access;
use crate::events;
use crate::fhe::{Fhe, Handle};
use crate::store::{self, ProjectAggregate};
use crate::validator::Contribution;
use crate::ContractError;

/// Details of the submission being folded in, carried into the event.
pub struct Submission {
    pub reporter: Address,
    pub content_ref: BytesN<32>,
    pub severity: Handle,
}

/// Fold `contribution` into the project's accumulators with homomorphic
/// addition, secure the new handles and publish the report event.
///
/// The project must already be initialized.
pub fn accumulate(
    env: &Env,
    fhe: &Fhe,
    project_id: u64,
    current: &ProjectAggregate,
    contribution: &Contribution,
    submission: Submission,
) -> Result<ProjectAggregate, ContractError> {
    let sum = fhe.add(&current.sum, &contribution.value)?;
    let count = fhe.add(&current.count, &contribution.increment)?;

    access::secure(env, fhe, &sum)?;
    access::secure(env, fhe, &count)?;

    let next = ProjectAggregate {
        sum,
        count,
        submissions: current.submissions.saturating_add(1),
    };
    store::replace(env, project_id, &next);

    events::publish_report_submitted(
        env,
        project_id,
        events::ReportSubmittedEvent {
            reporter: submission.reporter,
            content_ref: submission.content_ref,
            severity: submission.severity,
            sum: next.sum.clone(),
            count: next.count.clone(),
            sequence: next.submissions,
        },
    );
    Ok(next)
}
