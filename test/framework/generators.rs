//! # Property-Based Test Generators
//!
//! Composable `proptest` strategies for severities, project identifiers and
//! action sequences against the severity aggregator.
//!
//! Severity generators are biased toward the range boundaries (0, 1, 5, 6,
//! 255), where an off-by-one in the encrypted range check would show up.

extern crate std;

use proptest::prelude::*;
use std::vec::Vec;

// ── Scalar Generators ────────────────────────────────────────────────────────

/// Severities inside the accepted range 1–5.
pub fn valid_severity_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![
        1 => Just(1u8),
        1 => Just(5u8),
        6 => (1u8..=5u8),
    ]
}

/// Severities the aggregator must absorb as zero.
pub fn invalid_severity_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![
        3 => Just(0u8),
        3 => Just(6u8),
        1 => Just(u8::MAX),
        3 => (7u8..=u8::MAX),
    ]
}

/// Any byte, with boundary values over-represented.
pub fn severity_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![
        6 => valid_severity_strategy(),
        4 => invalid_severity_strategy(),
    ]
}

/// Non-zero project identifiers from a small pool, so sequences revisit
/// the same project.
pub fn project_id_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        8 => (1u64..=3u64),
        1 => Just(u64::MAX),
    ]
}

// ── Action Generators ────────────────────────────────────────────────────────

/// Actions exercised during state exploration. Index fields select from a
/// pool of test accounts by modular indexing.
#[derive(Debug, Clone)]
pub enum ReportAction {
    Submit {
        reporter_index: usize,
        project_id: u64,
        severity: u8,
    },
    /// Owner reset. A no-op with `NotFound` on unknown projects.
    Reset { project_id: u64 },
    /// Owner share of current handles with a pool account.
    Share { project_id: u64, reader_index: usize },
    AdvanceLedger,
}

/// Weights model realistic usage: submissions dominate, owner operations
/// are rare.
pub fn report_action_strategy(num_reporters: usize) -> impl Strategy<Value = ReportAction> {
    let idx = 0..num_reporters;

    prop_oneof![
        30 => (idx.clone(), project_id_strategy(), severity_strategy()).prop_map(
            |(r, p, s)| ReportAction::Submit { reporter_index: r, project_id: p, severity: s }
        ),
        3 => project_id_strategy().prop_map(|p| ReportAction::Reset { project_id: p }),
        3 => (project_id_strategy(), idx).prop_map(
            |(p, r)| ReportAction::Share { project_id: p, reader_index: r }
        ),
        4 => Just(ReportAction::AdvanceLedger),
    ]
}

pub fn report_action_sequence(
    num_reporters: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<ReportAction>> {
    prop::collection::vec(report_action_strategy(num_reporters), 1..=max_len)
}
