//! Execution oracle seam.
//!
//! How a case is run (subprocess, in-process call, RPC) is the oracle's
//! business. It must be deterministic per (case, implementation) and enforce
//! its own time budget; timeouts and crashes come back as
//! `Outcome::Failed`, never as errors.

use std::collections::BTreeMap;

use feat_concise::outcome::{ImplementationId, Outcome};
use feat_concise::results::ResultsMatrix;
use feat_explore::value::TestCase;
use rayon::prelude::*;
use tracing::debug;

pub trait Oracle: Sync {
    fn evaluate(&self, case: &TestCase, implementation: &ImplementationId) -> Outcome;
}

impl<F> Oracle for F
where
    F: Fn(&TestCase, &ImplementationId) -> Outcome + Sync,
{
    fn evaluate(&self, case: &TestCase, implementation: &ImplementationId) -> Outcome {
        self(case, implementation)
    }
}

/// Evaluate every case against the reference and every candidate.
///
/// Cases are evaluated in parallel; rows land in the matrix in `cases`
/// order.
pub fn collect_results<O: Oracle + ?Sized>(
    oracle: &O,
    cases: &[TestCase],
    reference: &ImplementationId,
    candidates: &[ImplementationId],
) -> ResultsMatrix {
    let implementations: Vec<&ImplementationId> =
        std::iter::once(reference).chain(candidates.iter()).collect();

    let rows: Vec<BTreeMap<ImplementationId, Outcome>> = cases
        .par_iter()
        .map(|case| {
            implementations
                .iter()
                .map(|id| ((*id).clone(), oracle.evaluate(case, id)))
                .collect()
        })
        .collect();

    let failures = rows
        .iter()
        .flat_map(|row| row.values())
        .filter(|o| o.is_failure())
        .count();
    debug!(
        cases = cases.len(),
        implementations = implementations.len(),
        failures,
        "oracle evaluation complete"
    );

    let mut matrix = ResultsMatrix::new(reference.clone());
    for (case, outcomes) in cases.iter().zip(rows) {
        matrix.push_row(case.clone(), outcomes);
    }
    matrix
}
