//! Greedy set-cover minimization of the base set.
//!
//! Each test case covers its discriminating set: the implementations whose
//! outcome differs from the reference. The universe is the union of those
//! sets. Each round picks the case that covers the most still-uncovered
//! implementations. Ties go to the case with the fewest already-covered
//! (redundant) members, then to the earliest-generated case. The loop stops
//! when the universe is covered or no case adds anything.
//!
//! Greedy gives the usual ln(n) approximation; it is not guaranteed minimum.

use std::collections::BTreeSet;

use feat_explore::value::TestCase;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::outcome::ImplementationId;
use crate::results::ResultsMatrix;

/// Indices of the chosen sets, in pick order.
pub fn greedy_cover<T: Ord>(sets: &[BTreeSet<T>]) -> Vec<usize> {
    let mut uncovered: BTreeSet<&T> = sets.iter().flatten().collect();
    let mut picked = Vec::new();

    while !uncovered.is_empty() {
        // (index, new elements, redundant elements)
        let mut best: Option<(usize, usize, usize)> = None;
        for (i, set) in sets.iter().enumerate() {
            let gain = set.iter().filter(|e| uncovered.contains(e)).count();
            if gain == 0 {
                continue;
            }
            let redundant = set.len() - gain;
            let better = match best {
                None => true,
                Some((_, best_gain, best_redundant)) => {
                    gain > best_gain || (gain == best_gain && redundant < best_redundant)
                }
            };
            if better {
                best = Some((i, gain, redundant));
            }
        }

        let Some((i, gain, _)) = best else {
            break;
        };
        debug!(index = i, gain, remaining = uncovered.len() - gain, "greedy pick");
        for e in &sets[i] {
            uncovered.remove(e);
        }
        picked.push(i);
    }

    picked
}

/// Outcome of minimizing a results matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverReport {
    /// The concise test set, in pick order.
    pub selected: Vec<TestCase>,
    /// Implementations distinguished from the reference by `selected`.
    pub covered: BTreeSet<ImplementationId>,
    /// Candidates that no generated case tells apart from the reference.
    pub indistinguishable: BTreeSet<ImplementationId>,
}

/// The smallest (greedy) sub-collection of cases that keeps every
/// distinguishable implementation distinguishable.
pub fn minimize(results: &ResultsMatrix) -> Vec<TestCase> {
    minimize_with_report(results).selected
}

pub fn minimize_with_report(results: &ResultsMatrix) -> CoverReport {
    let sets = results.discriminating_sets();
    let picked = greedy_cover(&sets);

    let covered: BTreeSet<ImplementationId> = sets.iter().flatten().cloned().collect();
    let indistinguishable: BTreeSet<ImplementationId> = results
        .candidates()
        .into_iter()
        .filter(|id| !covered.contains(id))
        .collect();
    let selected: Vec<TestCase> = picked
        .iter()
        .map(|&i| results.rows()[i].case.clone())
        .collect();

    info!(
        base = results.len(),
        selected = selected.len(),
        covered = covered.len(),
        indistinguishable = indistinguishable.len(),
        "minimized test set"
    );

    CoverReport {
        selected,
        covered,
        indistinguishable,
    }
}
