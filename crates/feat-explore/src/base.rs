//! Base-set assembly: the exhaustive product followed by random samples,
//! deduplicated by structural equality, in generation order.

use std::collections::HashSet;

use feat_ir::types::DomainNode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::generate::random_value;
use crate::product::CartesianProduct;
use crate::rng::param_rngs;
use crate::value::{TestCase, Value};
use crate::GenerateError;

/// Knobs for base-set generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Number of random tuples to draw.
    pub random_count: u64,
    /// Global seed for the per-parameter RNGs.
    pub seed: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            random_count: 0,
            seed: 42,
        }
    }
}

/// The deduplicated base input set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseSet {
    cases: Vec<TestCase>,
    /// How many leading cases came from the exhaustive product.
    exhaustive_count: usize,
}

impl BaseSet {
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    pub fn exhaustive_count(&self) -> usize {
        self.exhaustive_count
    }

    /// Random cases that were not already in the exhaustive portion.
    pub fn random_count(&self) -> usize {
        self.cases.len() - self.exhaustive_count
    }

    pub fn contains(&self, case: &TestCase) -> bool {
        self.cases.contains(case)
    }

    /// JSON form handed to out-of-process oracles.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a BaseSet {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Draw `count` random parameter tuples.
pub fn random_cases(
    nodes: &[DomainNode],
    count: u64,
    seed: u64,
) -> Result<Vec<TestCase>, GenerateError> {
    let mut rngs = param_rngs(seed, nodes.len());
    let mut cases = Vec::new();
    for _ in 0..count {
        let args = nodes
            .iter()
            .zip(rngs.iter_mut())
            .map(|(node, rng)| random_value(node, rng))
            .collect::<Result<Vec<_>, _>>()?;
        cases.push(TestCase::new(args));
    }
    Ok(cases)
}

/// Build the base set: exhaustive ∪ random.
pub fn generate_base(
    nodes: &[DomainNode],
    options: GenerateOptions,
) -> Result<BaseSet, GenerateError> {
    if let Some(node) = nodes.iter().find(|n| !n.is_populated()) {
        return Err(GenerateError::violation(node, "domains were never populated"));
    }

    let product = CartesianProduct::new(nodes)?;
    info!(
        params = nodes.len(),
        exhaustive = %product.len(),
        random = options.random_count,
        "generating base set"
    );

    // Per-parameter sets are already deduplicated, so product tuples are
    // distinct and a tuple is in the product iff each component is in its
    // parameter's set.
    let mut cases: Vec<TestCase> = product.iter().collect();
    let exhaustive_count = cases.len();
    let members: Vec<HashSet<&Value>> = product
        .sets()
        .iter()
        .map(|set| set.iter().collect())
        .collect();
    let in_product = |case: &TestCase| {
        case.args()
            .iter()
            .zip(&members)
            .all(|(arg, set)| set.contains(arg))
    };

    let mut drawn = HashSet::new();
    let mut duplicates = 0usize;
    for case in random_cases(nodes, options.random_count, options.seed)? {
        if in_product(&case) || drawn.contains(&case) {
            duplicates += 1;
            continue;
        }
        drawn.insert(case.clone());
        cases.push(case);
    }
    debug!(
        exhaustive = exhaustive_count,
        random = cases.len() - exhaustive_count,
        duplicates,
        "base set assembled"
    );

    Ok(BaseSet {
        cases,
        exhaustive_count,
    })
}
