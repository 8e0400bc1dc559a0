//! Lazy Cartesian product over per-parameter value sets.
//!
//! Only the per-parameter value sets are materialized; each test case is
//! assembled on demand from an odometer of indices, last parameter varying
//! fastest. The product can be iterated any number of times.

use feat_ir::types::DomainNode;

use crate::generate::exhaustive_values;
use crate::value::{TestCase, Value};
use crate::GenerateError;

#[derive(Debug, Clone)]
pub struct CartesianProduct {
    sets: Vec<Vec<Value>>,
}

impl CartesianProduct {
    /// Exhaustive value sets for every parameter.
    pub fn new(nodes: &[DomainNode]) -> Result<Self, GenerateError> {
        let sets = nodes
            .iter()
            .map(exhaustive_values)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sets })
    }

    pub fn from_sets(sets: Vec<Vec<Value>>) -> Self {
        Self { sets }
    }

    pub fn sets(&self) -> &[Vec<Value>] {
        &self.sets
    }

    /// Number of test cases the product yields, saturating at `u128::MAX`.
    pub fn len(&self) -> u128 {
        self.sets
            .iter()
            .try_fold(1u128, |acc, s| acc.checked_mul(s.len() as u128))
            .unwrap_or(u128::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> ProductIter<'_> {
        ProductIter {
            sets: &self.sets,
            indices: vec![0; self.sets.len()],
            done: self.is_empty(),
        }
    }
}

impl<'a> IntoIterator for &'a CartesianProduct {
    type Item = TestCase;
    type IntoIter = ProductIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct ProductIter<'a> {
    sets: &'a [Vec<Value>],
    indices: Vec<usize>,
    done: bool,
}

impl ProductIter<'_> {
    /// Advance the odometer; returns false once every combination was seen.
    fn advance(&mut self) -> bool {
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.sets[pos].len() {
                return true;
            }
            self.indices[pos] = 0;
        }
        false
    }
}

impl Iterator for ProductIter<'_> {
    type Item = TestCase;

    fn next(&mut self) -> Option<TestCase> {
        if self.done {
            return None;
        }
        let args = self
            .indices
            .iter()
            .zip(self.sets)
            .map(|(&i, set)| set[i].clone())
            .collect();
        if !self.advance() {
            self.done = true;
        }
        Some(TestCase::new(args))
    }
}
