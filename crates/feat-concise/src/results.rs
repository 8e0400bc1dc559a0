//! Outcomes of every (test case, implementation) pair.
//!
//! Rows keep the order in which cases were first recorded, which is the
//! generation order the minimizer uses to break ties.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use feat_explore::value::TestCase;
use serde::{Deserialize, Serialize};

use crate::outcome::{ImplementationId, Outcome};

/// All outcomes for one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub case: TestCase,
    pub outcomes: BTreeMap<ImplementationId, Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "MatrixRows")]
pub struct ResultsMatrix {
    reference: ImplementationId,
    rows: Vec<ResultRow>,
    #[serde(skip)]
    index: HashMap<TestCase, usize>,
}

/// Serialized form of a matrix; the lookup index is rebuilt on load.
#[derive(Deserialize)]
struct MatrixRows {
    reference: ImplementationId,
    rows: Vec<ResultRow>,
}

impl From<MatrixRows> for ResultsMatrix {
    fn from(raw: MatrixRows) -> Self {
        let index = raw
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.case.clone(), i))
            .collect();
        Self {
            reference: raw.reference,
            rows: raw.rows,
            index,
        }
    }
}

impl ResultsMatrix {
    pub fn new(reference: impl Into<ImplementationId>) -> Self {
        Self {
            reference: reference.into(),
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Load a matrix written by an out-of-process oracle.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn reference(&self) -> &ImplementationId {
        &self.reference
    }

    /// Record one outcome, creating the case's row on first sight. A second
    /// outcome for the same pair replaces the first.
    pub fn record(&mut self, case: &TestCase, implementation: ImplementationId, outcome: Outcome) {
        let row = self.row_index(case);
        self.rows[row].outcomes.insert(implementation, outcome);
    }

    /// Record a complete row at once.
    pub fn push_row(&mut self, case: TestCase, outcomes: BTreeMap<ImplementationId, Outcome>) {
        let row = self.row_index(&case);
        self.rows[row].outcomes.extend(outcomes);
    }

    fn row_index(&mut self, case: &TestCase) -> usize {
        if let Some(&i) = self.index.get(case) {
            return i;
        }
        self.rows.push(ResultRow {
            case: case.clone(),
            outcomes: BTreeMap::new(),
        });
        let i = self.rows.len() - 1;
        self.index.insert(case.clone(), i);
        i
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn outcome(&self, case: &TestCase, implementation: &ImplementationId) -> Option<&Outcome> {
        self.index
            .get(case)
            .and_then(|&i| self.rows[i].outcomes.get(implementation))
    }

    /// Every non-reference implementation that appears in any row.
    pub fn candidates(&self) -> BTreeSet<ImplementationId> {
        self.rows
            .iter()
            .flat_map(|row| row.outcomes.keys())
            .filter(|id| **id != self.reference)
            .cloned()
            .collect()
    }

    /// Implementations whose outcome on `row` differs from the reference's.
    /// A row without a reference outcome discriminates nothing.
    pub fn discriminating_set(&self, row: &ResultRow) -> BTreeSet<ImplementationId> {
        let Some(expected) = row.outcomes.get(&self.reference) else {
            return BTreeSet::new();
        };
        row.outcomes
            .iter()
            .filter(|(id, outcome)| **id != self.reference && outcome.differs_from(expected))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Discriminating sets of every row, in row order.
    pub fn discriminating_sets(&self) -> Vec<BTreeSet<ImplementationId>> {
        self.rows
            .iter()
            .map(|row| self.discriminating_set(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;
    use feat_explore::value::Value;

    fn case(i: i64) -> TestCase {
        TestCase::new(vec![Value::Int(i)])
    }

    #[test]
    fn test_record_keeps_first_seen_order() {
        let mut m = ResultsMatrix::new("ref");
        m.record(&case(2), "ref".into(), Outcome::returned("2"));
        m.record(&case(1), "ref".into(), Outcome::returned("1"));
        m.record(&case(2), "a".into(), Outcome::returned("3"));
        assert_eq!(m.len(), 2);
        assert_eq!(m.rows()[0].case, case(2));
        assert_eq!(m.rows()[0].outcomes.len(), 2);
    }

    #[test]
    fn test_discriminating_set() {
        let mut m = ResultsMatrix::new("ref");
        let c = case(0);
        m.record(&c, "ref".into(), Outcome::returned("0"));
        m.record(&c, "same".into(), Outcome::returned("0"));
        m.record(&c, "off".into(), Outcome::returned("1"));
        m.record(&c, "boom".into(), Outcome::Failed(FailureKind::Timeout));
        let d = m.discriminating_set(&m.rows()[0]);
        let names: Vec<&str> = d.iter().map(ImplementationId::as_str).collect();
        assert_eq!(names, vec!["boom", "off"]);
        assert_eq!(m.candidates().len(), 3);
    }

    #[test]
    fn test_missing_reference_discriminates_nothing() {
        let mut m = ResultsMatrix::new("ref");
        m.record(&case(0), "a".into(), Outcome::returned("1"));
        assert!(m.discriminating_sets()[0].is_empty());
    }

    #[test]
    fn test_plain_deserialize_builds_index() {
        let mut m = ResultsMatrix::new("ref");
        m.record(&case(1), "ref".into(), Outcome::returned("1"));
        m.record(&case(2), "ref".into(), Outcome::returned("2"));
        let back: ResultsMatrix = serde_json::from_str(&m.to_json().unwrap()).unwrap();
        assert_eq!(
            back.outcome(&case(2), &"ref".into()),
            Some(&Outcome::returned("2"))
        );
        assert_eq!(back.outcome(&case(3), &"ref".into()), None);
    }

    #[test]
    fn test_serde_round_trip_reindexes() {
        let mut m = ResultsMatrix::new("ref");
        m.record(&case(5), "ref".into(), Outcome::returned("5"));
        let json = m.to_json().unwrap();
        let mut back = ResultsMatrix::from_json(&json).unwrap();
        back.record(&case(5), "a".into(), Outcome::returned("6"));
        assert_eq!(back.len(), 1);
        assert_eq!(
            back.outcome(&case(5), &"a".into()),
            Some(&Outcome::returned("6"))
        );
    }
}
