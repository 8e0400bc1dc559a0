use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one implementation of the function under test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementationId(pub String);

impl ImplementationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImplementationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImplementationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ImplementationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why an execution produced no return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "detail", rename_all = "snake_case")]
pub enum FailureKind {
    /// Exceeded the oracle's time budget.
    Timeout,
    /// Raised an exception; carries the exception type name.
    Exception(String),
    /// The process exited with a non-zero status.
    NonZeroExit(i32),
    /// The process finished but its output could not be read back.
    MalformedOutput,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::Exception(name) => write!(f, "exception {name}"),
            FailureKind::NonZeroExit(code) => write!(f, "exit status {code}"),
            FailureKind::MalformedOutput => f.write_str("malformed output"),
        }
    }
}

/// Result of running one test case against one implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The rendered return value.
    Returned(String),
    Failed(FailureKind),
}

impl Outcome {
    pub fn returned(value: impl Into<String>) -> Self {
        Outcome::Returned(value.into())
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Unequal return values, exactly one side failing, or different failure
    /// categories all count as a difference.
    pub fn differs_from(&self, reference: &Outcome) -> bool {
        self != reference
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Returned(value) => f.write_str(value),
            Outcome::Failed(kind) => write!(f, "failed: {kind}"),
        }
    }
}
