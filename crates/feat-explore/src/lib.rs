pub mod base;
pub mod generate;
pub mod product;
pub mod rng;
pub mod value;

/// Errors during generation. Parsing rejects every user-facing problem, so
/// reaching one of these means a parser/generator contract was broken.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("generation invariant violated at '{node}': {reason}")]
    InvariantViolation { node: String, reason: String },
}

impl GenerateError {
    pub(crate) fn violation(node: &feat_ir::types::DomainNode, reason: impl Into<String>) -> Self {
        GenerateError::InvariantViolation {
            node: node.to_string(),
            reason: reason.into(),
        }
    }
}
