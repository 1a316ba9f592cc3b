use thiserror::Error;

use crate::query_plan::PlanError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqlGeneratorError {
    #[error("Plan invariant violated: {0}")]
    PlanInvariant(#[from] PlanError),

    #[error("Expression rendering failed: {0}")]
    Expression(String),
}
