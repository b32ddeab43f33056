//! Error kinds surfaced by the workflow core
//!
//! Validation failures and missing entities are per-request conditions; storage
//! failures wrap whatever the persistence gateway reported.

use thiserror::Error;

/// Malformed or constraint-violating payload
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Body is not JSON or a field has the wrong type
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("{field}: this field is required")]
    Missing { field: String },

    #[error("{field}: this field may not be blank")]
    Blank { field: String },

    #[error("{field}: ensure this field has no more than {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

/// Workflow core errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced workflow, step or comment does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl WorkflowError {
    pub fn workflow_not_found(id: i64) -> Self {
        WorkflowError::NotFound { entity: "Workflow", id }
    }

    pub fn step_not_found(id: i64) -> Self {
        WorkflowError::NotFound { entity: "Step", id }
    }

    pub fn comment_not_found(id: i64) -> Self {
        WorkflowError::NotFound { entity: "Comment", id }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
