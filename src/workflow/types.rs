/// Core entity type definitions
///
/// Plain data entities for workflows, their ordered steps and the comments
/// attached to them, plus the typed candidate records produced by the validator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type WorkflowId = i64;
pub type StepId = i64;
pub type CommentId = i64;

/// Top-level aggregate root
///
/// Owns its steps and comments: deleting a workflow deletes both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// System-assigned identifier, immutable
    pub id: WorkflowId,
    /// External reference, unique across workflows
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named stage within exactly one workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub uuid: Uuid,
    /// Owning workflow, fixed at creation
    pub workflow_id: WorkflowId,
    pub name: String,
    pub description: String,
    pub status: StepStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Freeform annotation attached to a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub uuid: Uuid,
    pub workflow_id: WorkflowId,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A workflow together with its current steps and comments
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowAggregate {
    pub workflow: Workflow,
    /// Ordered by step id
    pub steps: Vec<Step>,
    /// Ordered by comment id
    pub comments: Vec<Comment>,
}

/// Lifecycle status of a step
///
/// A closed data field, not a state machine: any value may be set at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    #[default]
    InDefinition,
    Active,
    Retired,
}

impl StepStatus {
    /// Stable display label
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::InDefinition => "In definition",
            StepStatus::Active => "Active",
            StepStatus::Retired => "Retired",
        }
    }

    /// Integer code used in the `workflow_steps.status` column
    pub fn code(&self) -> i64 {
        match self {
            StepStatus::InDefinition => 0,
            StepStatus::Active => 1,
            StepStatus::Retired => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(StepStatus::InDefinition),
            1 => Some(StepStatus::Active),
            2 => Some(StepStatus::Retired),
            _ => None,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StepStatus {
    type Err = String;

    /// Accepts either the variant name ("InDefinition") or the label ("In definition")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "indefinition" => Ok(StepStatus::InDefinition),
            "active" => Ok(StepStatus::Active),
            "retired" => Ok(StepStatus::Retired),
            _ => Err(format!(
                "\"{}\" is not a valid choice (expected one of: In definition, Active, Retired)",
                s
            )),
        }
    }
}

/// Candidate record for a brand-new step
#[derive(Debug, Clone, PartialEq)]
pub struct NewStep {
    pub name: String,
    pub description: String,
    pub status: StepStatus,
}

/// Partial update for an existing step; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<StepStatus>,
}

/// One entry of a proposed step collection
///
/// Entries carrying an identifier update that step in place; entries without
/// one create a new step.
#[derive(Debug, Clone, PartialEq)]
pub enum ProposedStep {
    Existing { id: StepId, patch: StepPatch },
    New(NewStep),
}

impl ProposedStep {
    pub fn id(&self) -> Option<StepId> {
        match self {
            ProposedStep::Existing { id, .. } => Some(*id),
            ProposedStep::New(_) => None,
        }
    }
}

/// Candidate record for workflow creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkflow {
    pub name: String,
    pub description: String,
    /// Initial steps, created in order
    pub steps: Vec<NewStep>,
}

/// Candidate record for a full workflow update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `None` means the caller did not send a step collection at all
    pub steps: Option<Vec<ProposedStep>>,
}

/// Candidate record for comment creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub workflow_id: WorkflowId,
    pub name: String,
    pub text: String,
}

/// Partial update for a comment. The owning workflow cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPatch {
    pub name: Option<String>,
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_labels_and_variant_names() {
        assert_eq!("In definition".parse::<StepStatus>(), Ok(StepStatus::InDefinition));
        assert_eq!("InDefinition".parse::<StepStatus>(), Ok(StepStatus::InDefinition));
        assert_eq!("ACTIVE".parse::<StepStatus>(), Ok(StepStatus::Active));
        assert_eq!("retired".parse::<StepStatus>(), Ok(StepStatus::Retired));
        assert!("archived".parse::<StepStatus>().is_err());
    }

    #[test]
    fn status_codes_are_stable() {
        for status in [StepStatus::InDefinition, StepStatus::Active, StepStatus::Retired] {
            assert_eq!(StepStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(StepStatus::from_code(7), None);
        assert_eq!(StepStatus::default(), StepStatus::InDefinition);
        assert_eq!(StepStatus::Retired.to_string(), "Retired");
    }
}
