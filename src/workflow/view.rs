/// Response views
///
/// Pure mappings from entities to the shapes returned over HTTP.

use crate::workflow::types::{Comment, CommentId, Step, StepId, Workflow, WorkflowAggregate, WorkflowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full workflow: scalar fields, current steps and comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowView {
    pub id: WorkflowId,
    pub name: String,
    pub description: String,
    pub steps: Vec<StepView>,
    pub comments: Vec<CommentItemView>,
}

/// Row of the workflow listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepView {
    pub id: StepId,
    pub name: String,
    pub description: String,
    /// Display label, e.g. "In definition"
    pub status: String,
}

/// Comment as nested inside a workflow view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentItemView {
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Standalone comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub uuid: Uuid,
    pub workflow_id: WorkflowId,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<&WorkflowAggregate> for WorkflowView {
    fn from(aggregate: &WorkflowAggregate) -> Self {
        Self {
            id: aggregate.workflow.id,
            name: aggregate.workflow.name.clone(),
            description: aggregate.workflow.description.clone(),
            steps: aggregate.steps.iter().map(StepView::from).collect(),
            comments: aggregate.comments.iter().map(CommentItemView::from).collect(),
        }
    }
}

impl From<&Workflow> for WorkflowSummary {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id,
            uuid: workflow.uuid,
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            created_at: workflow.created_at,
        }
    }
}

impl From<&Step> for StepView {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id,
            name: step.name.clone(),
            description: step.description.clone(),
            status: step.status.label().to_string(),
        }
    }
}

impl From<&Comment> for CommentItemView {
    fn from(comment: &Comment) -> Self {
        Self {
            name: comment.name.clone(),
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            uuid: comment.uuid,
            workflow_id: comment.workflow_id,
            name: comment.name.clone(),
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}
