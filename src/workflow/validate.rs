/// Payload validation
///
/// Decodes raw request bodies into typed candidate records before they reach
/// the core. Nothing here touches storage.

use crate::error::ValidationError;
use crate::workflow::types::{
    CommentPatch, NewComment, NewStep, NewWorkflow, ProposedStep, StepPatch, StepStatus,
    WorkflowId, WorkflowUpdate,
};
use serde::{de::DeserializeOwned, Deserialize};

pub const NAME_MAX_LEN: usize = 150;
pub const DESCRIPTION_MAX_LEN: usize = 350;
pub const COMMENT_TEXT_MAX_LEN: usize = 350;

#[derive(Debug, Deserialize)]
struct WorkflowPayload {
    name: Option<String>,
    description: Option<String>,
    steps: Option<Vec<StepPayload>>,
}

#[derive(Debug, Deserialize)]
struct StepPayload {
    id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentPayload {
    workflow_id: Option<WorkflowId>,
    name: Option<String>,
    text: Option<String>,
}

/// Validate a workflow creation body: `{ name, description, steps? }`
///
/// Initial steps are always new, so they may not carry an identifier.
pub fn validate_new_workflow(body: &[u8]) -> Result<NewWorkflow, ValidationError> {
    let payload: WorkflowPayload = parse(body)?;

    let name = required_text(payload.name, "name", NAME_MAX_LEN)?;
    let description = required_text(payload.description, "description", DESCRIPTION_MAX_LEN)?;

    let mut steps = Vec::new();
    for (index, step) in payload.steps.unwrap_or_default().into_iter().enumerate() {
        if step.id.is_some() {
            return Err(ValidationError::Invalid {
                field: format!("steps[{}].id", index),
                message: "identifiers are assigned by the server".to_string(),
            });
        }
        steps.push(new_step(step, index)?);
    }

    Ok(NewWorkflow { name, description, steps })
}

/// Validate a workflow update body: `{ name?, description?, steps?: [{ id?, name, description, status? }] }`
pub fn validate_workflow_update(body: &[u8]) -> Result<WorkflowUpdate, ValidationError> {
    let payload: WorkflowPayload = parse(body)?;

    let name = optional_text(payload.name, "name", NAME_MAX_LEN)?;
    let description = optional_text(payload.description, "description", DESCRIPTION_MAX_LEN)?;

    let steps = match payload.steps {
        Some(entries) => {
            let mut proposed = Vec::with_capacity(entries.len());
            for (index, step) in entries.into_iter().enumerate() {
                proposed.push(proposed_step(step, index)?);
            }
            Some(proposed)
        }
        None => None,
    };

    Ok(WorkflowUpdate { name, description, steps })
}

/// Validate a comment creation body: `{ workflow_id, name, text }`
pub fn validate_new_comment(body: &[u8]) -> Result<NewComment, ValidationError> {
    let payload: CommentPayload = parse(body)?;

    let workflow_id = payload.workflow_id.ok_or_else(|| ValidationError::Missing {
        field: "workflow_id".to_string(),
    })?;
    let name = required_text(payload.name, "name", NAME_MAX_LEN)?;
    let text = required_text(payload.text, "text", COMMENT_TEXT_MAX_LEN)?;

    Ok(NewComment { workflow_id, name, text })
}

/// Validate a comment update body: `{ name?, text? }`. A `workflow_id` is ignored.
pub fn validate_comment_update(body: &[u8]) -> Result<CommentPatch, ValidationError> {
    let payload: CommentPayload = parse(body)?;

    Ok(CommentPatch {
        name: optional_text(payload.name, "name", NAME_MAX_LEN)?,
        text: optional_text(payload.text, "text", COMMENT_TEXT_MAX_LEN)?,
    })
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, ValidationError> {
    serde_json::from_slice(body).map_err(|e| ValidationError::Malformed(e.to_string()))
}

fn proposed_step(step: StepPayload, index: usize) -> Result<ProposedStep, ValidationError> {
    match step.id {
        Some(id) => Ok(ProposedStep::Existing {
            id,
            patch: StepPatch {
                name: optional_text(step.name, &format!("steps[{}].name", index), NAME_MAX_LEN)?,
                description: optional_text(
                    step.description,
                    &format!("steps[{}].description", index),
                    DESCRIPTION_MAX_LEN,
                )?,
                status: status(step.status, index)?,
            },
        }),
        None => Ok(ProposedStep::New(new_step(step, index)?)),
    }
}

fn new_step(step: StepPayload, index: usize) -> Result<NewStep, ValidationError> {
    Ok(NewStep {
        name: required_text(step.name, &format!("steps[{}].name", index), NAME_MAX_LEN)?,
        description: required_text(
            step.description,
            &format!("steps[{}].description", index),
            DESCRIPTION_MAX_LEN,
        )?,
        status: status(step.status, index)?.unwrap_or_default(),
    })
}

fn status(raw: Option<String>, index: usize) -> Result<Option<StepStatus>, ValidationError> {
    raw.map(|value| {
        value.parse::<StepStatus>().map_err(|message| ValidationError::Invalid {
            field: format!("steps[{}].status", index),
            message,
        })
    })
    .transpose()
}

fn required_text(value: Option<String>, field: &str, max: usize) -> Result<String, ValidationError> {
    match value {
        Some(value) => checked_text(value, field, max),
        None => Err(ValidationError::Missing { field: field.to_string() }),
    }
}

fn optional_text(value: Option<String>, field: &str, max: usize) -> Result<Option<String>, ValidationError> {
    value.map(|value| checked_text(value, field, max)).transpose()
}

/// Surrounding whitespace is trimmed before the blank and length checks
fn checked_text(value: String, field: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field: field.to_string() });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field: field.to_string(), max });
    }
    Ok(trimmed.to_string())
}
