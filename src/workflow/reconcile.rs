/// Step reconciliation engine
///
/// Aligns a workflow's persisted steps with a caller-proposed step collection.
/// The step collection is only touched when the identifiers in the proposal
/// (id-less entries excluded) are exactly the identifiers of the current steps;
/// otherwise the pass is skipped without error and nothing is written. A step
/// the caller did not account for is therefore never lost.
///
/// Writes are issued one by one through the store. A failure partway through a
/// pass leaves the earlier writes in place.

use crate::error::{WorkflowError, WorkflowResult};
use crate::workflow::service::load_aggregate;
use crate::workflow::storage::WorkflowStore;
use crate::workflow::types::{
    ProposedStep, Step, StepId, StepPatch, WorkflowAggregate, WorkflowId, WorkflowUpdate,
};
use chrono::Utc;
use std::collections::BTreeSet;

/// What a reconciliation pass did to the step collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Gate held: steps updated in place and created, ids in input order
    Applied {
        updated: Vec<StepId>,
        created: Vec<StepId>,
    },
    /// Gate failed: the step collection was left untouched
    Skipped {
        proposed: BTreeSet<StepId>,
        current: BTreeSet<StepId>,
    },
}

/// Identifiers carried by the proposal, ignoring entries that create new steps
pub fn proposed_ids(proposed: &[ProposedStep]) -> BTreeSet<StepId> {
    proposed.iter().filter_map(ProposedStep::id).collect()
}

pub fn current_ids(current: &[Step]) -> BTreeSet<StepId> {
    current.iter().map(|step| step.id).collect()
}

/// Reconcile `proposed` against the `current` snapshot of `workflow_id`'s steps
///
/// Entries with an id are looked up by `(id, workflow_id)` and patched; entries
/// without one become new steps with their given status (default
/// `InDefinition`). A matched id that no longer exists in storage aborts the
/// pass with `NotFound`.
pub async fn reconcile(
    store: &dyn WorkflowStore,
    workflow_id: WorkflowId,
    current: &[Step],
    proposed: &[ProposedStep],
) -> WorkflowResult<ReconcileOutcome> {
    let proposed_set = proposed_ids(proposed);
    let current_set = current_ids(current);

    if proposed_set != current_set {
        tracing::warn!(
            "⏭️ Step reconciliation skipped for workflow {}: proposed ids {:?} != current ids {:?}",
            workflow_id,
            proposed_set,
            current_set
        );
        return Ok(ReconcileOutcome::Skipped {
            proposed: proposed_set,
            current: current_set,
        });
    }

    let mut updated = Vec::new();
    let mut created = Vec::new();

    for entry in proposed {
        match entry {
            ProposedStep::Existing { id, patch } => {
                let step = store
                    .get_step(*id, workflow_id)
                    .await?
                    .ok_or_else(|| {
                        tracing::warn!("❌ Step {} vanished from workflow {} mid-reconciliation", id, workflow_id);
                        WorkflowError::step_not_found(*id)
                    })?;

                let step = apply_patch(step, patch);
                if !store.update_step(&step).await? {
                    return Err(WorkflowError::step_not_found(*id));
                }
                updated.push(step.id);
            }
            ProposedStep::New(new_step) => {
                let step = store.create_step(workflow_id, new_step).await?;
                created.push(step.id);
            }
        }
    }

    tracing::info!(
        "🔁 Reconciled workflow {}: {} step(s) updated, {} created",
        workflow_id,
        updated.len(),
        created.len()
    );

    Ok(ReconcileOutcome::Applied { updated, created })
}

/// Full workflow update
///
/// Scalar fields are applied unconditionally (omitted ones keep their value) and
/// persisted before the step collection is reconciled. When the caller sent no
/// step collection at all, reconciliation is not attempted. Returns the
/// refreshed aggregate.
pub async fn update_workflow(
    store: &dyn WorkflowStore,
    workflow_id: WorkflowId,
    update: WorkflowUpdate,
) -> WorkflowResult<WorkflowAggregate> {
    let mut workflow = store
        .get_workflow(workflow_id)
        .await?
        .ok_or_else(|| WorkflowError::workflow_not_found(workflow_id))?;

    if let Some(name) = update.name {
        workflow.name = name;
    }
    if let Some(description) = update.description {
        workflow.description = description;
    }
    workflow.updated_at = Utc::now();

    if !store.update_workflow(&workflow).await? {
        return Err(WorkflowError::workflow_not_found(workflow_id));
    }

    if let Some(proposed) = update.steps {
        let current = store.list_steps(workflow_id).await?;
        let outcome = reconcile(store, workflow_id, &current, &proposed).await?;
        tracing::debug!("Reconciliation outcome for workflow {}: {:?}", workflow_id, outcome);
    }

    load_aggregate(store, workflow_id).await
}

fn apply_patch(mut step: Step, patch: &StepPatch) -> Step {
    if let Some(name) = &patch.name {
        step.name = name.clone();
    }
    if let Some(description) = &patch.description {
        step.description = description.clone();
    }
    if let Some(status) = patch.status {
        step.status = status;
    }
    step.updated_at = Utc::now();
    step
}
