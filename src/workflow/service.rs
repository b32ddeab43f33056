/// Workflow and step operations outside of reconciliation
///
/// Creation, aggregate loading, listing and independent deletion. Full updates
/// live in `reconcile`.

use crate::error::{WorkflowError, WorkflowResult};
use crate::workflow::storage::WorkflowStore;
use crate::workflow::types::{NewWorkflow, Step, StepId, Workflow, WorkflowAggregate, WorkflowId};

/// Create a workflow and its initial steps, in input order
pub async fn create_workflow(
    store: &dyn WorkflowStore,
    new_workflow: NewWorkflow,
) -> WorkflowResult<WorkflowAggregate> {
    let workflow = store
        .create_workflow(&new_workflow.name, &new_workflow.description)
        .await?;

    for step in &new_workflow.steps {
        store.create_step(workflow.id, step).await?;
    }

    tracing::info!(
        "🆕 Created workflow {} ({}) with {} step(s)",
        workflow.id,
        workflow.name,
        new_workflow.steps.len()
    );

    load_aggregate(store, workflow.id).await
}

/// Workflow with its steps and comments, both ordered by id
pub async fn load_aggregate(
    store: &dyn WorkflowStore,
    workflow_id: WorkflowId,
) -> WorkflowResult<WorkflowAggregate> {
    let workflow = store
        .get_workflow(workflow_id)
        .await?
        .ok_or_else(|| WorkflowError::workflow_not_found(workflow_id))?;
    let steps = store.list_steps(workflow_id).await?;
    let comments = store.list_comments_for(workflow_id).await?;

    Ok(WorkflowAggregate { workflow, steps, comments })
}

pub async fn list_workflows(store: &dyn WorkflowStore) -> WorkflowResult<Vec<Workflow>> {
    Ok(store.list_workflows().await?)
}

/// Delete a workflow together with its steps and comments
pub async fn delete_workflow(store: &dyn WorkflowStore, workflow_id: WorkflowId) -> WorkflowResult<()> {
    if !store.delete_workflow(workflow_id).await? {
        return Err(WorkflowError::workflow_not_found(workflow_id));
    }
    tracing::info!("🗑️ Deleted workflow {} with its steps and comments", workflow_id);
    Ok(())
}

pub async fn list_steps(store: &dyn WorkflowStore, workflow_id: WorkflowId) -> WorkflowResult<Vec<Step>> {
    if store.get_workflow(workflow_id).await?.is_none() {
        return Err(WorkflowError::workflow_not_found(workflow_id));
    }
    Ok(store.list_steps(workflow_id).await?)
}

/// Delete one step; it must belong to `workflow_id`
pub async fn delete_step(
    store: &dyn WorkflowStore,
    workflow_id: WorkflowId,
    step_id: StepId,
) -> WorkflowResult<()> {
    if store.get_workflow(workflow_id).await?.is_none() {
        return Err(WorkflowError::workflow_not_found(workflow_id));
    }
    if !store.delete_step(step_id, workflow_id).await? {
        return Err(WorkflowError::step_not_found(step_id));
    }
    tracing::info!("🗑️ Deleted step {} from workflow {}", step_id, workflow_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::database::connect_in_memory;
    use crate::workflow::storage::SqliteStore;
    use crate::workflow::types::{NewComment, NewStep, StepStatus};

    async fn store() -> SqliteStore {
        SqliteStore::new(connect_in_memory().await.unwrap())
    }

    fn onboarding() -> NewWorkflow {
        NewWorkflow {
            name: "Onboarding".to_string(),
            description: "New hire flow".to_string(),
            steps: vec![
                NewStep {
                    name: "Paperwork".to_string(),
                    description: "Sign contract".to_string(),
                    status: StepStatus::InDefinition,
                },
                NewStep {
                    name: "Laptop".to_string(),
                    description: "Ship hardware".to_string(),
                    status: StepStatus::Active,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_keeps_step_order_and_status() {
        let store = store().await;
        let aggregate = create_workflow(&store, onboarding()).await.unwrap();

        assert_eq!(aggregate.workflow.name, "Onboarding");
        let names: Vec<_> = aggregate.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Paperwork", "Laptop"]);
        assert_eq!(aggregate.steps[1].status, StepStatus::Active);
        assert!(aggregate.steps.iter().all(|s| s.workflow_id == aggregate.workflow.id));
        assert!(aggregate.comments.is_empty());
    }

    #[tokio::test]
    async fn aggregate_includes_comments() {
        let store = store().await;
        let created = create_workflow(&store, onboarding()).await.unwrap();
        store
            .create_comment(&NewComment {
                workflow_id: created.workflow.id,
                name: "review".to_string(),
                text: "ship it".to_string(),
            })
            .await
            .unwrap();

        let aggregate = load_aggregate(&store, created.workflow.id).await.unwrap();
        assert_eq!(aggregate.comments.len(), 1);
        assert_eq!(aggregate.comments[0].text, "ship it");
    }

    #[tokio::test]
    async fn delete_is_not_found_the_second_time() {
        let store = store().await;
        let created = create_workflow(&store, onboarding()).await.unwrap();

        delete_workflow(&store, created.workflow.id).await.unwrap();
        let err = delete_workflow(&store, created.workflow.id).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { entity: "Workflow", .. }));
        assert!(list_workflows(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn step_delete_is_scoped_to_its_workflow() {
        let store = store().await;
        let first = create_workflow(&store, onboarding()).await.unwrap();
        let second = create_workflow(&store, onboarding()).await.unwrap();
        let step_id = first.steps[0].id;

        let err = delete_step(&store, second.workflow.id, step_id).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { entity: "Step", .. }));

        delete_step(&store, first.workflow.id, step_id).await.unwrap();
        assert_eq!(list_steps(&store, first.workflow.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listing_steps_of_missing_workflow_is_not_found() {
        let store = store().await;
        let err = list_steps(&store, 7).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { entity: "Workflow", id: 7 }));
    }
}
