/// Comment attachment
///
/// Comments always hang off an existing workflow. The owner is chosen at
/// creation and cannot be changed afterwards.

use crate::error::{WorkflowError, WorkflowResult};
use crate::workflow::storage::WorkflowStore;
use crate::workflow::types::{Comment, CommentId, CommentPatch, NewComment};
use chrono::Utc;

/// Create a comment on an existing workflow; NotFound if the workflow does not resolve
pub async fn create_comment(store: &dyn WorkflowStore, new_comment: NewComment) -> WorkflowResult<Comment> {
    if store.get_workflow(new_comment.workflow_id).await?.is_none() {
        tracing::warn!("❌ Comment rejected: workflow {} does not exist", new_comment.workflow_id);
        return Err(WorkflowError::workflow_not_found(new_comment.workflow_id));
    }

    let comment = store.create_comment(&new_comment).await?;
    tracing::info!("💬 Added comment {} to workflow {}", comment.id, comment.workflow_id);

    Ok(comment)
}

/// Partial update: omitted fields keep their stored value
pub async fn update_comment(
    store: &dyn WorkflowStore,
    comment_id: CommentId,
    patch: CommentPatch,
) -> WorkflowResult<Comment> {
    let mut comment = get_comment(store, comment_id).await?;

    if let Some(name) = patch.name {
        comment.name = name;
    }
    if let Some(text) = patch.text {
        comment.text = text;
    }
    comment.updated_at = Utc::now();

    if !store.update_comment(&comment).await? {
        return Err(WorkflowError::comment_not_found(comment_id));
    }

    Ok(comment)
}

pub async fn get_comment(store: &dyn WorkflowStore, comment_id: CommentId) -> WorkflowResult<Comment> {
    store
        .get_comment(comment_id)
        .await?
        .ok_or_else(|| WorkflowError::comment_not_found(comment_id))
}

pub async fn list_comments(store: &dyn WorkflowStore) -> WorkflowResult<Vec<Comment>> {
    Ok(store.list_comments().await?)
}

pub async fn delete_comment(store: &dyn WorkflowStore, comment_id: CommentId) -> WorkflowResult<()> {
    if !store.delete_comment(comment_id).await? {
        return Err(WorkflowError::comment_not_found(comment_id));
    }
    Ok(())
}
