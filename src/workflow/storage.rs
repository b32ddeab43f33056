/// Persistence gateway for workflows, steps and comments
///
/// `WorkflowStore` is the typed CRUD contract the rest of the crate depends on;
/// `SqliteStore` implements it over sqlx. Every call is an individual statement,
/// there is no enclosing transaction across calls.

use crate::workflow::types::{
    Comment, CommentId, NewComment, NewStep, Step, StepId, StepStatus, Workflow, WorkflowId,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    Row,
};
use uuid::Uuid;

/// Typed CRUD operations against durable storage
///
/// Lookups return `Ok(None)` for missing records; updates and deletes report
/// whether a row was touched. Callers decide what "missing" means.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn create_workflow(&self, name: &str, description: &str) -> Result<Workflow>;
    async fn get_workflow(&self, id: WorkflowId) -> Result<Option<Workflow>>;
    async fn list_workflows(&self) -> Result<Vec<Workflow>>;
    /// Persists name, description and updated_at
    async fn update_workflow(&self, workflow: &Workflow) -> Result<bool>;
    /// Cascades to the workflow's steps and comments
    async fn delete_workflow(&self, id: WorkflowId) -> Result<bool>;

    async fn create_step(&self, workflow_id: WorkflowId, step: &NewStep) -> Result<Step>;
    /// Looks a step up by `(id, workflow_id)`; a step owned by another workflow is not found
    async fn get_step(&self, id: StepId, workflow_id: WorkflowId) -> Result<Option<Step>>;
    async fn list_steps(&self, workflow_id: WorkflowId) -> Result<Vec<Step>>;
    /// Persists name, description, status and updated_at. Ownership is never rewritten.
    async fn update_step(&self, step: &Step) -> Result<bool>;
    async fn delete_step(&self, id: StepId, workflow_id: WorkflowId) -> Result<bool>;

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment>;
    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>>;
    async fn list_comments(&self) -> Result<Vec<Comment>>;
    async fn list_comments_for(&self, workflow_id: WorkflowId) -> Result<Vec<Comment>>;
    /// Persists name, text and updated_at. Ownership is never rewritten.
    async fn update_comment(&self, comment: &Comment) -> Result<bool>;
    async fn delete_comment(&self, id: CommentId) -> Result<bool>;
}

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Connection pool for the service database
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an already initialized pool (see `workflow::database`)
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowStore for SqliteStore {
    async fn create_workflow(&self, name: &str, description: &str) -> Result<Workflow> {
        let now = Utc::now();
        let uuid = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO workflows (uuid, name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid.to_string())
        .bind(name)
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Workflow {
            id: result.last_insert_rowid(),
            uuid,
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_workflow(&self, id: WorkflowId) -> Result<Option<Workflow>> {
        let row = sqlx::query("SELECT * FROM workflows WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(workflow_from_row).transpose()
    }

    async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        let rows = sqlx::query("SELECT * FROM workflows ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(workflow_from_row).collect()
    }

    async fn update_workflow(&self, workflow: &Workflow) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE workflows SET name = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&workflow.name)
        .bind(&workflow.description)
        .bind(workflow.updated_at)
        .bind(workflow.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_workflow(&self, id: WorkflowId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workflows WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_step(&self, workflow_id: WorkflowId, step: &NewStep) -> Result<Step> {
        let now = Utc::now();
        let uuid = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO workflow_steps (uuid, workflow_id, name, description, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid.to_string())
        .bind(workflow_id)
        .bind(&step.name)
        .bind(&step.description)
        .bind(step.status.code())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Step {
            id: result.last_insert_rowid(),
            uuid,
            workflow_id,
            name: step.name.clone(),
            description: step.description.clone(),
            status: step.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_step(&self, id: StepId, workflow_id: WorkflowId) -> Result<Option<Step>> {
        let row = sqlx::query("SELECT * FROM workflow_steps WHERE id = ? AND workflow_id = ?")
            .bind(id)
            .bind(workflow_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(step_from_row).transpose()
    }

    async fn list_steps(&self, workflow_id: WorkflowId) -> Result<Vec<Step>> {
        let rows = sqlx::query("SELECT * FROM workflow_steps WHERE workflow_id = ? ORDER BY id")
            .bind(workflow_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(step_from_row).collect()
    }

    async fn update_step(&self, step: &Step) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE workflow_steps
            SET name = ?, description = ?, status = ?, updated_at = ?
            WHERE id = ? AND workflow_id = ?
            "#,
        )
        .bind(&step.name)
        .bind(&step.description)
        .bind(step.status.code())
        .bind(step.updated_at)
        .bind(step.id)
        .bind(step.workflow_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_step(&self, id: StepId, workflow_id: WorkflowId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workflow_steps WHERE id = ? AND workflow_id = ?")
            .bind(id)
            .bind(workflow_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let now = Utc::now();
        let uuid = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO comments (uuid, workflow_id, name, text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid.to_string())
        .bind(comment.workflow_id)
        .bind(&comment.name)
        .bind(&comment.text)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            uuid,
            workflow_id: comment.workflow_id,
            name: comment.name.clone(),
            text: comment.text.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(comment_from_row).transpose()
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT * FROM comments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(comment_from_row).collect()
    }

    async fn list_comments_for(&self, workflow_id: WorkflowId) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT * FROM comments WHERE workflow_id = ? ORDER BY id")
            .bind(workflow_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(comment_from_row).collect()
    }

    async fn update_comment(&self, comment: &Comment) -> Result<bool> {
        let result = sqlx::query("UPDATE comments SET name = ?, text = ?, updated_at = ? WHERE id = ?")
            .bind(&comment.name)
            .bind(&comment.text)
            .bind(comment.updated_at)
            .bind(comment.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn parse_uuid(row: &SqliteRow) -> Result<Uuid> {
    let raw: String = row.try_get("uuid")?;
    Ok(Uuid::parse_str(&raw)?)
}

fn workflow_from_row(row: &SqliteRow) -> Result<Workflow> {
    Ok(Workflow {
        id: row.try_get("id")?,
        uuid: parse_uuid(row)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn step_from_row(row: &SqliteRow) -> Result<Step> {
    let code: i64 = row.try_get("status")?;
    let status = StepStatus::from_code(code)
        .ok_or_else(|| anyhow::anyhow!("Unknown step status code: {}", code))?;

    Ok(Step {
        id: row.try_get("id")?,
        uuid: parse_uuid(row)?,
        workflow_id: row.try_get("workflow_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        status,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn comment_from_row(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        uuid: parse_uuid(row)?,
        workflow_id: row.try_get("workflow_id")?,
        name: row.try_get("name")?,
        text: row.try_get("text")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
