/// Workflow Management Layer
///
/// Entities, persistence and the operations behind the REST API:
/// - Type definitions (Workflow, Step, Comment, StepStatus)
/// - SQLite persistence with sqlx behind the `WorkflowStore` trait
/// - Payload validation and response views
/// - Step reconciliation for full workflow updates

// Core entity and candidate record definitions
pub mod types;

// Connection pool and schema setup
pub mod database;

// Persistence gateway trait and SQLite implementation
pub mod storage;

// Raw payload -> typed candidate records
pub mod validate;

// Entity -> response shapes
pub mod view;

// Creation, loading, listing and deletion
pub mod service;

// Identifier-gated step reconciliation and full updates
pub mod reconcile;

// Comments attached to workflows
pub mod comments;

// Re-export commonly used types
pub use reconcile::{reconcile, update_workflow, ReconcileOutcome};
pub use storage::{SqliteStore, WorkflowStore};
pub use types::{Comment, Step, StepStatus, Workflow, WorkflowAggregate};
