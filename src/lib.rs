/// Stepway: workflow, step and comment backend
///
/// This library provides the REST service for workflows with ordered steps and
/// comments, and the reconciliation engine that keeps a workflow's steps in line
/// with a full update without losing steps the caller did not account for.

// Core configuration and setup
pub mod config;

// Error kinds shared by the core and the HTTP layer
pub mod error;

// Workflow management layer - entities, storage, validation, reconciliation
pub mod workflow;

// HTTP API layer - REST endpoints for workflows, steps and comments
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use error::{ValidationError, WorkflowError};
pub use server::start_server;
pub use workflow::{reconcile, ReconcileOutcome, SqliteStore, Step, StepStatus, Workflow, WorkflowStore};
