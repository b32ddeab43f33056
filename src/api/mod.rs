/// HTTP API Layer
///
/// This module provides the REST API endpoints for workflows, their steps and
/// comments. It handles:
/// - Workflow CRUD with step reconciliation on update
/// - Step listing and deletion
/// - Comment CRUD
/// - Status code translation for core errors

// Workflow and step endpoints
pub mod workflows;

// Comment endpoints
pub mod comments;

// Core error -> HTTP response mapping
pub mod error;

// Re-export router builders
pub use comments::create_comment_routes;
pub use error::{ApiError, ApiResult};
pub use workflows::{create_workflow_routes, AppState};
