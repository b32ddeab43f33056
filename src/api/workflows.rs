/// Workflow management REST API endpoints
///
/// CRUD over workflows plus step listing and deletion. Bodies are read raw and
/// handed to the validator so that malformed JSON is answered with 400.

use crate::{
    api::error::ApiResult,
    workflow::{
        reconcile,
        service,
        storage::WorkflowStore,
        types::{StepId, WorkflowId},
        validate::{validate_new_workflow, validate_workflow_update},
        view::{StepView, WorkflowSummary, WorkflowView},
    },
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway shared by every request
    pub store: Arc<dyn WorkflowStore>,
}

/// Create workflow management routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", get(list_workflows).post(create_workflow))
        .route(
            "/api/workflows/{id}",
            get(get_workflow).put(update_workflow).delete(delete_workflow),
        )
        .route("/api/workflows/{id}/steps", get(list_steps))
        .route("/api/workflows/{id}/steps/{step_id}", delete(delete_step))
}

/// Create a new workflow
///
/// POST /api/workflows
/// Body: { "name": "...", "description": "...", "steps": [{ "name": "...", "description": "..." }] }
async fn create_workflow(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<WorkflowView>)> {
    let new_workflow = validate_new_workflow(&body).map_err(|e| {
        tracing::warn!("❌ Invalid workflow payload: {}", e);
        e
    })?;

    let aggregate = service::create_workflow(state.store.as_ref(), new_workflow).await?;

    Ok((StatusCode::CREATED, Json(WorkflowView::from(&aggregate))))
}

/// List all workflows
///
/// GET /api/workflows
/// Returns: [{ "id": 1, "uuid": "...", "name": "...", "description": "...", "created_at": "..." }]
async fn list_workflows(State(state): State<AppState>) -> ApiResult<Json<Vec<WorkflowSummary>>> {
    let workflows = service::list_workflows(state.store.as_ref()).await?;
    Ok(Json(workflows.iter().map(WorkflowSummary::from).collect()))
}

/// Get a workflow with its steps and comments
///
/// GET /api/workflows/{id}
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
) -> ApiResult<Json<WorkflowView>> {
    let aggregate = service::load_aggregate(state.store.as_ref(), id).await?;
    Ok(Json(WorkflowView::from(&aggregate)))
}

/// Update a workflow and reconcile its steps
///
/// PUT /api/workflows/{id}
/// Body: { "name": "...", "description": "...", "steps": [{ "id": 1, "name": "..." }, { "name": "...", "description": "..." }] }
///
/// A step list that does not account for every current step leaves the steps
/// untouched; the response then shows the unchanged steps.
async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
    body: Bytes,
) -> ApiResult<Json<WorkflowView>> {
    let update = validate_workflow_update(&body).map_err(|e| {
        tracing::warn!("❌ Invalid update payload for workflow {}: {}", id, e);
        e
    })?;

    let aggregate = reconcile::update_workflow(state.store.as_ref(), id, update).await?;

    tracing::info!("✏️ Updated workflow: {} ({})", id, aggregate.workflow.name);

    Ok(Json(WorkflowView::from(&aggregate)))
}

/// Delete a workflow, its steps and comments
///
/// DELETE /api/workflows/{id}
async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
) -> ApiResult<StatusCode> {
    service::delete_workflow(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/workflows/{id}/steps
async fn list_steps(
    State(state): State<AppState>,
    Path(id): Path<WorkflowId>,
) -> ApiResult<Json<Vec<StepView>>> {
    let steps = service::list_steps(state.store.as_ref(), id).await?;
    Ok(Json(steps.iter().map(StepView::from).collect()))
}

/// DELETE /api/workflows/{id}/steps/{step_id}
async fn delete_step(
    State(state): State<AppState>,
    Path((id, step_id)): Path<(WorkflowId, StepId)>,
) -> ApiResult<StatusCode> {
    service::delete_step(state.store.as_ref(), id, step_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    async fn create_w1(app: &axum::Router) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/api/workflows",
            Some(json!({
                "name": "W1",
                "description": "first workflow",
                "steps": [
                    { "name": "step1", "description": "first step" },
                    { "name": "step2", "description": "second step" }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn create_returns_created_view() {
        let app = test_app().await;
        let body = create_w1(&app).await;

        assert_eq!(body["name"], "W1");
        assert_eq!(body["steps"].as_array().unwrap().len(), 2);
        assert_eq!(body["steps"][0]["status"], "In definition");
        assert_eq!(body["comments"], json!([]));
    }

    #[tokio::test]
    async fn invalid_payloads_are_bad_requests() {
        let app = test_app().await;

        let (status, body) = send(&app, "POST", "/api/workflows", Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");

        let long = "x".repeat(351);
        let (status, _) = send(
            &app,
            "POST",
            "/api/workflows",
            Some(json!({ "name": "ok", "description": long })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rename_one_step_with_full_id_set() {
        let app = test_app().await;
        let created = create_w1(&app).await;
        let id = created["id"].as_i64().unwrap();
        let s1 = created["steps"][0]["id"].as_i64().unwrap();
        let s2 = created["steps"][1]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/workflows/{}", id),
            Some(json!({ "steps": [{ "id": s1, "name": "step1-renamed" }, { "id": s2, "name": "step2" }] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["steps"].as_array().unwrap().len(), 2);
        assert_eq!(body["steps"][0]["name"], "step1-renamed");
        assert_eq!(body["steps"][0]["description"], "first step");
        assert_eq!(body["steps"][1]["name"], "step2");
    }

    #[tokio::test]
    async fn partial_id_set_leaves_steps_but_updates_scalars() {
        let app = test_app().await;
        let created = create_w1(&app).await;
        let id = created["id"].as_i64().unwrap();
        let s1 = created["steps"][0]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/workflows/{}", id),
            Some(json!({ "name": "W1 v2", "steps": [{ "id": s1, "name": "x" }] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "W1 v2");
        assert_eq!(body["description"], "first workflow");
        assert_eq!(body["steps"], created["steps"]);
    }

    #[tokio::test]
    async fn zero_step_id_skips_steps_but_still_renames_workflow() {
        let app = test_app().await;
        let created = create_w1(&app).await;
        let id = created["id"].as_i64().unwrap();
        let s1 = created["steps"][0]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/workflows/{}", id),
            Some(json!({
                "name": "W1 renamed",
                "steps": [{ "id": s1, "name": "x" }, { "id": 0, "name": "y" }]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "W1 renamed");
        assert_eq!(body["steps"], created["steps"]);

        let (_, fetched) = send(&app, "GET", &format!("/api/workflows/{}", id), None).await;
        assert_eq!(fetched["name"], "W1 renamed");
        assert_eq!(fetched["steps"], created["steps"]);
    }

    #[tokio::test]
    async fn update_of_unknown_workflow_is_not_found() {
        let app = test_app().await;
        let (status, _) = send(&app, "PUT", "/api/workflows/404", Some(json!({ "name": "n" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_cascades_and_then_404s() {
        let app = test_app().await;
        let created = create_w1(&app).await;
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(&app, "DELETE", &format!("/api/workflows/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", &format!("/api/workflows/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", &format!("/api/workflows/{}/steps", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn steps_can_be_listed_and_deleted_individually() {
        let app = test_app().await;
        let created = create_w1(&app).await;
        let id = created["id"].as_i64().unwrap();
        let s2 = created["steps"][1]["id"].as_i64().unwrap();

        let (status, _) = send(&app, "DELETE", &format!("/api/workflows/{}/steps/{}", id, s2), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &format!("/api/workflows/{}/steps", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "step1");
    }

    #[tokio::test]
    async fn list_returns_summaries() {
        let app = test_app().await;
        create_w1(&app).await;

        let (status, body) = send(&app, "GET", "/api/workflows", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "W1");
        assert!(body[0].get("steps").is_none());
        assert!(body[0]["uuid"].is_string());
    }
}
