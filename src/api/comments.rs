/// Comment REST API endpoints
///
/// Comments are created against an existing workflow id and can be edited or
/// deleted on their own.

use crate::{
    api::{error::ApiResult, workflows::AppState},
    workflow::{
        comments,
        types::CommentId,
        validate::{validate_comment_update, validate_new_comment},
        view::CommentView,
    },
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

pub fn create_comment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/comments", get(list_comments).post(create_comment))
        .route(
            "/api/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}

/// POST /api/comments
/// Body: { "workflow_id": 1, "name": "...", "text": "..." }
async fn create_comment(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let new_comment = validate_new_comment(&body)?;
    let comment = comments::create_comment(state.store.as_ref(), new_comment).await?;
    Ok((StatusCode::CREATED, Json(CommentView::from(&comment))))
}

/// GET /api/comments
async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Vec<CommentView>>> {
    let all = comments::list_comments(state.store.as_ref()).await?;
    Ok(Json(all.iter().map(CommentView::from).collect()))
}

/// GET /api/comments/{id}
async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<CommentId>,
) -> ApiResult<Json<CommentView>> {
    let comment = comments::get_comment(state.store.as_ref(), id).await?;
    Ok(Json(CommentView::from(&comment)))
}

/// PUT /api/comments/{id}
/// Body: { "name": "...", "text": "..." } (both optional)
async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<CommentId>,
    body: Bytes,
) -> ApiResult<Json<CommentView>> {
    let patch = validate_comment_update(&body)?;
    let comment = comments::update_comment(state.store.as_ref(), id, patch).await?;
    Ok(Json(CommentView::from(&comment)))
}

/// DELETE /api/comments/{id}
async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<CommentId>,
) -> ApiResult<StatusCode> {
    comments::delete_comment(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    async fn workflow_id(app: &axum::Router) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/api/workflows",
            Some(json!({ "name": "W", "description": "commented workflow" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn comment_on_missing_workflow_is_404_and_not_stored() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/comments",
            Some(json!({ "workflow_id": 99, "name": "n", "text": "t" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (_, listed) = send(&app, "GET", "/api/comments", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn comment_lifecycle() {
        let app = test_app().await;
        let wf = workflow_id(&app).await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/comments",
            Some(json!({ "workflow_id": wf, "name": "review", "text": "looks fine" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/comments/{}", id),
            Some(json!({ "text": "approved", "workflow_id": wf + 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "review");
        assert_eq!(updated["text"], "approved");
        assert_eq!(updated["workflow_id"], wf);

        let (_, workflow) = send(&app, "GET", &format!("/api/workflows/{}", wf), None).await;
        assert_eq!(workflow["comments"][0]["text"], "approved");
        assert!(workflow["comments"][0].get("id").is_none());

        let (status, _) = send(&app, "DELETE", &format!("/api/comments/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/comments/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn comment_requires_workflow_id() {
        let app = test_app().await;
        let (status, body) = send(&app, "POST", "/api/comments", Some(json!({ "name": "n", "text": "t" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "workflow_id: this field is required");
    }
}
