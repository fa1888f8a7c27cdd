use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::domain::{EditError, Post};
use crate::error::ApiError;
use crate::routes::AppState;

use super::{non_empty, parse_id};

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

/// POST /api/posts
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<PostRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = Vec::new();
    let text = non_empty(body.text, "Text is Required", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    // Author name/avatar are denormalized into the post at creation time
    let author = state
        .store
        .user_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User Not Found"))?;

    let post = Post::new(&author, text);
    state.store.insert_post(&post).await?;
    Ok(Json(json!({ "post": post })))
}

/// GET /api/posts - newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let posts = state.store.list_posts().await?;
    Ok(Json(json!({ "posts": posts })))
}

/// GET /api/posts/:post_id
pub async fn get(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(json!({ "post": post })))
}

/// DELETE /api/posts/:post_id - owner only
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user != identity.id {
        return Err(ApiError::forbidden("User is not authorized"));
    }

    state.store.delete_post(post_id).await?;
    Ok(Json(json!({ "post": post })))
}

/// PUT /api/posts/like/:post_id
pub async fn like(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let mut post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    post.like(identity.id)
        .map_err(|_| ApiError::conflict("The Post has already been liked"))?;

    state.store.save_post(&post).await?;
    Ok(Json(json!({ "post": post })))
}

/// PUT /api/posts/unlike/:post_id
pub async fn unlike(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let mut post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    post.unlike(identity.id)
        .map_err(|_| ApiError::not_found("The Post has not been liked"))?;

    state.store.save_post(&post).await?;
    Ok(Json(json!({ "post": post })))
}

/// POST /api/posts/comment/:post_id
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
    Json(body): Json<CommentRequest>,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_id(&post_id, "Post not found")?;

    let mut errors = Vec::new();
    let text = non_empty(body.text, "Text is Required", &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let author = state
        .store
        .user_by_id(identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User Not Found"))?;

    let mut post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    post.add_comment(&author, text);
    state.store.save_post(&post).await?;
    Ok(Json(json!({ "post": post })))
}

/// DELETE /api/posts/comment/:post_id/:comment_id - author only, keyed on the
/// comment id
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_id(&post_id, "Post not found")?;
    let comment_id = parse_id(&comment_id, "Comment not exists")?;

    let mut post = state
        .store
        .post_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    match post.remove_comment(comment_id, identity.id) {
        Ok(_) => {}
        Err(EditError::Forbidden) => return Err(ApiError::forbidden("User is not authorized")),
        Err(_) => return Err(ApiError::not_found("Comment not exists")),
    }

    state.store.save_post(&post).await?;
    Ok(Json(json!({ "post": post })))
}
