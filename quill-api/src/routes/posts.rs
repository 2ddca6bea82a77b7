/// Post endpoints
///
/// - `GET /api/posts` - Published posts, oldest first, paginated
/// - `POST /api/posts` - Create a draft (bearer)
/// - `GET /api/posts/:slug` - Published post by slug
/// - `PUT /api/posts/:id` - Partial update (bearer, author only)
/// - `POST /api/posts/:id/publish` - Publish a draft (bearer, author only)
/// - `DELETE /api/posts/:id` - Soft delete (bearer, author only)
///
/// Mutations by anyone but the author are rejected with 401.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use quill_shared::{
    auth::middleware::AuthContext,
    models::post::{Post, UpdatePost},
    services::posts::{parse_post_id, NewPost, Page, PageRequest},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiJson, ApiResult},
};

/// Create request; `tags` may be empty but must be present
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    pub content: Option<String>,

    #[validate(length(max = 20, message = "At most 20 tags are allowed"))]
    pub tags: Option<Vec<String>>,
}

/// Update request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    pub content: Option<String>,

    #[validate(length(max = 20, message = "At most 20 tags are allowed"))]
    pub tags: Option<Vec<String>>,
}

/// Raw pagination query; unparseable values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub message: &'static str,
    pub post: Post,
}

impl PostResponse {
    fn new(message: &'static str, post: Post) -> Json<Self> {
        Json(Self { message, post })
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Post>>> {
    let request = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());
    Ok(Json(state.posts.list(request).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    req.validate()?;

    let post = state
        .posts
        .create(
            auth.user_id,
            NewPost {
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        PostResponse::new("Post created successfully", post),
    ))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let post = state.posts.get_by_slug(&slug).await?;
    Ok(PostResponse::new("Post found", post))
}

pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    req.validate()?;
    let id = parse_post_id(&id)?;

    let post = state
        .posts
        .update(
            id,
            auth.user_id,
            UpdatePost {
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
        )
        .await?;

    Ok(PostResponse::new("Post updated successfully", post))
}

pub async fn publish_post(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let id = parse_post_id(&id)?;
    let post = state.posts.publish(id, auth.user_id).await?;
    Ok(PostResponse::new("Post published successfully", post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let id = parse_post_id(&id)?;
    let post = state.posts.soft_delete(id, auth.user_id).await?;
    Ok(PostResponse::new("Post soft deleted successfully", post))
}
