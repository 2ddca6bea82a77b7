/// Post lifecycle
///
/// Posts are created as drafts, become publicly listable once published, and
/// are soft-deleted rather than removed. Every mutation is check-then-act:
/// the post is loaded, ownership is verified, and only then is a single
/// conditional write issued, keyed on the post ID, the author and
/// `NOT is_deleted`. A non-owner never reaches the write.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{required, ServiceError, ServiceResult};
use crate::models::post::{CreatePost, Post, PostStatus, UpdatePost};
use crate::slug::{slugify, with_random_suffix};
use crate::store::{PostStore, POSTS_SLUG_KEY};

/// Insert attempts before giving up on a unique slug
pub const MAX_SLUG_ATTEMPTS: usize = 5;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Input for a new post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Normalized pagination parameters
///
/// # Example
///
/// ```
/// use quill_shared::services::posts::PageRequest;
///
/// let page = PageRequest::from_query(Some("2"), Some("abc"));
/// assert_eq!((page.page, page.limit), (2, 10));
/// assert_eq!(page.offset(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Non-positive values fall back to the defaults; `limit` is capped at [`MAX_LIMIT`]
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page > 0 { page } else { DEFAULT_PAGE },
            limit: if limit > 0 { limit.min(MAX_LIMIT) } else { DEFAULT_LIMIT },
        }
    }

    /// Builds a request from raw query-string values
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0);
        Self::new(parse(page), parse(limit))
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
    pub data: Vec<T>,
}

/// Parses a post ID from a path segment
pub fn parse_post_id(raw: &str) -> ServiceResult<Uuid> {
    let raw = required("Post ID", Some(raw))?;
    Uuid::parse_str(raw).map_err(|_| ServiceError::Validation(format!("Invalid post ID: {}", raw)))
}

/// Post operations over a [`PostStore`]
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// Creates a draft post authored by `author_id`
    ///
    /// The slug is derived from the title. If it is taken, a random hex
    /// suffix is appended and the insert retried, up to
    /// [`MAX_SLUG_ATTEMPTS`] times in total.
    ///
    /// # Errors
    ///
    /// - `Validation` if title, content or tags are missing, or the title has
    ///   no letters or digits
    /// - `Conflict` if no free slug was found
    pub async fn create(&self, author_id: Uuid, input: NewPost) -> ServiceResult<Post> {
        let title = required("title", input.title.as_deref())?.to_string();
        let content = required("content", input.content.as_deref())?.to_string();
        let tags = clean_tags(
            input
                .tags
                .ok_or_else(|| ServiceError::Validation("tags is required".to_string()))?,
        );

        let base = slugify(&title);
        if base.is_empty() {
            return Err(ServiceError::Validation(
                "title must contain at least one letter or digit".to_string(),
            ));
        }

        let mut slug = base.clone();
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let data = CreatePost {
                title: title.clone(),
                slug: slug.clone(),
                content: content.clone(),
                tags: tags.clone(),
                author_id,
            };

            match self.posts.insert_post(data).await {
                Ok(post) => {
                    info!(post_id = %post.id, slug = %post.slug, author_id = %author_id, "Post created");
                    return Ok(post);
                }
                Err(e) if e.is_conflict_on(POSTS_SLUG_KEY) => {
                    debug!(slug = %slug, attempt, "Slug taken, retrying with suffix");
                    slug = with_random_suffix(&base);
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(slug = %base, "Gave up allocating a unique slug");
        Err(ServiceError::Conflict(format!(
            "Could not allocate a unique slug for '{}'",
            base
        )))
    }

    /// Lists published, non-deleted posts, oldest first
    ///
    /// Pages past the end come back with empty `data`.
    pub async fn list(&self, request: PageRequest) -> ServiceResult<Page<Post>> {
        let total_items = self.posts.count_published().await?;
        let data = self
            .posts
            .list_published(request.limit, request.offset())
            .await?;

        Ok(Page {
            total_items,
            total_pages: (total_items + request.limit - 1) / request.limit,
            current_page: request.page,
            limit: request.limit,
            data,
        })
    }

    /// Fetches a published, non-deleted post by slug
    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<Post> {
        let slug = required("slug", Some(slug))?;

        self.posts
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Post not found with this slug".to_string()))
    }

    /// Applies a partial update to a post owned by `author_id`
    ///
    /// Absent fields are left unchanged; a provided title or content must not
    /// be blank. The slug never changes.
    pub async fn update(&self, id: Uuid, author_id: Uuid, changes: UpdatePost) -> ServiceResult<Post> {
        let changes = clean_changes(changes)?;
        let current = self.owned_live_post(id, author_id).await?;

        if changes.is_empty() {
            return Ok(current);
        }

        let post = self
            .posts
            .update_owned(id, author_id, changes)
            .await?
            .ok_or_else(post_not_found)?;

        info!(post_id = %id, "Post updated");
        Ok(post)
    }

    /// Moves a draft owned by `author_id` to published
    pub async fn publish(&self, id: Uuid, author_id: Uuid) -> ServiceResult<Post> {
        let current = self.owned_live_post(id, author_id).await?;

        if current.status == PostStatus::Published {
            return Ok(current);
        }

        let post = self
            .posts
            .set_status_owned(id, author_id, PostStatus::Published)
            .await?
            .ok_or_else(post_not_found)?;

        info!(post_id = %id, "Post published");
        Ok(post)
    }

    /// Soft-deletes a post owned by `author_id`
    pub async fn soft_delete(&self, id: Uuid, author_id: Uuid) -> ServiceResult<Post> {
        self.owned_live_post(id, author_id).await?;

        let post = self
            .posts
            .soft_delete_owned(id, author_id)
            .await?
            .ok_or_else(post_not_found)?;

        info!(post_id = %id, "Post soft-deleted");
        Ok(post)
    }

    /// Loads a live post and checks that `author_id` owns it
    async fn owned_live_post(&self, id: Uuid, author_id: Uuid) -> ServiceResult<Post> {
        let post = self
            .posts
            .find_post(id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(post_not_found)?;

        if !post.is_owned_by(author_id) {
            warn!(post_id = %id, caller = %author_id, "Rejected mutation by non-author");
            return Err(ServiceError::Auth(
                "You are not the author of this post".to_string(),
            ));
        }

        Ok(post)
    }
}

fn post_not_found() -> ServiceError {
    ServiceError::NotFound("Post not found with this ID".to_string())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn clean_changes(changes: UpdatePost) -> ServiceResult<UpdatePost> {
    let title = match changes.title {
        Some(t) => Some(required("title", Some(t.as_str()))?.to_string()),
        None => None,
    };
    let content = match changes.content {
        Some(c) => Some(required("content", Some(c.as_str()))?.to_string()),
        None => None,
    };

    Ok(UpdatePost {
        title,
        content,
        tags: changes.tags.map(clean_tags),
    })
}
