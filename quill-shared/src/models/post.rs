/// Post model and database operations
///
/// Posts are owned by exactly one author. Every mutating query is keyed on
/// `id AND author_id AND NOT is_deleted`, so the ownership check and the write
/// happen in one statement.
///
/// # Lifecycle
///
/// ```text
/// draft → published
///   │         │
///   └─────────┴──→ soft-deleted (is_deleted = true, deleted_at = now)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE post_status AS ENUM ('draft', 'published');
///
/// CREATE TABLE posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     slug VARCHAR(300) NOT NULL,
///     content TEXT NOT NULL,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status post_status NOT NULL DEFAULT 'draft',
///     is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
///     deleted_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT posts_slug_key UNIQUE (slug)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, title, slug, content, tags, author_id, status, \
                            is_deleted, deleted_at, created_at, updated_at";

/// Publication status of a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Visible only to its author's mutations
    #[default]
    Draft,

    /// Listed and resolvable by slug
    Published,
}

/// Post model representing a blog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post ID
    pub id: Uuid,

    /// Title as entered by the author
    pub title: String,

    /// URL-safe identifier derived from the title at creation
    pub slug: String,

    /// Body text
    pub content: String,

    /// Ordered tags (possibly empty)
    pub tags: Vec<String>,

    /// Owning user; never changes after creation
    #[serde(rename = "author")]
    pub author_id: Uuid,

    /// Publication status
    pub status: PostStatus,

    /// Soft-delete marker
    pub is_deleted: bool,

    /// When the post was soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last written
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether the post is visible to anonymous readers
    pub fn is_public(&self) -> bool {
        self.status == PostStatus::Published && !self.is_deleted
    }

    /// Whether `user_id` owns this post
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Input for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author_id: Uuid,
}

/// Input for updating an existing post
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdatePost {
    /// Returns true when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

impl Post {
    /// Inserts a new draft post
    ///
    /// # Errors
    ///
    /// Returns a unique violation on `posts_slug_key` if the slug is taken.
    pub async fn create(pool: &PgPool, data: CreatePost) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (title, slug, content, tags, author_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {}",
            POST_COLUMNS
        );

        sqlx::query_as::<_, Post>(&query)
            .bind(data.title)
            .bind(data.slug)
            .bind(data.content)
            .bind(data.tags)
            .bind(data.author_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a post by ID, including soft-deleted ones
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);

        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a published, non-deleted post by slug
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM posts \
             WHERE slug = $1 AND status = 'published' AND is_deleted = FALSE",
            POST_COLUMNS
        );

        sqlx::query_as::<_, Post>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Lists published, non-deleted posts, oldest first
    pub async fn list_published(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM posts \
             WHERE status = 'published' AND is_deleted = FALSE \
             ORDER BY created_at ASC, id ASC \
             LIMIT $1 OFFSET $2",
            POST_COLUMNS
        );

        sqlx::query_as::<_, Post>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Counts published, non-deleted posts
    pub async fn count_published(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts WHERE status = 'published' AND is_deleted = FALSE",
        )
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Applies `data` to a live post owned by `author_id`
    ///
    /// Returns None if no row matched (missing, deleted, or not owned).
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        author_id: Uuid,
        data: UpdatePost,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET \
                 title = COALESCE($3, title), \
                 content = COALESCE($4, content), \
                 tags = COALESCE($5, tags), \
                 updated_at = NOW() \
             WHERE id = $1 AND author_id = $2 AND is_deleted = FALSE \
             RETURNING {}",
            POST_COLUMNS
        );

        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(author_id)
            .bind(data.title)
            .bind(data.content)
            .bind(data.tags)
            .fetch_optional(pool)
            .await
    }

    /// Sets the status of a live post owned by `author_id`
    pub async fn set_status_owned(
        pool: &PgPool,
        id: Uuid,
        author_id: Uuid,
        status: PostStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND author_id = $2 AND is_deleted = FALSE \
             RETURNING {}",
            POST_COLUMNS
        );

        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(author_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deletes a live post owned by `author_id`
    pub async fn soft_delete_owned(
        pool: &PgPool,
        id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND author_id = $2 AND is_deleted = FALSE \
             RETURNING {}",
            POST_COLUMNS
        );

        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(author_id)
            .fetch_optional(pool)
            .await
    }
}
