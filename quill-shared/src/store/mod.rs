/// Storage ports for users and posts
///
/// Services talk to storage only through these traits, so the same business
/// rules run against PostgreSQL in production and the in-memory store in
/// tests.
///
/// # Adapters
///
/// - [`postgres::PgStore`]: sqlx-backed PostgreSQL store
/// - [`memory::MemoryStore`]: process-local store for tests and local runs
///
/// # Ownership-keyed writes
///
/// Every mutating post operation takes both the post ID and the caller's ID
/// and only touches a row that matches both (and is not soft-deleted). A
/// `None` result means "nothing matched"; the caller decides whether that is
/// a not-found or a permission failure.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::post::{CreatePost, Post, PostStatus, UpdatePost};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Unique constraint on user emails
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Unique constraint on post slugs
pub const POSTS_SLUG_KEY: &str = "posts_slug_key";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// Any other backend failure
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Returns true if this is a conflict on the given constraint
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, StoreError::Conflict { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Database(err.to_string())
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; fails with `Conflict` on a duplicate email
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Looks up a user by normalized email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Post store
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Inserts a draft post; fails with `Conflict` on a duplicate slug
    async fn insert_post(&self, data: CreatePost) -> StoreResult<Post>;

    /// Finds a post by ID regardless of status or deletion
    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>>;

    /// Finds a published, non-deleted post by slug
    async fn find_published_by_slug(&self, slug: &str) -> StoreResult<Option<Post>>;

    /// Lists published, non-deleted posts ordered by creation time, oldest first
    async fn list_published(&self, limit: i64, offset: i64) -> StoreResult<Vec<Post>>;

    /// Counts published, non-deleted posts
    async fn count_published(&self) -> StoreResult<i64>;

    /// Updates a live post owned by `author_id`
    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        data: UpdatePost,
    ) -> StoreResult<Option<Post>>;

    /// Sets the status of a live post owned by `author_id`
    async fn set_status_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        status: PostStatus,
    ) -> StoreResult<Option<Post>>;

    /// Soft-deletes a live post owned by `author_id`
    async fn soft_delete_owned(&self, id: Uuid, author_id: Uuid) -> StoreResult<Option<Post>>;
}
