/// PostgreSQL store adapter
///
/// Thin delegation from the storage ports to the model queries in
/// [`crate::models`]. sqlx unique violations surface as
/// [`StoreError::Conflict`](super::StoreError::Conflict).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{PostStore, StoreResult, UserStore};
use crate::models::post::{CreatePost, Post, PostStatus, UpdatePost};
use crate::models::user::{CreateUser, User};

/// sqlx-backed store sharing one connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool (health checks, migrations)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn insert_post(&self, data: CreatePost) -> StoreResult<Post> {
        Ok(Post::create(&self.pool, data).await?)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(Post::find_by_id(&self.pool, id).await?)
    }

    async fn find_published_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
        Ok(Post::find_published_by_slug(&self.pool, slug).await?)
    }

    async fn list_published(&self, limit: i64, offset: i64) -> StoreResult<Vec<Post>> {
        Ok(Post::list_published(&self.pool, limit, offset).await?)
    }

    async fn count_published(&self) -> StoreResult<i64> {
        Ok(Post::count_published(&self.pool).await?)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        data: UpdatePost,
    ) -> StoreResult<Option<Post>> {
        Ok(Post::update_owned(&self.pool, id, author_id, data).await?)
    }

    async fn set_status_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        status: PostStatus,
    ) -> StoreResult<Option<Post>> {
        Ok(Post::set_status_owned(&self.pool, id, author_id, status).await?)
    }

    async fn soft_delete_owned(&self, id: Uuid, author_id: Uuid) -> StoreResult<Option<Post>> {
        Ok(Post::soft_delete_owned(&self.pool, id, author_id).await?)
    }
}
