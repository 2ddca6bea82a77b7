/// In-memory store adapter
///
/// Intended for tests and local runs without a database. Enforces the same
/// unique constraints and ownership-keyed writes as the PostgreSQL schema.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{PostStore, StoreError, StoreResult, UserStore, POSTS_SLUG_KEY, USERS_EMAIL_KEY};
use crate::models::post::{CreatePost, Post, PostStatus, UpdatePost};
use crate::models::user::{CreateUser, User};

/// Process-local store; insertion order doubles as creation order
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    posts: RwLock<Vec<Post>>,
}

fn poisoned() -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `mutate` to a live post owned by `author_id`
    fn mutate_owned<F>(&self, id: Uuid, author_id: Uuid, mutate: F) -> StoreResult<Option<Post>>
    where
        F: FnOnce(&mut Post),
    {
        let mut posts = self.posts.write().map_err(|_| poisoned())?;

        let Some(post) = posts
            .iter_mut()
            .find(|p| p.id == id && p.author_id == author_id && !p.is_deleted)
        else {
            return Ok(None);
        };

        mutate(post);
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut users = self.users.write().map_err(|_| poisoned())?;

        if users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict {
                constraint: USERS_EMAIL_KEY.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, data: CreatePost) -> StoreResult<Post> {
        let mut posts = self.posts.write().map_err(|_| poisoned())?;

        if posts.iter().any(|p| p.slug == data.slug) {
            return Err(StoreError::Conflict {
                constraint: POSTS_SLUG_KEY.to_string(),
            });
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: data.title,
            slug: data.slug,
            content: data.content,
            tags: data.tags,
            author_id: data.author_id,
            status: PostStatus::Draft,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        posts.push(post.clone());

        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let posts = self.posts.read().map_err(|_| poisoned())?;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
        let posts = self.posts.read().map_err(|_| poisoned())?;
        Ok(posts
            .iter()
            .find(|p| p.slug == slug && p.is_public())
            .cloned())
    }

    async fn list_published(&self, limit: i64, offset: i64) -> StoreResult<Vec<Post>> {
        let posts = self.posts.read().map_err(|_| poisoned())?;

        // Vec order is insertion order; the stable sort keeps it for equal timestamps.
        let mut public: Vec<&Post> = posts.iter().filter(|p| p.is_public()).collect();
        public.sort_by_key(|p| p.created_at);

        Ok(public
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count_published(&self) -> StoreResult<i64> {
        let posts = self.posts.read().map_err(|_| poisoned())?;
        Ok(posts.iter().filter(|p| p.is_public()).count() as i64)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        data: UpdatePost,
    ) -> StoreResult<Option<Post>> {
        self.mutate_owned(id, author_id, |post| {
            if let Some(title) = data.title {
                post.title = title;
            }
            if let Some(content) = data.content {
                post.content = content;
            }
            if let Some(tags) = data.tags {
                post.tags = tags;
            }
        })
    }

    async fn set_status_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        status: PostStatus,
    ) -> StoreResult<Option<Post>> {
        self.mutate_owned(id, author_id, |post| post.status = status)
    }

    async fn soft_delete_owned(&self, id: Uuid, author_id: Uuid) -> StoreResult<Option<Post>> {
        self.mutate_owned(id, author_id, |post| {
            post.is_deleted = true;
            post.deleted_at = Some(Utc::now());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(slug: &str, author_id: Uuid) -> CreatePost {
        CreatePost {
            title: slug.to_string(),
            slug: slug.to_string(),
            content: "content".to_string(),
            tags: vec![],
            author_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let user = CreateUser {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
        };

        store.insert_user(user.clone()).await.unwrap();
        let err = store.insert_user(user).await.unwrap_err();
        assert!(err.is_conflict_on(USERS_EMAIL_KEY));
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();

        store.insert_post(new_post("hello", author)).await.unwrap();
        let err = store.insert_post(new_post("hello", author)).await.unwrap_err();
        assert!(err.is_conflict_on(POSTS_SLUG_KEY));
    }

    #[tokio::test]
    async fn test_owned_write_requires_matching_author() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();
        let post = store.insert_post(new_post("mine", author)).await.unwrap();

        let other = store
            .set_status_owned(post.id, Uuid::new_v4(), PostStatus::Published)
            .await
            .unwrap();
        assert!(other.is_none());

        let stored = store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PostStatus::Draft);

        let mine = store
            .set_status_owned(post.id, author, PostStatus::Published)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mine.status, PostStatus::Published);
    }

    #[tokio::test]
    async fn test_soft_deleted_posts_are_hidden() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();
        let post = store.insert_post(new_post("gone", author)).await.unwrap();
        store
            .set_status_owned(post.id, author, PostStatus::Published)
            .await
            .unwrap();
        assert_eq!(store.count_published().await.unwrap(), 1);

        let deleted = store.soft_delete_owned(post.id, author).await.unwrap().unwrap();
        assert!(deleted.is_deleted);
        assert!(deleted.deleted_at.is_some());

        assert_eq!(store.count_published().await.unwrap(), 0);
        assert!(store.find_published_by_slug("gone").await.unwrap().is_none());
        assert!(store.soft_delete_owned(post.id, author).await.unwrap().is_none());
        // Physically still there
        assert!(store.find_post(post.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_published_pagination() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();
        for slug in ["a", "b", "c"] {
            let post = store.insert_post(new_post(slug, author)).await.unwrap();
            store
                .set_status_owned(post.id, author, PostStatus::Published)
                .await
                .unwrap();
        }

        let page: Vec<String> = store
            .list_published(2, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(page, vec!["b", "c"]);
        assert!(store.list_published(2, 4).await.unwrap().is_empty());
    }
}
