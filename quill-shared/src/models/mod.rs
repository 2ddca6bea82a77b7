/// Database models for Quill
///
/// This module contains the persisted records and their PostgreSQL queries.
///
/// # Models
///
/// - `user`: Registered authors and their credential hashes
/// - `post`: Blog posts, ownership, publication status, soft-delete markers
///
/// # Example
///
/// ```no_run
/// use quill_shared::models::user::{User, CreateUser};
/// use quill_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: "Alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod post;
pub mod user;
