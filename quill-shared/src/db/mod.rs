/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations for `users` and `posts`
///
/// Row-level queries live next to their types in [`crate::models`] and are
/// exposed to services through [`crate::store::PgStore`].
///
/// # Example
///
/// ```no_run
/// use quill_shared::db::pool::{create_pool, DatabaseConfig};
/// use quill_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
