/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token issuance and validation (HS256, 1 hour lifetime)
/// - [`middleware`]: Axum middleware that guards protected routes
///
/// # Example
///
/// ```
/// use quill_shared::auth::password::{hash_password, verify_password};
/// use quill_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(&Claims::new(user_id), "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.sub, user_id);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
