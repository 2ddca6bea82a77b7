/// Registration and login
///
/// Passwords are hashed with Argon2id on tokio's blocking pool; a successful
/// login issues a one-hour HS256 bearer token for the user.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use quill_shared::services::auth::{AuthService, Credentials, Registration};
/// use quill_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AuthService::new(Arc::new(MemoryStore::new()), "a-secret-of-at-least-32-characters");
///
/// let user = auth
///     .register(Registration::new("Alice", "a@x.io", "pw1"))
///     .await?;
/// let issued = auth.login(Credentials::new("a@x.io", "pw1")).await?;
/// assert_eq!(issued.user_id, user.id);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{required, ServiceError, ServiceResult};
use crate::auth::jwt::{create_token, Claims};
use crate::auth::password::{hash_password, verify_password};
use crate::models::user::{CreateUser, User};
use crate::store::UserStore;

/// Registration input; every field is required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Registration {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }
}

/// Login input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }
}

/// A bearer token issued on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Canonical form of an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration and login over a [`UserStore`]
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: Arc<str>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Secret used to sign and verify bearer tokens
    pub fn jwt_secret(&self) -> Arc<str> {
        Arc::clone(&self.jwt_secret)
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `Validation` if name, email or password is missing or blank
    /// - `Conflict` if the email is already registered
    pub async fn register(&self, input: Registration) -> ServiceResult<User> {
        let name = required("name", input.name.as_deref())?.to_string();
        let email = normalize_email(required("email", input.email.as_deref())?);
        // Whitespace-only passwords are rejected, but the password itself is hashed verbatim.
        required("password", input.password.as_deref())?;
        let password = input.password.unwrap_or_default();

        if self.users.find_user_by_email(&email).await?.is_some() {
            debug!(email = %email, "Registration rejected: email already in use");
            return Err(email_taken());
        }

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let user = self
            .users
            .insert_user(CreateUser {
                name,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match ServiceError::from(e) {
                // Lost a race with a concurrent registration of the same email
                ServiceError::Conflict(_) => email_taken(),
                other => other,
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues a bearer token
    ///
    /// # Errors
    ///
    /// - `Validation` if email or password is missing
    /// - `NotFound` if no user has this email
    /// - `Auth` if the password does not match
    pub async fn login(&self, input: Credentials) -> ServiceResult<IssuedToken> {
        let email = normalize_email(required("email", input.email.as_deref())?);
        required("password", input.password.as_deref())?;
        let password = input.password.unwrap_or_default();

        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No user found with this email".to_string()))?;

        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;

        if !matches {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ServiceError::Auth("Invalid credentials".to_string()));
        }

        let claims = Claims::new(user.id);
        let token = create_token(&claims, &self.jwt_secret)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| ServiceError::Internal("Token expiry out of range".to_string()))?;

        info!(user_id = %user.id, "User logged in");
        Ok(IssuedToken {
            token,
            user_id: user.id,
            expires_at,
        })
    }
}

fn email_taken() -> ServiceError {
    ServiceError::Conflict("User already exists with this email".to_string())
}
