/// Authentication endpoints
///
/// - `POST /api/auth/register` - Register a new user
/// - `POST /api/auth/login` - Exchange credentials for a bearer token

use axum::{extract::State, http::StatusCode, Json};
use quill_shared::{
    models::user::User,
    services::auth::{Credentials, IssuedToken, Registration},
};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiJson, ApiResult},
};

/// Strips surrounding whitespace so the format check sees the stored form
fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()))
}

/// Register request
///
/// Presence and blankness are checked by the service; this only enforces
/// shape.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 256, message = "Password must be at most 256 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: User,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub password: Option<String>,
}

/// Login response: `{message, token, userId, expiresAt}`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,

    #[serde(flatten)]
    pub token: IssuedToken,
}

/// Register a new user
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "name": "Alice", "email": "a@x.io", "password": "pw1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing field, invalid email, or email already registered
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    let user = state
        .auth
        .register(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user,
        }),
    ))
}

/// Log in
///
/// # Errors
///
/// - `400 Bad Request`: missing field
/// - `401 Unauthorized`: wrong password
/// - `404 Not Found`: no user with this email
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let token = state
        .auth
        .login(Credentials {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
    }))
}
