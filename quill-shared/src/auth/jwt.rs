/// JWT token generation and validation module
///
/// Bearer tokens are signed with HS256 and carry the user ID as `sub`.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Lifetime**: 1 hour from issuance ([`ACCESS_TOKEN_TTL`])
/// - **Validation**: signature, issuer, `nbf` and `exp` with zero leeway
/// - **Secret Management**: at least 32 bytes, loaded once at startup
///
/// A token issued at `T` is accepted for any instant strictly before
/// `T + 1h` and rejected from `T + 1h` on.
///
/// # Example
///
/// ```
/// use quill_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let token = create_token(&Claims::new(user_id), "your-secret-key")?;
/// let claims = validate_token(&token, "your-secret-key")?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped on every token
pub const ISSUER: &str = "quill";

/// Lifetime of an access token
pub const ACCESS_TOKEN_TTL: Duration = Duration::hours(1);

/// Why a token could not be issued or accepted
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Bad signature, malformed token or missing claims
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotYetValid,

    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// Registered claims carried by a bearer token; `sub` is the user ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `user_id` issued now with the default lifetime
    pub fn new(user_id: Uuid) -> Self {
        Self::issued_at(user_id, Utc::now(), ACCESS_TOKEN_TTL)
    }

    /// Creates claims issued at an explicit instant with a custom lifetime
    ///
    /// # Example
    ///
    /// ```
    /// use quill_shared::auth::jwt::Claims;
    /// use chrono::{Duration, Utc};
    /// use uuid::Uuid;
    ///
    /// let issued = Utc::now();
    /// let claims = Claims::issued_at(Uuid::new_v4(), issued, Duration::minutes(5));
    /// assert!(claims.exp - claims.iat >= 300);
    /// ```
    ///
    /// Claims hold whole seconds: `iat` rounds down and `exp` rounds up, so a
    /// token is never rejected before its full lifetime has elapsed.
    pub fn issued_at(user_id: Uuid, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = issued_at.timestamp();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat,
            exp: ceil_seconds(issued_at + ttl),
            nbf: iat,
        }
    }

    /// Checks if the token is expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Expiration as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

fn ceil_seconds(instant: DateTime<Utc>) -> i64 {
    if instant.timestamp_subsec_nanos() > 0 {
        instant.timestamp() + 1
    } else {
        instant.timestamp()
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token against the current time
///
/// See [`validate_token_at`].
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_token_at(token, secret, Utc::now())
}

/// Validates a JWT token as of `now` and extracts claims
///
/// Verifies:
/// - Signature is valid (HS256 only)
/// - Issuer is "quill"
/// - `nbf <= now < exp`
///
/// The time window is checked here rather than by `jsonwebtoken`, which
/// reads the wall clock and applies a default leeway.
///
/// # Errors
///
/// Returns `Expired`, `NotYetValid`, `InvalidIssuer`, or `ValidationError`
/// for any other decoding/signature failure.
pub fn validate_token_at(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    let claims = token_data.claims;

    if claims.is_expired_at(now) {
        return Err(JwtError::Expired);
    }
    if now.timestamp() < claims.nbf {
        return Err(JwtError::NotYetValid);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
        assert!((3600..=3601).contains(&(claims.exp - claims.iat)));
        assert_eq!(claims.nbf, claims.iat);
        assert!(!claims.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();

        let token = create_token(&Claims::new(user_id), SECRET).expect("Should create token");
        let validated = validate_token(&token, SECRET).expect("Should validate token");

        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&Claims::new(Uuid::new_v4()), "secret1").unwrap();

        let result = validate_token(&token, "wrong-secret");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_garbage_token() {
        assert!(validate_token("not-a-jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let mut claims = Claims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::InvalidIssuer { .. })));
    }

    #[test]
    fn test_token_expires_exactly_one_hour_after_issue() {
        let user_id = Uuid::new_v4();
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let claims = Claims::issued_at(user_id, issued, ACCESS_TOKEN_TTL);
        let token = create_token(&claims, SECRET).unwrap();

        let just_before = issued + Duration::hours(1) - Duration::seconds(1);
        let validated = validate_token_at(&token, SECRET, just_before).unwrap();
        assert_eq!(validated.sub, user_id);

        let at_expiry = issued + Duration::hours(1);
        assert!(matches!(
            validate_token_at(&token, SECRET, at_expiry),
            Err(JwtError::Expired)
        ));

        let later = issued + Duration::hours(2);
        assert!(matches!(
            validate_token_at(&token, SECRET, later),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_mid_second_issue_keeps_full_lifetime() {
        let issued = DateTime::from_timestamp(1_700_000_000, 900_000_000).unwrap();
        let claims = Claims::issued_at(Uuid::new_v4(), issued, ACCESS_TOKEN_TTL);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_601);

        let token = create_token(&claims, SECRET).unwrap();

        let almost_an_hour = issued + Duration::minutes(59) + Duration::milliseconds(59_500);
        assert!(validate_token_at(&token, SECRET, almost_an_hour).is_ok());

        let past_expiry = DateTime::from_timestamp(claims.exp, 0).unwrap();
        assert!(matches!(
            validate_token_at(&token, SECRET, past_expiry),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_token_not_valid_before_issue() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let token = create_token(
            &Claims::issued_at(Uuid::new_v4(), issued, ACCESS_TOKEN_TTL),
            SECRET,
        )
        .unwrap();

        let before = issued - Duration::seconds(1);
        assert!(matches!(
            validate_token_at(&token, SECRET, before),
            Err(JwtError::NotYetValid)
        ));
    }

    #[test]
    fn test_validate_expired_token_against_wall_clock() {
        let claims = Claims::issued_at(
            Uuid::new_v4(),
            Utc::now() - Duration::hours(2),
            ACCESS_TOKEN_TTL,
        );
        assert!(claims.is_expired_at(Utc::now()));

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_expires_at() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at(Uuid::new_v4(), issued, ACCESS_TOKEN_TTL);
        assert_eq!(claims.expires_at(), Some(issued + Duration::hours(1)));
    }
}
