/// JWT bearer token generation and validation
///
/// Tokens are signed with HS256 and identify the user by **email** (the
/// `sub` claim). They are fixed-TTL bearer tokens: there is no refresh
/// mechanism, and the TTL comes from configuration at issue time.
///
/// # Example
///
/// ```
/// use synergy_shared::auth::jwt::{create_token, decode_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("alice@example.com", 3600);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
///
/// let decoded = decode_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(decoded.sub, "alice@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped into every token
const ISSUER: &str = "synergysphere";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature invalid, malformed token, wrong issuer, or any other
    /// reason the token cannot be trusted
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT claims structure
///
/// - `sub`: the user's email (login identifier)
/// - `iss`: always "synergysphere"
/// - `iat`: issued-at (Unix timestamp)
/// - `exp`: expiration (Unix timestamp, issue time + configured TTL)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's email address
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `subject` expiring `ttl_seconds` from now.
    pub fn new(subject: impl Into<String>, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::seconds(ttl_seconds);

        Self {
            sub: subject.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact JWT string.
///
/// The secret should be at least 32 bytes; the configuration layer
/// enforces this at startup.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims.
///
/// Verifies the signature, expiration, and issuer. Any failure means the
/// bearer is not authenticated; callers map this to a 401 response.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
