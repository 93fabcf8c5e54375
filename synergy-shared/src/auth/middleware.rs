/// Per-request authentication chain
///
/// Every protected handler goes through the same stateless chain, re-derived
/// from the bearer token on each call:
///
/// 1. Extract the bearer token from the `Authorization` header
/// 2. Decode and verify the token; take the subject (email)
/// 3. Look up the user by email
/// 4. Check the `is_active` flag
///
/// On success a [`CurrentUser`] is inserted into the request extensions for
/// handlers to extract. No session state survives the request.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use synergy_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use sqlx::PgPool;

use super::jwt::{decode_token, JwtError};
use crate::models::user::User;

/// The authenticated, active user attached to a request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Error type for the authentication chain
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header absent or not a Bearer credential
    #[error("Missing or malformed authorization header")]
    MissingCredentials,

    /// Token failed signature/expiry/issuer validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token verified but its subject matches no user
    #[error("Could not validate credentials")]
    UnknownSubject,

    /// User exists but has been deactivated
    #[error("Inactive user")]
    InactiveUser,

    /// Database error during user lookup
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::UnknownSubject => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials").into_response()
            }
            AuthError::InactiveUser => (StatusCode::BAD_REQUEST, "Inactive user").into_response(),
            AuthError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Extracts the bearer token from request headers.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredentials)
}

/// Runs the full authentication chain and returns the active user.
///
/// This is the single entry point used by the API's middleware layer; it
/// never caches anything between requests.
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<User, AuthError> {
    let token = extract_bearer(headers)?;

    let claims = decode_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken("Could not validate credentials".to_string()),
    })?;

    // A token can outlive its identity (deleted or renamed account).
    let user = User::find_by_email(pool, &claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject)?;

    if !user.is_active {
        return Err(AuthError::InactiveUser);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert!(matches!(
            extract_bearer(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::UnknownSubject.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InactiveUser.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
