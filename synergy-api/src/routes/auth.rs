/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new account
/// - `POST /api/auth/login` - Log in and receive an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Form, Json};
use serde::{Deserialize, Serialize};
use synergy_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

use super::users::UserRead;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address, becomes the login identifier
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login form (OAuth2 password-grant shape: form-encoded, `username` field)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email address (the field is named `username` on the wire)
    pub username: String,

    /// Plaintext password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Signed JWT access token
    pub access_token: String,

    /// Always `"bearer"`
    pub token_type: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "full_name": "Jane Doe",
///   "password": "correct horse battery"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserRead>)> {
    req.validate().map_err(ApiError::from_validation)?;

    // Pre-check for a friendlier error; the unique constraint still backstops
    // concurrent registrations with the same email.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let hashed_password = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            full_name: req.full_name,
            hashed_password,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserRead::from(user))))
}

/// Log in with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=user@example.com&password=...
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Bad credentials. The same message is returned
///   whether the email is unknown or the password is wrong.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let invalid = || ApiError::Unauthorized("Incorrect email or password".to_string());

    let user = User::find_by_email(&state.db, &form.username)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&form.password, &user.hashed_password)? {
        return Err(invalid());
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    let claims = jwt::Claims::new(&user.email, state.token_ttl());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
