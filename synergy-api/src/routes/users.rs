/// User endpoints
///
/// # Endpoints
///
/// - `GET /api/users/me` - The authenticated user's own record
/// - `GET /api/users?email=substr` - Member-lookup search by email fragment

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use synergy_shared::{auth::middleware::CurrentUser, models::user::User};

/// Public view of a user
///
/// The shape returned everywhere a user appears in a response. Never carries
/// the password hash or the `is_active` flag.
#[derive(Debug, Clone, Serialize)]
pub struct UserRead {
    /// Unique user ID
    pub id: i64,

    /// Email address
    pub email: String,

    /// Display name
    pub full_name: String,
}

impl From<User> for UserRead {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

/// Query parameters for user search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Email fragment to match (substring, case-sensitive)
    #[serde(default)]
    pub email: String,
}

/// Returns the authenticated user's own record.
pub async fn read_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserRead> {
    Json(UserRead::from(user))
}

/// Searches users by email fragment for the add-member flow.
///
/// An empty or absent query returns an empty list rather than the whole
/// user table. Results are capped server-side.
pub async fn search_users(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<UserRead>>> {
    if params.email.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let users = User::search_by_email(&state.db, &params.email).await?;

    Ok(Json(users.into_iter().map(UserRead::from).collect()))
}
