/// Project endpoints
///
/// # Endpoints
///
/// - `POST /api/projects` - Create a project (caller becomes owner + member)
/// - `GET /api/projects` - List the caller's projects
/// - `GET /api/projects/:id` - Project detail with members and tasks
/// - `PUT /api/projects/:id` - Partial update (owner only)
/// - `POST /api/projects/:id/members?user_id=N` - Add a member (owner only)
///
/// Every handler here runs behind the authentication layer; authorization
/// (membership or ownership) is checked per handler.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::double_option,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use synergy_shared::{
    auth::{
        authorization::{require_membership, require_ownership},
        middleware::CurrentUser,
    },
    models::{
        membership::Membership,
        project::{CreateProject, Project, UpdateProject},
        task::Task,
        user::User,
    },
};
use validator::Validate;

use super::users::UserRead;

/// Create-project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Partial-update request for a project
///
/// Absent fields are left alone; an explicit `"description": null` clears
/// the description.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name
    pub name: Option<String>,

    /// New description
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<UpdateProjectRequest> for UpdateProject {
    fn from(req: UpdateProjectRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

/// Project detail: the project row plus its member set and task list
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    /// Project ID
    pub id: i64,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Owner's user ID
    pub owner_id: i64,

    /// All current members, owner included
    pub members: Vec<UserRead>,

    /// All tasks under the project
    pub tasks: Vec<Task>,
}

/// Query parameters for adding a member
#[derive(Debug, Deserialize)]
pub struct AddMemberParams {
    /// ID of the user to add
    pub user_id: i64,
}

/// Creates a project owned by the caller.
///
/// The owner is auto-enrolled as the first member in the same transaction.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = Project::create_with_owner(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
        },
        user.id,
    )
    .await?;

    tracing::info!(project_id = project.id, owner_id = user.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Lists every project the caller belongs to, owned or invited.
pub async fn list_my_projects(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_by_member(&state.db, user.id).await?;

    Ok(Json(projects))
}

/// Returns a project with its members and tasks.
///
/// Member-only: non-members get 403, not 404, for an existing project.
pub async fn get_project_detail(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_membership(&state.db, project.id, user.id).await?;

    let members = Membership::list_members(&state.db, project.id).await?;
    let tasks = Task::list_by_project(&state.db, project.id).await?;

    Ok(Json(ProjectDetail {
        id: project.id,
        name: project.name,
        description: project.description,
        created_at: project.created_at,
        owner_id: project.owner_id,
        members: members.into_iter().map(UserRead::from).collect(),
        tasks,
    }))
}

/// Partially updates a project. Owner only.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(project_id): Path<i64>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_ownership(&project, user.id)?;

    let updated = Project::update(&state.db, project.id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(updated))
}

/// Adds a user to a project's member set. Owner only.
///
/// # Errors
///
/// - `404 Not Found`: Project or target user does not exist
/// - `403 Forbidden`: Caller is not the owner
/// - `409 Conflict`: Target is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(project_id): Path<i64>,
    Query(params): Query<AddMemberParams>,
) -> ApiResult<(StatusCode, Json<UserRead>)> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_ownership(&project, user.id)?;

    let target = User::find_by_id(&state.db, params.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if Membership::exists(&state.db, target.id, project.id).await? {
        return Err(ApiError::Conflict(
            "User is already a member of this project".to_string(),
        ));
    }

    Membership::create(&state.db, target.id, project.id).await?;

    tracing::info!(
        project_id = project.id,
        user_id = target.id,
        "Member added to project"
    );

    Ok((StatusCode::CREATED, Json(UserRead::from(target))))
}
