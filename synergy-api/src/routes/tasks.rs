/// Task endpoints
///
/// # Endpoints
///
/// - `POST /api/projects/:id/tasks` - Create a task (any member)
/// - `GET /api/projects/:id/tasks` - List a project's tasks (any member)
/// - `PUT /api/projects/:id/tasks/:task_id` - Partial update (any member)
///
/// All three are member-gated on the parent project; the project owner
/// holds no special rights over tasks.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::double_option,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use synergy_shared::{
    auth::{
        authorization::{require_membership, validate_assignee},
        middleware::CurrentUser,
    },
    models::{
        project::Project,
        task::{CreateTask, Task, TaskStatus, UpdateTask},
    },
};
use validator::Validate;

/// Create-task request
///
/// No status field: every task starts at `To-Do` regardless of input.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee; must be a member of the project
    pub assignee_id: Option<i64>,
}

/// Partial-update request for a task
///
/// Absent fields keep their stored value; explicit `null` clears nullable
/// fields (description, due date, assignee).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New due date
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee (`null` unassigns)
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<i64>>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            status: req.status,
            assignee_id: req.assignee_id,
        }
    }
}

/// Resolves the project and checks the caller belongs to it.
async fn member_project(
    state: &AppState,
    project_id: i64,
    user_id: i64,
) -> ApiResult<Project> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_membership(&state.db, project.id, user_id).await?;

    Ok(project)
}

/// Creates a task under a project. Any member may create.
///
/// A supplied assignee must be a current member of the project (400
/// otherwise). The initial status is always `To-Do`.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(project_id): Path<i64>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = member_project(&state, project_id, user.id).await?;

    if let Some(assignee_id) = req.assignee_id {
        validate_assignee(&state.db, project.id, assignee_id).await?;
    }

    let task = Task::create_in_project(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            assignee_id: req.assignee_id,
        },
        project.id,
    )
    .await?;

    tracing::info!(task_id = task.id, project_id = project.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists all tasks under a project. Any member may list.
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = member_project(&state, project_id, user.id).await?;

    let tasks = Task::list_by_project(&state.db, project.id).await?;

    Ok(Json(tasks))
}

/// Partially updates a task. Any member of the parent project may update.
///
/// The task must belong to the project named in the path; a task id under
/// the wrong project reads as 404. Changing the assignee re-runs the
/// membership check against the new assignee.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((project_id, task_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let project = member_project(&state, project_id, user.id).await?;

    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .filter(|t| t.project_id == project.id)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if let Some(Some(assignee_id)) = req.assignee_id {
        validate_assignee(&state.db, project.id, assignee_id).await?;
    }

    let updated = Task::update(&state.db, task.id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}
