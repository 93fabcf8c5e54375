/// Task model and database operations
///
/// Tasks are work items under a project. Any project member may create or
/// mutate them; the owner holds no special task rights.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('To-Do', 'In Progress', 'Done');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'To-Do',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     due_date TIMESTAMPTZ,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assignee_id BIGINT REFERENCES users(id) ON DELETE SET NULL
/// );
/// ```
///
/// New tasks always start at `To-Do`; any status a client supplies at
/// creation time is discarded. Status and assignee move independently
/// through partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Not started (the only state a task can be created in)
    #[serde(rename = "To-Do")]
    #[sqlx(rename = "To-Do")]
    ToDo,

    /// Being worked on
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,

    /// Finished
    #[serde(rename = "Done")]
    #[sqlx(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// Status string as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To-Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// Task model representing a work item under a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Short title
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Current workflow status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Owning project; immutable after creation
    pub project_id: i64,

    /// Optional assignee, always a current project member when set
    pub assignee_id: Option<i64>,
}

/// Input for creating a new task
///
/// There is deliberately no status field: creation always yields `To-Do`.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Short title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee (validated against project membership upstream)
    pub assignee_id: Option<i64>,
}

/// Partial update for a task
///
/// Only supplied fields overwrite. Nullable columns use a double `Option`
/// so that absent (keep) differs from `Some(None)` (clear).
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (`Some(None)` clears)
    pub description: Option<Option<String>>,

    /// New due date (`Some(None)` clears)
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee (`Some(None)` unassigns)
    pub assignee_id: Option<Option<i64>>,
}

impl UpdateTask {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
    }
}

impl Task {
    /// Creates a task under a project, forcing the initial status to
    /// `To-Do`.
    pub async fn create_in_project(
        pool: &PgPool,
        data: CreateTask,
        project_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, due_date, project_id, assignee_id, status)
            VALUES ($1, $2, $3, $4, $5, 'To-Do')
            RETURNING id, title, description, status, created_at, due_date,
                      project_id, assignee_id
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(project_id)
        .bind(data.assignee_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID.
    ///
    /// Callers that route through a project must also check `project_id`
    /// matches; a task outside the stated parent scope reads as not found.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_at, due_date,
                   project_id, assignee_id
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks under a project.
    pub async fn list_by_project(pool: &PgPool, project_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_at, due_date,
                   project_id, assignee_id
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update; unsupplied fields keep their stored value.
    ///
    /// Status and assignee change independently. Returns `None` if the id
    /// does not resolve. Last-writer-wins on concurrent updates.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                due_date = CASE WHEN $5 THEN $6 ELSE due_date END,
                status = COALESCE($7, status),
                assignee_id = CASE WHEN $8 THEN $9 ELSE assignee_id END
            WHERE id = $1
            RETURNING id, title, description, status, created_at, due_date,
                      project_id, assignee_id
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description.is_some())
        .bind(data.description.flatten())
        .bind(data.due_date.is_some())
        .bind(data.due_date.flatten())
        .bind(data.status)
        .bind(data.assignee_id.is_some())
        .bind(data.assignee_id.flatten())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by ID.
    ///
    /// Idempotent: returns `false` for a nonexistent id rather than
    /// erroring. Not currently reachable from any exposed handler.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
