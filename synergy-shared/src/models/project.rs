/// Project model and database operations
///
/// A project is the collaboration unit: owned by exactly one user (fixed at
/// creation), shared with others through the memberships table, and the
/// parent of tasks and comments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     owner_id BIGINT NOT NULL REFERENCES users(id)
/// );
/// ```
///
/// # Invariant
///
/// The owner is always a member: [`Project::create_with_owner`] inserts the
/// project row and the owner's membership row in one transaction, so either
/// both exist or neither does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Project model representing a collaboration unit
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// The owning user; immutable after creation
    pub owner_id: i64,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Partial update for a project
///
/// Only supplied fields overwrite; `description` distinguishes
/// absent (leave as-is) from `Some(None)` (clear it).
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description (`Some(None)` clears the stored value)
    pub description: Option<Option<String>>,
}

impl UpdateProject {
    /// True when no field is supplied (the update is a no-op).
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

impl Project {
    /// Creates a project owned by `owner_id` and auto-adds the owner as the
    /// first member.
    ///
    /// Both inserts run in a single transaction: a project can never exist
    /// with an empty member set.
    pub async fn create_with_owner(
        pool: &PgPool,
        data: CreateProject,
        owner_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at, owner_id
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, project_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(owner_id)
        .bind(project.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_at, owner_id
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists every project the user is a member of, owned or invited.
    pub async fn list_by_member(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.created_at, p.owner_id
            FROM projects p
            JOIN memberships m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Applies a partial update; unsupplied fields keep their stored value.
    ///
    /// Returns the updated project, or `None` if the id does not resolve.
    /// Concurrent updates are last-writer-wins; there is no version check.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END
            WHERE id = $1
            RETURNING id, name, description, created_at, owner_id
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description.is_some())
        .bind(data.description.flatten())
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_is_empty() {
        assert!(UpdateProject::default().is_empty());

        let update = UpdateProject {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());

        // An explicit null still counts as a supplied field.
        let update = UpdateProject {
            description: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    // Integration tests for database operations are in synergy-api/tests/
}
