/// Membership model and database operations
///
/// The join entity pairing a user with a project. The composite primary key
/// preserves the "no duplicate membership" invariant structurally; the
/// handler layer turns a duplicate add into a 409 before the constraint can
/// fire.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE memberships (
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     PRIMARY KEY (user_id, project_id)
/// );
/// ```
///
/// Membership rows have no independent lifecycle: created when a user is
/// added, never updated, and removed only by cascade when the user or
/// project is deleted.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::user::User;

/// Membership model asserting a user belongs to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// User ID
    pub user_id: i64,

    /// Project ID
    pub project_id: i64,
}

impl Membership {
    /// Adds a user to a project's member set.
    ///
    /// Idempotent at this level: adding an existing member is a no-op
    /// (`ON CONFLICT DO NOTHING`). The handler layer enforces the
    /// "already a member" error instead.
    pub async fn create(pool: &PgPool, user_id: i64, project_id: i64) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, project_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, project_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .execute(pool)
        .await?;

        Ok(Membership {
            user_id,
            project_id,
        })
    }

    /// Checks whether a user is in a project's member set.
    pub async fn exists(pool: &PgPool, user_id: i64, project_id: i64) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE user_id = $1 AND project_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists the full user records for a project's members.
    pub async fn list_members(pool: &PgPool, project_id: i64) -> Result<Vec<User>, sqlx::Error> {
        let members = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.full_name, u.hashed_password, u.is_active
            FROM users u
            JOIN memberships m ON m.user_id = u.id
            WHERE m.project_id = $1
            ORDER BY u.id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}
