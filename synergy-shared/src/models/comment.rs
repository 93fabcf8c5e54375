/// Comment model
///
/// Comments are part of the relational schema but have no handler surface:
/// nothing creates, reads, or deletes them yet. The model exists so the
/// schema and the data model stay in lockstep.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id BIGSERIAL PRIMARY KEY,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment left on a project by a member
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: i64,

    /// Comment body
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// Project the comment belongs to
    pub project_id: i64,

    /// User who wrote the comment
    pub author_id: i64,
}
