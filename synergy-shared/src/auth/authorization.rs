/// Authorization predicates
///
/// Request handlers run exactly one of these checks after authentication and
/// before touching an entity:
///
/// 1. **Membership**: the caller must belong to the project's member set
///    (reads, task create/update/list)
/// 2. **Ownership**: the caller must be the project owner
///    (project update, adding members)
/// 3. **Assignee validity**: a supplied assignee must resolve to a current
///    member of the task's project
///
/// Violations map to 403 (membership/ownership) or 400 (assignee) at the
/// API layer.

use sqlx::PgPool;

use crate::models::membership::Membership;
use crate::models::project::Project;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller is not a member of the project
    #[error("Not a member of project {0}")]
    NotMember(i64),

    /// Caller is not the owner of the project
    #[error("Only the owner of project {0} may perform this action")]
    NotOwner(i64),

    /// Supplied assignee does not exist or is not a project member
    #[error("Assignee is not a member of this project")]
    InvalidAssignee,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Checks that `user_id` is a member of `project_id`.
pub async fn require_membership(
    pool: &PgPool,
    project_id: i64,
    user_id: i64,
) -> Result<(), AuthzError> {
    if !Membership::exists(pool, user_id, project_id).await? {
        return Err(AuthzError::NotMember(project_id));
    }

    Ok(())
}

/// Checks that `user_id` owns the project.
///
/// Pure comparison against an already-loaded project; the owner is immutable
/// after creation so no re-read is needed.
pub fn require_ownership(project: &Project, user_id: i64) -> Result<(), AuthzError> {
    if project.owner_id != user_id {
        return Err(AuthzError::NotOwner(project.id));
    }

    Ok(())
}

/// Checks that `assignee_id` resolves to a current member of the project.
///
/// Membership implies existence (the join row carries a foreign key to
/// users), so a single membership probe covers both conditions. Re-run on
/// every assignment change, not just at task creation.
pub async fn validate_assignee(
    pool: &PgPool,
    project_id: i64,
    assignee_id: i64,
) -> Result<(), AuthzError> {
    if !Membership::exists(pool, assignee_id, project_id).await? {
        return Err(AuthzError::InvalidAssignee);
    }

    Ok(())
}
