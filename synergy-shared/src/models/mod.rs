/// Database models and repository operations
///
/// Each model owns its SQL. Handlers never touch `sqlx` directly; they go
/// through the operations defined here.
///
/// - `user`: identity records
/// - `project`: collaboration units owned by a user
/// - `membership`: the user↔project join entity
/// - `task`: work items under a project
/// - `comment`: project comments (schema only, no handler surface yet)

pub mod comment;
pub mod membership;
pub mod project;
pub mod task;
pub mod user;
