/// User model and database operations
///
/// Users are identity records: they register once, log in with their email,
/// and join projects through the memberships table. Accounts are never
/// hard-deleted here; the `is_active` flag gates login and use instead.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     full_name VARCHAR(255) NOT NULL,
///     hashed_password VARCHAR(255) NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Maximum number of rows returned by [`User::search_by_email`]
pub const SEARCH_LIMIT: i64 = 10;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the
/// hash is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Email address, the login identifier (unique, exact-match lookups)
    pub email: String,

    /// Display name
    pub full_name: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub hashed_password: String,

    /// Whether the account may log in and act
    pub is_active: bool,
}

/// Input for creating a new user
///
/// The password must already be hashed; plaintext never reaches this layer.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Display name
    pub full_name: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub hashed_password: String,
}

impl User {
    /// Creates a new user.
    ///
    /// Fails with a unique-constraint violation if the email is already
    /// registered; handlers pre-check and treat the constraint as a race
    /// fallback.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, full_name, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, email, full_name, hashed_password, is_active
            "#,
        )
        .bind(data.email)
        .bind(data.full_name)
        .bind(data.hashed_password)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, hashed_password, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact email match.
    ///
    /// This is the lookup used by both login and the token-subject
    /// resolution step of the authentication chain.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, hashed_password, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Fuzzy email search, capped at [`SEARCH_LIMIT`] rows.
    ///
    /// Used by the member-lookup UX. The handler guards against empty
    /// queries; this function just runs the substring match.
    pub async fn search_by_email(pool: &PgPool, query: &str) -> Result<Vec<Self>, sqlx::Error> {
        // Escape LIKE metacharacters so a literal '%' in the query does not
        // widen the match.
        let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, hashed_password, is_active
            FROM users
            WHERE email LIKE $1
            ORDER BY email ASC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
