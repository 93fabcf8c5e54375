/// Common test utilities for integration tests
///
/// Shared infrastructure for the API integration tests:
/// - Test database setup with migrations
/// - Registered test users with known passwords
/// - JWT token generation
/// - Router construction

use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use synergy_api::app::{build_router, AppState};
use synergy_api::config::Config;
use synergy_shared::auth::jwt::{create_token, Claims};
use synergy_shared::auth::password;
use synergy_shared::models::user::{CreateUser, User};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Produces an email address unique across the whole test run.
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}@example.com", prefix, nanos, n)
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub jwt_secret: String,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a test context: fresh pool, migrated schema, one registered
    /// active user with a valid access token.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to the crate's Cargo.toml
        sqlx::migrate!("../synergy-shared/migrations").run(&db).await?;

        let jwt_secret = config.jwt.secret.clone();
        let ttl = config.jwt.ttl_seconds;

        let user = create_user(&db, &unique_email("ctx"), "password-123").await?;

        let claims = Claims::new(&user.email, ttl);
        let jwt_token = create_token(&claims, &jwt_secret)?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            jwt_secret,
            user,
            jwt_token,
        })
    }

    /// Returns the authorization header value for the context user.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Mints a token for an arbitrary user of this context's app.
    pub fn token_for(&self, user: &User) -> anyhow::Result<String> {
        let claims = Claims::new(&user.email, 3600);
        Ok(create_token(&claims, &self.jwt_secret)?)
    }
}

/// Registers a user directly through the model layer.
pub async fn create_user(db: &PgPool, email: &str, plaintext: &str) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            hashed_password: password::hash_password(plaintext)?,
        },
    )
    .await?;

    Ok(user)
}
