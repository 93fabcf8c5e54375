/// Database migration runner
///
/// Migrations live in `synergy-shared/migrations/` and are embedded into the
/// binary with `sqlx::migrate!`. They run once at startup, before the server
/// accepts traffic.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending migrations.
///
/// Each migration runs transactionally where PostgreSQL allows it; a failed
/// migration rolls back and surfaces as an error.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
