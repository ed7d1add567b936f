//! Database migration command.
//!
//! Applies the API schema migrations from `crates/api/migrations/` and then
//! asks the tower-sessions Postgres store to create its session table. The
//! server never migrates on startup; this command is the only migration
//! path.

use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use marigold_api::store::{PgStore, create_pool};

use super::{CommandError, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    info!("Running schema migrations...");
    PgStore::new(pool.clone()).migrate().await?;

    info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    info!("Migrations complete");
    Ok(())
}
