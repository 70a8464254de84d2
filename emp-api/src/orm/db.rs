use diesel::QueryResult;
use diesel::connection::SimpleConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rocket::fairing::AdHoc;
use rocket_sync_db_pools::{database, diesel};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("sqlite_db")]
pub struct DbConn(diesel::SqliteConnection);

/// Enables foreign key enforcement on a SQLite connection.
///
/// SQLite keeps this setting per connection and defaults it to off, so
/// anything relying on `ON DELETE CASCADE` must make sure it was applied to
/// the connection it runs on.
pub fn set_foreign_keys(conn: &mut diesel::SqliteConnection) -> QueryResult<()> {
    conn.batch_execute("PRAGMA foreign_keys = ON")
}

/// Creates a Rocket fairing that enables foreign keys on ignition.
pub fn set_foreign_keys_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Set Foreign Keys", |rocket| async {
        let Some(conn) = DbConn::get_one(&rocket).await else {
            error!("Could not get a database connection to enable foreign keys");
            return Err(rocket);
        };
        match conn.run(set_foreign_keys).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("Failed to enable foreign keys: {}", e);
                Err(rocket)
            }
        }
    })
}

/// Runs all pending embedded migrations on the provided connection.
pub fn run_pending_migrations(
    conn: &mut diesel::SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Creates a Rocket fairing that runs database migrations on ignition.
///
/// Ignition fails if the migrations cannot be applied.
pub fn run_migrations_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Diesel Migrations", |rocket| async {
        let Some(conn) = DbConn::get_one(&rocket).await else {
            error!("Could not get a database connection for migrations");
            return Err(rocket);
        };
        let outcome = conn
            .run(|c| run_pending_migrations(c).map_err(|e| e.to_string()))
            .await;
        match outcome {
            Ok(()) => {
                info!("Database migrations are up to date");
                Ok(rocket)
            }
            Err(e) => {
                error!("Failed to run database migrations: {}", e);
                Err(rocket)
            }
        }
    })
}
