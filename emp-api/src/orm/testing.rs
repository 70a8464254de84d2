//! Database and Rocket fixtures shared by unit and integration tests.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};
use uuid::Uuid;

use super::db::{DbConn, run_migrations_fairing, run_pending_migrations, set_foreign_keys};

/// Trades durability for speed. Only for throwaway test databases.
fn set_sqlite_test_pragmas(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        if let Some(conn) = DbConn::get_one(&rocket).await {
            if let Err(e) = conn.run(set_sqlite_test_pragmas).await {
                warn!("Failed to set SQLite test pragmas: {}", e);
            }
        }
        rocket
    })
}

/// Builds a Rocket instance backed by its own shared-cache in-memory database
/// and its own temporary photo directory, with every route mounted.
pub fn test_rocket() -> Rocket<Build> {
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());
    let photo_dir = std::env::temp_dir().join(format!("emp_api_photos_{}", Uuid::new_v4()));

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment()
        .merge(("databases", map!["sqlite_db" => db_config]))
        .merge(("limits", crate::config::upload_limits()))
        .merge(("photo_dir", photo_dir.display().to_string()));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(run_migrations_fairing());

    crate::assemble(rocket)
}

/// Opens a fresh in-memory SQLite database with foreign keys enabled and all
/// migrations applied. Every call returns an independent database.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn).expect("Failed to enable foreign keys");
    run_pending_migrations(&mut conn).expect("Failed to run migrations");
    conn
}
