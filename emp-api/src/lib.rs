#[macro_use]
extern crate rocket;

use rocket::figment::value::Map;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use rocket::fs::{FileServer, Options};
use rocket::request::Request;
use rocket::serde::json::{Json, Value, json};
use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod logged_json;
pub mod models;
pub mod orm;
pub use orm::DbConn;
pub mod pagination;
pub mod photo_store;
pub mod representation;
pub mod request_context;
pub mod schema;
pub mod validation;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

use config::AppConfig;
use photo_store::{LocalPhotoStore, PhotoStore};

#[catch(404)]
fn not_found(req: &Request) -> Json<Value> {
    Json(json!({
        "error": "Not Found",
        "path": req.uri().path().to_string(),
        "status": 404
    }))
}

#[catch(422)]
fn unprocessable_entity(req: &Request) -> Json<Value> {
    Json(json!({
        "error": "Unprocessable Entity",
        "path": req.uri().path().to_string(),
        "status": 422
    }))
}

#[catch(500)]
fn internal_server_error(req: &Request) -> Json<Value> {
    Json(json!({
        "error": "Internal Server Error",
        "path": req.uri().path().to_string(),
        "status": 500
    }))
}

#[catch(default)]
fn default_catcher(status: rocket::http::Status, req: &Request) -> Json<Value> {
    Json(json!({
        "error": status.reason().unwrap_or("Unknown Error"),
        "path": req.uri().path().to_string(),
        "status": status.code
    }))
}

/// Attaches everything that does not depend on how the database is
/// configured: the photo store, catchers, API routes and the photo file
/// server. Shared by the server and the test harness.
pub fn assemble(rocket: Rocket<Build>) -> Rocket<Build> {
    let config = rocket
        .figment()
        .extract::<AppConfig>()
        .unwrap_or_else(|e| {
            warn!("Invalid application configuration, using defaults: {}", e);
            AppConfig::default()
        });

    if let Err(e) = std::fs::create_dir_all(&config.photo_dir) {
        warn!(
            "Could not create photo directory {}: {}",
            config.photo_dir.display(),
            e
        );
    }
    info!("Photo directory: {}", config.photo_dir.display());

    let store: Box<dyn PhotoStore> = Box::new(LocalPhotoStore::new(&config.photo_dir));

    rocket
        .manage(store)
        .register(
            "/",
            catchers![
                not_found,
                unprocessable_entity,
                internal_server_error,
                default_catcher
            ],
        )
        .register(api::upload::UPLOAD_ROUTE, api::upload::catchers())
        .mount("/", api::routes())
        .mount(
            representation::PHOTO_ROUTE,
            FileServer::new(&config.photo_dir, Options::Missing).rank(10),
        )
}

fn log_rocket_info(rocket: &Rocket<Build>) {
    let figment = rocket.figment();

    if let Ok(address) = figment.extract_inner::<String>("address") {
        info!("Rocket is running at: {}", address);
    }

    if let Ok(port) = figment.extract_inner::<u16>("port") {
        info!("Rocket is listening on port: {}", port);
    }

    match figment.extract_inner::<Map<String, Value>>("databases.sqlite_db") {
        Ok(db_config) => {
            if let Some(Value::String(url)) = db_config.get("url") {
                info!("Database URL: {}", url);
            } else {
                warn!("Database URL not found in configuration");
            }
        }
        Err(e) => {
            warn!("Failed to extract database configuration: {}", e);
        }
    }
}

/// Builds the production server from `Rocket.toml`, `ROCKET_*` variables and
/// `DATABASE_URL`. Tests use `orm::testing::test_rocket` instead.
pub fn rocket(database_url: String) -> Rocket<Build> {
    let figment = Figment::from(rocket::Config::default())
        .merge(("limits", config::upload_limits()))
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global())
        .merge(("databases.sqlite_db.url", database_url));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::set_foreign_keys_fairing())
        .attach(orm::run_migrations_fairing());

    log_rocket_info(&rocket);

    assemble(rocket)
}
