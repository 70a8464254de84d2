//! Welcome and health endpoints.

use rocket::{Route, serde::json::Json};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::MessageResponse;
use crate::built_info;

#[derive(Serialize, Deserialize, Debug, TS)]
#[ts(export)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub built: String,
    pub git_commit: Option<String>,
}

/// Welcome endpoint.
///
/// - **URL:** `/`
/// - **Method:** `GET`
#[get("/")]
pub fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Employee Management API.".to_string(),
    })
}

/// Health Status endpoint.
///
/// - **URL:** `/status`
/// - **Method:** `GET`
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "status": "running",
///   "version": "0.1.0",
///   "built": "Fri, 15 Aug 2025 18:13:43 +0000",
///   "git_commit": "cd51275141a2e7d49737aa7dd4e8ff7c9a804d67"
/// }
/// ```
#[get("/status")]
pub fn health_status() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "running".to_string(),
        version: built_info::PKG_VERSION.to_string(),
        built: built_info::BUILT_TIME_UTC.to_string(),
        git_commit: built_info::GIT_COMMIT_HASH.map(str::to_string),
    })
}

pub fn routes() -> Vec<Route> {
    routes![home, health_status]
}
