//! HTTP handlers, one module per resource.

pub mod department;
pub mod employee;
pub mod home;
pub mod report;
pub mod upload;

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{Json, Value, json};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::orm::StoreError;

/// Error body for failures that carry no field detail.
#[derive(Serialize, Deserialize, Debug, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of successful writes, e.g. `{"message": "Added Successfully"}`.
#[derive(Serialize, Deserialize, Debug, TS)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

pub type ApiError = status::Custom<Json<Value>>;

pub(crate) fn message(status: Status, text: &str) -> status::Custom<Json<MessageResponse>> {
    status::Custom(
        status,
        Json(MessageResponse {
            message: text.to_string(),
        }),
    )
}

pub(crate) fn error_response(status: Status, text: &str) -> ApiError {
    status::Custom(status, Json(json!({ "error": text })))
}

/// Turns a store failure into the response for `resource` ("Department",
/// "Employee"). Database errors are logged and answered with a generic 500.
pub(crate) fn store_error(resource: &str, err: StoreError) -> ApiError {
    if let Some(errors) = err.field_errors() {
        return status::Custom(Status::BadRequest, Json(json!(errors)));
    }
    match err {
        StoreError::NotFound => error_response(Status::NotFound, &format!("{} not found", resource)),
        StoreError::InvalidPage => error_response(Status::NotFound, "Invalid page"),
        other => {
            error!("{} store failure: {}", resource, other);
            error_response(Status::InternalServerError, "Internal server error")
        }
    }
}

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(home::routes());
    routes.extend(department::routes());
    routes.extend(employee::routes());
    routes.extend(report::routes());
    routes.extend(upload::routes());
    routes
}
