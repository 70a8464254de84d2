//! API endpoints for departments.
//!
//! Deleting a department through this API only clears its active flag. The
//! default read paths hide inactive departments; `include_inactive=true`
//! shows them.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, MessageResponse, message, store_error};
use crate::logged_json::LoggedJson;
use crate::models::{Department, DepartmentInput};
use crate::orm::department as store;
use crate::orm::{DbConn, Visibility};
use crate::pagination::{Page, PageRequest};
use crate::request_context::BaseUrl;

const RESOURCE: &str = "Department";

/// List Departments endpoint.
///
/// - **URL:** `/department/`
/// - **Method:** `GET`
/// - **Query:** `page`, `page_size` (max 100, default 10), `include_inactive`
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "count": 1,
///   "next": null,
///   "previous": null,
///   "results": [
///     {
///       "DepartmentId": 1,
///       "DepartmentName": "Engineering",
///       "is_active": true,
///       "CreatedAt": "2024-01-01T00:00:00",
///       "UpdatedAt": "2024-01-01T00:00:00"
///     }
///   ]
/// }
/// ```
///
/// **Failure (HTTP 404 Not Found):** the requested page is past the end.
#[get("/department?<page>&<page_size>&<include_inactive>")]
pub async fn list_departments(
    db: DbConn,
    base_url: BaseUrl,
    page: Option<i64>,
    page_size: Option<i64>,
    include_inactive: Option<bool>,
) -> Result<Json<Page<Department>>, ApiError> {
    let request = PageRequest::new(page, page_size);
    let visibility = Visibility::from_flag(include_inactive.unwrap_or(false));

    let (departments, total) = db
        .run(move |conn| store::list_departments(conn, visibility, request))
        .await
        .map_err(|e| store_error(RESOURCE, e))?;

    Ok(Json(Page::new(
        departments,
        total,
        request,
        &base_url.join("/department/"),
    )))
}

/// Get Department endpoint.
///
/// - **URL:** `/department/<id>/`
/// - **Method:** `GET`
///
/// Returns 404 `{"error": "Department not found"}` for unknown or inactive
/// departments, unless `include_inactive=true` is given.
#[get("/department/<id>?<include_inactive>")]
pub async fn get_department(
    db: DbConn,
    id: i32,
    include_inactive: Option<bool>,
) -> Result<Json<Department>, ApiError> {
    let visibility = Visibility::from_flag(include_inactive.unwrap_or(false));
    db.run(move |conn| store::get_department(conn, id, visibility))
        .await
        .map(Json)
        .map_err(|e| store_error(RESOURCE, e))
}

/// Create Department endpoint.
///
/// - **URL:** `/department/`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// { "DepartmentName": "Engineering" }
/// ```
///
/// # Response
///
/// **Success (HTTP 201 Created):** `{"message": "Added Successfully"}`
///
/// **Failure (HTTP 400 Bad Request):** field errors, e.g.
/// `{"DepartmentName": ["Department with this DepartmentName already exists."]}`
#[post("/department", data = "<input>")]
pub async fn create_department(
    db: DbConn,
    input: LoggedJson<DepartmentInput>,
) -> Result<status::Custom<Json<MessageResponse>>, ApiError> {
    let input = input.into_inner();
    db.run(move |conn| store::insert_department(conn, &input))
        .await
        .map(|_| message(Status::Created, "Added Successfully"))
        .map_err(|e| store_error(RESOURCE, e))
}

/// Update Department endpoint.
///
/// - **URL:** `/department/<id>/`
/// - **Method:** `PUT`
///
/// Partial update of an active department. Only fields present in the body
/// are changed.
#[put("/department/<id>", data = "<input>")]
pub async fn update_department(
    db: DbConn,
    id: i32,
    input: LoggedJson<DepartmentInput>,
) -> Result<status::Custom<Json<MessageResponse>>, ApiError> {
    let input = input.into_inner();
    db.run(move |conn| store::update_department(conn, id, &input))
        .await
        .map(|_| message(Status::Ok, "Updated Successfully"))
        .map_err(|e| store_error(RESOURCE, e))
}

/// Soft Delete Department endpoint.
///
/// - **URL:** `/department/<id>/`
/// - **Method:** `PATCH`
///
/// Works on already inactive departments too, so repeating it succeeds.
#[patch("/department/<id>")]
pub async fn soft_delete_department(
    db: DbConn,
    id: i32,
) -> Result<status::Custom<Json<MessageResponse>>, ApiError> {
    db.run(move |conn| store::soft_delete_department(conn, id))
        .await
        .map(|_| message(Status::Ok, "Soft Deleted Successfully"))
        .map_err(|e| store_error(RESOURCE, e))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_departments,
        get_department,
        create_department,
        update_department,
        soft_delete_department
    ]
}
