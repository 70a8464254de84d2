//! API endpoints for employees.
//!
//! Employee representations are built per request: the department name and id
//! are joined in, and `PhotoURL` is resolved against the host the client
//! addressed.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, MessageResponse, message, store_error};
use crate::logged_json::LoggedJson;
use crate::models::EmployeeInput;
use crate::orm::employee as store;
use crate::orm::{DbConn, Visibility};
use crate::pagination::{Page, PageRequest};
use crate::representation::EmployeeView;
use crate::request_context::BaseUrl;

const RESOURCE: &str = "Employee";

/// List Employees endpoint.
///
/// - **URL:** `/employee/`
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
///       "EmployeeId": 1,
///       "EmployeeName": "John Doe",
///       "Email": null,
///       "Department": 1,
///       "DepartmentId": 1,
///       "DepartmentName": "Engineering",
///       "DateOfJoining": "2023-01-01",
///       "PhotoFileName": "default.png",
///       "PhotoURL": "http://localhost:8000/photos/default.png",
///       "is_active": true,
///       "CreatedAt": "2024-01-01T00:00:00",
///       "UpdatedAt": "2024-01-01T00:00:00"
///     }
///   ]
/// }
/// ```
#[get("/employee?<page>&<page_size>&<include_inactive>")]
pub async fn list_employees(
    db: DbConn,
    base_url: BaseUrl,
    page: Option<i64>,
    page_size: Option<i64>,
    include_inactive: Option<bool>,
) -> Result<Json<Page<EmployeeView>>, ApiError> {
    let request = PageRequest::new(page, page_size);
    let visibility = Visibility::from_flag(include_inactive.unwrap_or(false));

    let (rows, total) = db
        .run(move |conn| store::list_employees(conn, visibility, request))
        .await
        .map_err(|e| store_error(RESOURCE, e))?;

    let views = rows
        .into_iter()
        .map(|(employee, department)| EmployeeView::new(employee, &department, &base_url))
        .collect();

    Ok(Json(Page::new(
        views,
        total,
        request,
        &base_url.join("/employee/"),
    )))
}

/// Get Employee endpoint.
///
/// - **URL:** `/employee/<id>/`
/// - **Method:** `GET`
///
/// Soft-deleted employees are only returned with `include_inactive=true`.
#[get("/employee/<id>?<include_inactive>")]
pub async fn get_employee(
    db: DbConn,
    base_url: BaseUrl,
    id: i32,
    include_inactive: Option<bool>,
) -> Result<Json<EmployeeView>, ApiError> {
    let visibility = Visibility::from_flag(include_inactive.unwrap_or(false));
    let (employee, department) = db
        .run(move |conn| store::get_employee_with_department(conn, id, visibility))
        .await
        .map_err(|e| store_error(RESOURCE, e))?;

    Ok(Json(EmployeeView::new(employee, &department, &base_url)))
}

/// Create Employee endpoint.
///
/// - **URL:** `/employee/`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// {
///   "EmployeeName": "John Doe",
///   "Email": "john.doe@example.com",
///   "Department": 1,
///   "DateOfJoining": "25/12/2023",
///   "PhotoFileName": "john.png"
/// }
/// ```
///
/// `DateOfJoining` takes `YYYY-MM-DD` or `DD/MM/YYYY` and must not be in the
/// future. `Email` and `PhotoFileName` are optional.
#[post("/employee", data = "<input>")]
pub async fn create_employee(
    db: DbConn,
    input: LoggedJson<EmployeeInput>,
) -> Result<status::Custom<Json<MessageResponse>>, ApiError> {
    let input = input.into_inner();
    db.run(move |conn| store::insert_employee(conn, &input))
        .await
        .map(|_| message(Status::Created, "Added Successfully"))
        .map_err(|e| store_error(RESOURCE, e))
}

/// Update Employee endpoint.
///
/// - **URL:** `/employee/<id>/`
/// - **Method:** `PUT`
#[put("/employee/<id>", data = "<input>")]
pub async fn update_employee(
    db: DbConn,
    id: i32,
    input: LoggedJson<EmployeeInput>,
) -> Result<status::Custom<Json<MessageResponse>>, ApiError> {
    let input = input.into_inner();
    db.run(move |conn| store::update_employee(conn, id, &input))
        .await
        .map(|_| message(Status::Ok, "Updated Successfully"))
        .map_err(|e| store_error(RESOURCE, e))
}

/// Soft Delete Employee endpoint.
///
/// - **URL:** `/employee/<id>/`
/// - **Method:** `PATCH`
#[patch("/employee/<id>")]
pub async fn soft_delete_employee(
    db: DbConn,
    id: i32,
) -> Result<status::Custom<Json<MessageResponse>>, ApiError> {
    db.run(move |conn| store::soft_delete_employee(conn, id))
        .await
        .map(|_| message(Status::Ok, "Soft Deleted Successfully"))
        .map_err(|e| store_error(RESOURCE, e))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_employees,
        get_employee,
        create_employee,
        update_employee,
        soft_delete_employee
    ]
}
