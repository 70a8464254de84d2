//! Headcount report endpoint.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::ErrorResponse;
use crate::orm::DbConn;
use crate::orm::employee::count_active_by_department;
use crate::representation::EmployeeReport;

/// Employee Report endpoint.
///
/// - **URL:** `/employee-report/`
/// - **Method:** `GET`
/// - **Purpose:** Active employee counts per department, for charting
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// { "labels": ["Engineering", "Sales"], "data": [2, 1] }
/// ```
///
/// **Failure (HTTP 500 Internal Server Error):**
/// `{"error": "Failed to generate report"}`; the cause is only logged.
#[get("/employee-report")]
pub async fn employee_report(
    db: DbConn,
) -> Result<Json<EmployeeReport>, status::Custom<Json<ErrorResponse>>> {
    match db.run(count_active_by_department).await {
        Ok(rows) => Ok(Json(EmployeeReport::from(rows))),
        Err(e) => {
            error!("Error generating employee report: {}", e);
            Err(status::Custom(
                Status::InternalServerError,
                Json(ErrorResponse {
                    error: "Failed to generate report".to_string(),
                }),
            ))
        }
    }
}

pub fn routes() -> Vec<Route> {
    routes![employee_report]
}
