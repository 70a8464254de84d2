//! Client-facing views of stored records.
//!
//! Departments serialize as they are stored. Employees are joined with their
//! department at response time and gain a computed photo URL.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{DEFAULT_PHOTO_FILE_NAME, Department, Employee};
use crate::orm::employee::DepartmentHeadcount;
use crate::request_context::BaseUrl;

/// Public path under which stored photos are served.
pub const PHOTO_ROUTE: &str = "/photos";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeView {
    #[serde(rename = "EmployeeId")]
    pub employee_id: i32,
    #[serde(rename = "EmployeeName")]
    pub employee_name: String,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Department")]
    pub department: i32,
    #[serde(rename = "DepartmentId")]
    pub department_id: i32,
    #[serde(rename = "DepartmentName")]
    pub department_name: String,
    #[serde(rename = "DateOfJoining")]
    #[ts(type = "string")]
    pub date_of_joining: NaiveDate,
    #[serde(rename = "PhotoFileName")]
    pub photo_file_name: Option<String>,
    #[serde(rename = "PhotoURL")]
    pub photo_url: String,
    pub is_active: bool,
    #[serde(rename = "CreatedAt")]
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "UpdatedAt")]
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

impl EmployeeView {
    pub fn new(employee: Employee, department: &Department, base_url: &BaseUrl) -> Self {
        let photo_url = photo_url(base_url, employee.photo_file_name.as_deref());
        Self {
            employee_id: employee.id,
            employee_name: employee.name,
            email: employee.email,
            department: employee.department_id,
            department_id: department.id,
            department_name: department.name.clone(),
            date_of_joining: employee.date_of_joining,
            photo_file_name: employee.photo_file_name,
            photo_url,
            is_active: employee.is_active,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

/// URL of a stored photo; unset or blank filenames use the default photo.
pub fn photo_url(base_url: &BaseUrl, file_name: Option<&str>) -> String {
    let file_name = file_name
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PHOTO_FILE_NAME);
    base_url.join(&format!("{}/{}", PHOTO_ROUTE, file_name))
}

/// Chart-ready headcount report: parallel label and value arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeReport {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl From<Vec<DepartmentHeadcount>> for EmployeeReport {
    fn from(rows: Vec<DepartmentHeadcount>) -> Self {
        let (labels, data) = rows
            .into_iter()
            .map(|row| (row.department_name, row.count))
            .unzip();
        Self { labels, data }
    }
}
