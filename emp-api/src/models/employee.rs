use chrono::{NaiveDate, NaiveDateTime};
use diesel::{AsChangeset, Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::Department;
use crate::schema::employees;

/// Photo filename used when an employee has none.
pub const DEFAULT_PHOTO_FILE_NAME: &str = "default.png";

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Department))]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub department_id: i32, // Foreign key to Department
    pub date_of_joining: NaiveDate,
    pub photo_file_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub name: String,
    pub email: Option<String>,
    pub department_id: i32,
    pub date_of_joining: NaiveDate,
    pub photo_file_name: Option<String>,
}

/// Outer `None` leaves a column untouched; `Some(None)` clears a nullable one.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = employees)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub department_id: Option<i32>,
    pub date_of_joining: Option<NaiveDate>,
    pub photo_file_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Request body for creating or updating an employee.
///
/// `DateOfJoining` is accepted as text so both `YYYY-MM-DD` and
/// `DD/MM/YYYY` can be parsed by the store. A blank `Email` means "no email".
#[derive(Debug, Default, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct EmployeeInput {
    #[serde(rename = "EmployeeName", default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Department", default)]
    pub department: Option<i32>,
    #[serde(rename = "DateOfJoining", default)]
    pub date_of_joining: Option<String>,
    #[serde(rename = "PhotoFileName", default)]
    pub photo_file_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}
