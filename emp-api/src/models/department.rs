use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::departments;

/// A stored department. Serializes directly as the client-facing
/// representation.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS,
)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Department {
    #[serde(rename = "DepartmentId")]
    pub id: i32,
    #[serde(rename = "DepartmentName")]
    pub name: String,
    pub is_active: bool,
    #[serde(rename = "CreatedAt")]
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "UpdatedAt")]
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = departments)]
pub struct NewDepartment {
    pub name: String,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = departments)]
pub struct DepartmentChanges {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

/// Request body for creating or updating a department. Every field is
/// optional so that missing fields are reported as field-level errors.
#[derive(Debug, Default, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct DepartmentInput {
    #[serde(rename = "DepartmentName", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl DepartmentInput {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            is_active: None,
        }
    }
}
