use diesel::prelude::*;

use crate::models::{Department, DepartmentChanges, DepartmentInput, NewDepartment};
use crate::orm::{StoreError, Visibility, now, set_foreign_keys};
use crate::pagination::PageRequest;
use crate::schema::departments;
use crate::validation::{FieldErrors, REQUIRED_MESSAGE, clean_name};

pub const NAME_FIELD: &str = "DepartmentName";
const DUPLICATE_NAME_MESSAGE: &str = "Department with this DepartmentName already exists.";

/// Finds a department by exact (case-sensitive) name, active or not.
pub fn get_department_by_name(
    conn: &mut SqliteConnection,
    dept_name: &str,
) -> Result<Option<Department>, diesel::result::Error> {
    departments::table
        .filter(departments::name.eq(dept_name))
        .select(Department::as_select())
        .first(conn)
        .optional()
}

/// Fails with `DuplicateKey` if another department already uses `dept_name`.
/// Soft-deleted departments still hold their name.
fn ensure_name_available(
    conn: &mut SqliteConnection,
    dept_name: &str,
    exclude_id: Option<i32>,
) -> Result<(), StoreError> {
    match get_department_by_name(conn, dept_name)? {
        Some(existing) if Some(existing.id) != exclude_id => Err(StoreError::DuplicateKey {
            field: NAME_FIELD,
            message: DUPLICATE_NAME_MESSAGE.to_string(),
        }),
        _ => Ok(()),
    }
}

fn duplicate_name(err: diesel::result::Error) -> StoreError {
    StoreError::from_unique(err, NAME_FIELD, DUPLICATE_NAME_MESSAGE)
}

/// Creates an active department.
///
/// The name check and the insert share an immediate transaction, so SQLite's
/// write lock serializes concurrent creations of the same name.
pub fn insert_department(
    conn: &mut SqliteConnection,
    input: &DepartmentInput,
) -> Result<Department, StoreError> {
    let mut errors = FieldErrors::new();
    let dept_name = match input.name.as_deref().map(|name| clean_name("Department", name)) {
        Some(Ok(name)) => name,
        Some(Err(e)) => {
            errors.add(NAME_FIELD, e.to_string());
            String::new()
        }
        None => {
            errors.add(NAME_FIELD, REQUIRED_MESSAGE);
            String::new()
        }
    };
    errors.into_result().map_err(StoreError::Validation)?;

    conn.immediate_transaction(|conn| {
        ensure_name_available(conn, &dept_name, None)?;

        diesel::insert_into(departments::table)
            .values(&NewDepartment { name: dept_name })
            .execute(conn)
            .map_err(duplicate_name)?;

        departments::table
            .order(departments::id.desc())
            .select(Department::as_select())
            .first(conn)
            .map_err(StoreError::from)
    })
}

/// Looks a department up by id. With [`Visibility::Active`] a soft-deleted
/// department is reported as `NotFound`.
pub fn get_department(
    conn: &mut SqliteConnection,
    dept_id: i32,
    visibility: Visibility,
) -> Result<Department, StoreError> {
    departments::table
        .filter(departments::id.eq(dept_id))
        .filter(departments::is_active.eq_any(visibility.flags()))
        .select(Department::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound)
}

/// Returns one page of departments in insertion order, plus the total count.
pub fn list_departments(
    conn: &mut SqliteConnection,
    visibility: Visibility,
    page: PageRequest,
) -> Result<(Vec<Department>, i64), StoreError> {
    let total: i64 = departments::table
        .filter(departments::is_active.eq_any(visibility.flags()))
        .count()
        .get_result(conn)?;

    if !page.is_valid_for(total) {
        return Err(StoreError::InvalidPage);
    }

    let items = departments::table
        .filter(departments::is_active.eq_any(visibility.flags()))
        .order(departments::id.asc())
        .limit(page.page_size)
        .offset(page.offset())
        .select(Department::as_select())
        .load(conn)?;

    Ok((items, total))
}

/// Applies a partial update to an active department.
pub fn update_department(
    conn: &mut SqliteConnection,
    dept_id: i32,
    input: &DepartmentInput,
) -> Result<Department, StoreError> {
    conn.immediate_transaction(|conn| {
        let current = get_department(conn, dept_id, Visibility::Active)?;

        let mut errors = FieldErrors::new();
        let name = match input.name.as_deref().map(|name| clean_name("Department", name)) {
            Some(Ok(name)) => Some(name),
            Some(Err(e)) => {
                errors.add(NAME_FIELD, e.to_string());
                None
            }
            None => None,
        };
        errors.into_result().map_err(StoreError::Validation)?;

        if let Some(name) = name.as_deref() {
            ensure_name_available(conn, name, Some(current.id))?;
        }

        let changes = DepartmentChanges {
            name,
            is_active: input.is_active,
            updated_at: now(),
        };
        diesel::update(departments::table.find(dept_id))
            .set(&changes)
            .execute(conn)
            .map_err(duplicate_name)?;

        get_department(conn, dept_id, Visibility::All)
    })
}

/// Marks a department inactive. Already inactive departments are accepted,
/// so repeating the call succeeds.
pub fn soft_delete_department(
    conn: &mut SqliteConnection,
    dept_id: i32,
) -> Result<Department, StoreError> {
    let rows = diesel::update(departments::table.find(dept_id))
        .set((
            departments::is_active.eq(false),
            departments::updated_at.eq(now()),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(StoreError::NotFound);
    }
    get_department(conn, dept_id, Visibility::All)
}

/// Physically removes a department. Its employees go with it through the
/// `ON DELETE CASCADE` foreign key. Not reachable over HTTP.
pub fn purge_department(conn: &mut SqliteConnection, dept_id: i32) -> Result<(), StoreError> {
    set_foreign_keys(conn)?;
    let rows = diesel::delete(departments::table.find(dept_id)).execute(conn)?;
    if rows == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
