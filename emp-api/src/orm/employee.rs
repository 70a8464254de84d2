use chrono::NaiveDate;
use diesel::prelude::*;

use crate::models::{
    DEFAULT_PHOTO_FILE_NAME, Department, Employee, EmployeeChanges, EmployeeInput, NewEmployee,
};
use crate::orm::department::get_department;
use crate::orm::{StoreError, Visibility, now};
use crate::pagination::PageRequest;
use crate::schema::{departments, employees};
use crate::validation::{
    self, FieldErrors, MAX_PHOTO_FILE_NAME_LENGTH, REQUIRED_MESSAGE, clean_name,
    validate_date_of_joining, validate_email, validate_max_length,
};

pub const NAME_FIELD: &str = "EmployeeName";
pub const EMAIL_FIELD: &str = "Email";
pub const DEPARTMENT_FIELD: &str = "Department";
pub const DATE_OF_JOINING_FIELD: &str = "DateOfJoining";
pub const PHOTO_FIELD: &str = "PhotoFileName";
const DUPLICATE_EMAIL_MESSAGE: &str = "Employee with this Email already exists.";

/// Number of active employees in one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentHeadcount {
    pub department_name: String,
    pub count: i64,
}

fn check_name(input: &EmployeeInput, required: bool, errors: &mut FieldErrors) -> Option<String> {
    match input.name.as_deref() {
        Some(name) => match clean_name("Employee", name) {
            Ok(name) => Some(name),
            Err(e) => {
                errors.add(NAME_FIELD, e.to_string());
                None
            }
        },
        None => {
            if required {
                errors.add(NAME_FIELD, REQUIRED_MESSAGE);
            }
            None
        }
    }
}

/// `Some(None)` means the client sent a blank email, which clears it.
fn check_email(input: &EmployeeInput, errors: &mut FieldErrors) -> Option<Option<String>> {
    let email = input.email.as_deref()?.trim();
    if email.is_empty() {
        return Some(None);
    }
    match validate_email(email) {
        Ok(()) => Some(Some(email.to_string())),
        Err(e) => {
            errors.add(EMAIL_FIELD, e.to_string());
            None
        }
    }
}

/// The referenced department has to exist and be active.
fn check_department(
    conn: &mut SqliteConnection,
    input: &EmployeeInput,
    required: bool,
    errors: &mut FieldErrors,
) -> Result<Option<i32>, StoreError> {
    let Some(dept_id) = input.department else {
        if required {
            errors.add(DEPARTMENT_FIELD, REQUIRED_MESSAGE);
        }
        return Ok(None);
    };
    match get_department(conn, dept_id, Visibility::Active) {
        Ok(dept) => Ok(Some(dept.id)),
        Err(StoreError::NotFound) => {
            errors.add(
                DEPARTMENT_FIELD,
                format!("Invalid pk \"{}\" - object does not exist.", dept_id),
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn check_date_of_joining(
    input: &EmployeeInput,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    let Some(raw) = input.date_of_joining.as_deref() else {
        if required {
            errors.add(DATE_OF_JOINING_FIELD, REQUIRED_MESSAGE);
        }
        return None;
    };
    let parsed = validation::parse_date(raw)
        .and_then(|date| validate_date_of_joining(date).map(|()| date));
    match parsed {
        Ok(date) => Some(date),
        Err(e) => {
            errors.add(DATE_OF_JOINING_FIELD, e.to_string());
            None
        }
    }
}

fn check_photo(input: &EmployeeInput, errors: &mut FieldErrors) -> Option<String> {
    let photo = input.photo_file_name.as_deref()?;
    match validate_max_length(photo, MAX_PHOTO_FILE_NAME_LENGTH) {
        Ok(()) => Some(photo.to_string()),
        Err(e) => {
            errors.add(PHOTO_FIELD, e.to_string());
            None
        }
    }
}

pub fn get_employee_by_email(
    conn: &mut SqliteConnection,
    employee_email: &str,
) -> Result<Option<Employee>, diesel::result::Error> {
    employees::table
        .filter(employees::email.eq(employee_email))
        .select(Employee::as_select())
        .first(conn)
        .optional()
}

fn ensure_email_available(
    conn: &mut SqliteConnection,
    employee_email: &str,
    exclude_id: Option<i32>,
) -> Result<(), StoreError> {
    match get_employee_by_email(conn, employee_email)? {
        Some(existing) if Some(existing.id) != exclude_id => Err(StoreError::DuplicateKey {
            field: EMAIL_FIELD,
            message: DUPLICATE_EMAIL_MESSAGE.to_string(),
        }),
        _ => Ok(()),
    }
}

fn duplicate_email(err: diesel::result::Error) -> StoreError {
    StoreError::from_unique(err, EMAIL_FIELD, DUPLICATE_EMAIL_MESSAGE)
}

/// Validates every field of a new employee, collecting all failures.
fn validate_new_employee(
    conn: &mut SqliteConnection,
    input: &EmployeeInput,
) -> Result<NewEmployee, StoreError> {
    let mut errors = FieldErrors::new();
    let name = check_name(input, true, &mut errors);
    let email = check_email(input, &mut errors);
    let department_id = check_department(conn, input, true, &mut errors)?;
    let date_of_joining = check_date_of_joining(input, true, &mut errors);
    let photo_file_name = check_photo(input, &mut errors);

    // A missing value here always has a matching entry in `errors`.
    let (Some(name), Some(department_id), Some(date_of_joining)) =
        (name, department_id, date_of_joining)
    else {
        return Err(StoreError::Validation(errors));
    };
    errors.into_result().map_err(StoreError::Validation)?;

    Ok(NewEmployee {
        name,
        email: email.flatten(),
        department_id,
        date_of_joining,
        photo_file_name: Some(
            photo_file_name.unwrap_or_else(|| DEFAULT_PHOTO_FILE_NAME.to_string()),
        ),
    })
}

/// Creates an active employee.
pub fn insert_employee(
    conn: &mut SqliteConnection,
    input: &EmployeeInput,
) -> Result<Employee, StoreError> {
    conn.immediate_transaction(|conn| {
        let new_employee = validate_new_employee(conn, input)?;
        if let Some(email) = new_employee.email.as_deref() {
            ensure_email_available(conn, email, None)?;
        }

        diesel::insert_into(employees::table)
            .values(&new_employee)
            .execute(conn)
            .map_err(duplicate_email)?;

        employees::table
            .order(employees::id.desc())
            .select(Employee::as_select())
            .first(conn)
            .map_err(StoreError::from)
    })
}

pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
    visibility: Visibility,
) -> Result<Employee, StoreError> {
    employees::table
        .filter(employees::id.eq(employee_id))
        .filter(employees::is_active.eq_any(visibility.flags()))
        .select(Employee::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound)
}

/// Like [`get_employee`], joined with the referenced department (whatever its
/// own active flag).
pub fn get_employee_with_department(
    conn: &mut SqliteConnection,
    employee_id: i32,
    visibility: Visibility,
) -> Result<(Employee, Department), StoreError> {
    employees::table
        .inner_join(departments::table)
        .filter(employees::id.eq(employee_id))
        .filter(employees::is_active.eq_any(visibility.flags()))
        .select((Employee::as_select(), Department::as_select()))
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound)
}

/// Returns one page of employees with their departments, in insertion order,
/// plus the total count.
pub fn list_employees(
    conn: &mut SqliteConnection,
    visibility: Visibility,
    page: PageRequest,
) -> Result<(Vec<(Employee, Department)>, i64), StoreError> {
    let total: i64 = employees::table
        .filter(employees::is_active.eq_any(visibility.flags()))
        .count()
        .get_result(conn)?;

    if !page.is_valid_for(total) {
        return Err(StoreError::InvalidPage);
    }

    let items = employees::table
        .inner_join(departments::table)
        .filter(employees::is_active.eq_any(visibility.flags()))
        .order(employees::id.asc())
        .limit(page.page_size)
        .offset(page.offset())
        .select((Employee::as_select(), Department::as_select()))
        .load(conn)?;

    Ok((items, total))
}

/// Applies a partial update to an active employee. Only the fields present in
/// `input` are validated and written.
pub fn update_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
    input: &EmployeeInput,
) -> Result<Employee, StoreError> {
    conn.immediate_transaction(|conn| {
        let current = get_employee(conn, employee_id, Visibility::Active)?;

        let mut errors = FieldErrors::new();
        let changes = EmployeeChanges {
            name: check_name(input, false, &mut errors),
            email: check_email(input, &mut errors),
            department_id: check_department(conn, input, false, &mut errors)?,
            date_of_joining: check_date_of_joining(input, false, &mut errors),
            photo_file_name: check_photo(input, &mut errors).map(Some),
            is_active: input.is_active,
            updated_at: Some(now()),
        };
        errors.into_result().map_err(StoreError::Validation)?;

        if let Some(Some(email)) = changes.email.as_ref() {
            ensure_email_available(conn, email, Some(current.id))?;
        }

        diesel::update(employees::table.find(employee_id))
            .set(&changes)
            .execute(conn)
            .map_err(duplicate_email)?;

        get_employee(conn, employee_id, Visibility::All)
    })
}

/// Marks an employee inactive. Repeating the call succeeds.
pub fn soft_delete_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Employee, StoreError> {
    let rows = diesel::update(employees::table.find(employee_id))
        .set((
            employees::is_active.eq(false),
            employees::updated_at.eq(now()),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(StoreError::NotFound);
    }
    get_employee(conn, employee_id, Visibility::All)
}

/// Counts active employees per department name, alphabetically. Departments
/// without active employees do not appear.
pub fn count_active_by_department(
    conn: &mut SqliteConnection,
) -> Result<Vec<DepartmentHeadcount>, StoreError> {
    let rows = employees::table
        .inner_join(departments::table)
        .filter(employees::is_active.eq(true))
        .group_by(departments::name)
        .select((departments::name, diesel::dsl::count(employees::id)))
        .order(departments::name.asc())
        .load::<(String, i64)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(department_name, count)| DepartmentHeadcount {
            department_name,
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DepartmentInput;
    use crate::orm::department::{insert_department, purge_department};
    use crate::orm::testing::setup_test_db;

    fn department(conn: &mut SqliteConnection, name: &str) -> Department {
        insert_department(conn, &DepartmentInput::named(name)).expect("department created")
    }

    fn employee_input(name: &str, dept_id: i32) -> EmployeeInput {
        EmployeeInput {
            name: Some(name.to_string()),
            department: Some(dept_id),
            date_of_joining: Some("2023-01-01".to_string()),
            ..Default::default()
        }
    }

    fn hire(conn: &mut SqliteConnection, name: &str, dept_id: i32) -> Employee {
        insert_employee(conn, &employee_input(name, dept_id)).expect("employee created")
    }

    fn field_errors(err: StoreError) -> FieldErrors {
        match err {
            StoreError::Validation(errors) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_employee_defaults() {
        let mut conn = setup_test_db();
        let dept = department(&mut conn, "Engineering");
        let emp = hire(&mut conn, "John Doe", dept.id);

        assert!(emp.id > 0);
        assert_eq!(emp.department_id, dept.id);
        assert_eq!(emp.email, None);
        assert_eq!(emp.photo_file_name.as_deref(), Some(DEFAULT_PHOTO_FILE_NAME));
        assert_eq!(emp.date_of_joining, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert!(emp.is_active);
    }

    #[test]
    fn test_insert_reports_all_missing_fields() {
        let mut conn = setup_test_db();
        let errors = field_errors(insert_employee(&mut conn, &EmployeeInput::default()).unwrap_err());
        for field in [NAME_FIELD, DEPARTMENT_FIELD, DATE_OF_JOINING_FIELD] {
            assert_eq!(errors.get(field).unwrap(), [REQUIRED_MESSAGE], "{field}");
        }
        assert!(!errors.contains(EMAIL_FIELD));
    }

    #[test]
    fn test_slash_date_is_accepted() {
        let mut conn = setup_test_db();
        let dept = department(&mut conn, "Engineering");
        let input = EmployeeInput {
            date_of_joining: Some("25/12/2023".to_string()),
            ..employee_input("Jane Doe", dept.id)
        };
        let emp = insert_employee(&mut conn, &input).unwrap();
        assert_eq!(emp.date_of_joining, NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());
    }

    #[test]
    fn test_future_date_rejected_in_both_formats() {
        let mut conn = setup_test_db();
        let dept = department(&mut conn, "Engineering");
        let future = chrono::Local::now().date_naive() + chrono::Days::new(10);

        for raw in [future.format("%Y-%m-%d").to_string(), future.format("%d/%m/%Y").to_string()] {
            let input = EmployeeInput {
                date_of_joining: Some(raw.clone()),
                ..employee_input("Jane Doe", dept.id)
            };
            let errors = field_errors(insert_employee(&mut conn, &input).unwrap_err());
            assert_eq!(
                errors.get(DATE_OF_JOINING_FIELD).unwrap(),
                ["Date of joining cannot be in the future."],
                "{raw}"
            );
        }
    }

    #[test]
    fn test_department_must_be_active() {
        let mut conn = setup_test_db();
        let dept = department(&mut conn, "Engineering");
        crate::orm::department::soft_delete_department(&mut conn, dept.id).unwrap();

        let errors = field_errors(
            insert_employee(&mut conn, &employee_input("John Doe", dept.id)).unwrap_err(),
        );
        assert!(errors.contains(DEPARTMENT_FIELD));

        let errors =
            field_errors(insert_employee(&mut conn, &employee_input("John Doe", 4242)).unwrap_err());
        assert_eq!(
            errors.get(DEPARTMENT_FIELD).unwrap(),
            ["Invalid pk \"4242\" - object does not exist."]
        );
    }

    #[test]
    fn test_email_unique_when_present() {
        let mut conn = setup_test_db();
        let dept = department(&mut conn, "Engineering");
        let with_email = |name: &str, email: &str| EmployeeInput {
            email: Some(email.to_string()),
            ..employee_input(name, dept.id)
        };

        insert_employee(&mut conn, &with_email("John Doe", "john@example.com")).unwrap();
        let err = insert_employee(&mut conn, &with_email("Johnny", "john@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { field: EMAIL_FIELD, .. }));

        // Blank emails are stored as absent and never collide
        let a = insert_employee(&mut conn, &with_email("Ann", "")).unwrap();
        let b = insert_employee(&mut conn, &with_email("Bob", "  ")).unwrap();
        assert_eq!((a.email, b.email), (None, None));

        let errors =
            field_errors(insert_employee(&mut conn, &with_email("Cid", "not-an-email")).unwrap_err());
        assert!(errors.contains(EMAIL_FIELD));
    }

    #[test]
    fn test_update_employee_partial() {
        let mut conn = setup_test_db();
        let eng = department(&mut conn, "Engineering");
        let ops = department(&mut conn, "Operations");
        let emp = hire(&mut conn, "John Doe", eng.id);

        let update = EmployeeInput {
            department: Some(ops.id),
            email: Some("john@example.com".to_string()),
            ..Default::default()
        };
        let updated = update_employee(&mut conn, emp.id, &update).unwrap();
        assert_eq!(updated.name, "John Doe");
        assert_eq!(updated.department_id, ops.id);
        assert_eq!(updated.email.as_deref(), Some("john@example.com"));

        // Keeping its own email is fine, a blank one clears it
        assert!(update_employee(&mut conn, emp.id, &update).is_ok());
        let cleared = update_employee(
            &mut conn,
            emp.id,
            &EmployeeInput {
                email: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cleared.email, None);

        let bad = EmployeeInput {
            name: Some("J0hn".to_string()),
            ..Default::default()
        };
        assert!(field_errors(update_employee(&mut conn, emp.id, &bad).unwrap_err())
            .contains(NAME_FIELD));
    }

    #[test]
    fn test_soft_delete_employee() {
        let mut conn = setup_test_db();
        let dept = department(&mut conn, "Engineering");
        let emp = hire(&mut conn, "John Doe", dept.id);

        assert!(!soft_delete_employee(&mut conn, emp.id).unwrap().is_active);
        assert!(soft_delete_employee(&mut conn, emp.id).is_ok());

        assert!(matches!(
            get_employee_with_department(&mut conn, emp.id, Visibility::Active),
            Err(StoreError::NotFound)
        ));
        let (any, dept_row) =
            get_employee_with_department(&mut conn, emp.id, Visibility::All).unwrap();
        assert!(!any.is_active);
        assert_eq!(dept_row.name, "Engineering");

        assert!(matches!(
            update_employee(&mut conn, emp.id, &EmployeeInput::default()),
            Err(StoreError::NotFound)
        ));
        let (active, total) =
            list_employees(&mut conn, Visibility::Active, PageRequest::default()).unwrap();
        assert!(active.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_count_active_by_department() {
        let mut conn = setup_test_db();
        let sales = department(&mut conn, "Sales");
        let eng = department(&mut conn, "Engineering");
        department(&mut conn, "Marketing");

        hire(&mut conn, "Ann", sales.id);
        hire(&mut conn, "Bob", eng.id);
        hire(&mut conn, "Cid", eng.id);
        let gone = hire(&mut conn, "Dee", sales.id);
        soft_delete_employee(&mut conn, gone.id).unwrap();

        let report = count_active_by_department(&mut conn).unwrap();
        assert_eq!(
            report,
            vec![
                DepartmentHeadcount {
                    department_name: "Engineering".to_string(),
                    count: 2
                },
                DepartmentHeadcount {
                    department_name: "Sales".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_purge_department_cascades() {
        let mut conn = setup_test_db();
        let dept = department(&mut conn, "Engineering");
        let other = department(&mut conn, "Sales");
        let emp = hire(&mut conn, "John Doe", dept.id);
        let survivor = hire(&mut conn, "Jane Doe", other.id);

        purge_department(&mut conn, dept.id).unwrap();

        assert!(matches!(
            get_employee(&mut conn, emp.id, Visibility::All),
            Err(StoreError::NotFound)
        ));
        assert!(get_employee(&mut conn, survivor.id, Visibility::All).is_ok());
        assert!(matches!(purge_department(&mut conn, dept.id), Err(StoreError::NotFound)));
    }
}
