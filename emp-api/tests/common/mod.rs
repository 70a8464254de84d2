//! Helpers shared by the API integration tests.
#![allow(dead_code)]

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

use emp_api::orm::testing::test_rocket;

pub async fn client() -> Client {
    Client::tracked(test_rocket())
        .await
        .expect("valid rocket instance")
}

/// Creates a department and returns its id.
pub async fn create_department(client: &Client, name: &str) -> i64 {
    let response = client
        .post("/department/")
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": name }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);

    let page: Value = client
        .get("/department/?page_size=100&include_inactive=true")
        .dispatch()
        .await
        .into_json()
        .await
        .expect("department page");
    page["results"]
        .as_array()
        .and_then(|rows| rows.iter().find(|row| row["DepartmentName"] == name))
        .and_then(|row| row["DepartmentId"].as_i64())
        .expect("created department is listed")
}

/// Creates an employee and returns its id, the newest one listed.
pub async fn create_employee(client: &Client, body: Value) -> i64 {
    let response = client
        .post("/employee/")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);

    let page: Value = client
        .get("/employee/?page_size=100&include_inactive=true")
        .dispatch()
        .await
        .into_json()
        .await
        .expect("employee page");
    page["results"]
        .as_array()
        .and_then(|rows| rows.iter().filter_map(|row| row["EmployeeId"].as_i64()).max())
        .expect("created employee is listed")
}

/// Builds a `multipart/form-data` body with a single `file` part.
pub fn multipart_file(file_name: &str, content: &[u8]) -> (ContentType, Vec<u8>) {
    let boundary = "X-EMP-API-BOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let content_type = ContentType::new("multipart", "form-data")
        .with_params(("boundary", boundary));
    (content_type, body)
}
