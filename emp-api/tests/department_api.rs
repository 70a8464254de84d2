use rocket::http::{ContentType, Status};
use serde_json::{Value, json};

mod common;
use common::{client, create_department};

#[rocket::async_test]
async fn test_create_and_list_departments() {
    let client = client().await;

    let response = client
        .post("/department/")
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": "Engineering" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body, json!({ "message": "Added Successfully" }));

    let page: Value = client
        .get("/department/")
        .dispatch()
        .await
        .into_json()
        .await
        .unwrap();
    assert_eq!(page["count"], 1);
    assert!(page["next"].is_null());
    assert!(page["previous"].is_null());
    assert_eq!(page["results"][0]["DepartmentName"], "Engineering");
    assert_eq!(page["results"][0]["is_active"], true);
}

#[rocket::async_test]
async fn test_duplicate_department_name() {
    let client = client().await;
    create_department(&client, "Engineering").await;

    let response = client
        .post("/department/")
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": "Engineering" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(
        body["DepartmentName"][0],
        "Department with this DepartmentName already exists."
    );
}

#[rocket::async_test]
async fn test_invalid_department_names() {
    let client = client().await;

    let response = client
        .post("/department/")
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": "R&D 2" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(
        body["DepartmentName"][0],
        "Department name must contain only letters and spaces."
    );

    let response = client
        .post("/department/")
        .header(ContentType::JSON)
        .body("{}")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["DepartmentName"][0], "This field is required.");
}

#[rocket::async_test]
async fn test_get_unknown_department() {
    let client = client().await;
    let response = client.get("/department/999/").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body, json!({ "error": "Department not found" }));
}

#[rocket::async_test]
async fn test_update_department() {
    let client = client().await;
    let id = create_department(&client, "Engineering").await;
    create_department(&client, "Sales").await;

    let response = client
        .put(format!("/department/{}/", id))
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": "Platform" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["message"], "Updated Successfully");

    let dept: Value = client
        .get(format!("/department/{}/", id))
        .dispatch()
        .await
        .into_json()
        .await
        .unwrap();
    assert_eq!(dept["DepartmentName"], "Platform");

    // Keeping the same name is not a conflict.
    let response = client
        .put(format!("/department/{}/", id))
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": "Platform" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .put(format!("/department/{}/", id))
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": "Sales" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_soft_delete_department() {
    let client = client().await;
    let id = create_department(&client, "Engineering").await;

    for _ in 0..2 {
        let response = client
            .patch(format!("/department/{}/", id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["message"], "Soft Deleted Successfully");
    }

    let response = client.get(format!("/department/{}/", id)).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let dept: Value = client
        .get(format!("/department/{}/?include_inactive=true", id))
        .dispatch()
        .await
        .into_json()
        .await
        .unwrap();
    assert_eq!(dept["is_active"], false);

    let page: Value = client
        .get("/department/")
        .dispatch()
        .await
        .into_json()
        .await
        .unwrap();
    assert_eq!(page["count"], 0);

    // Inactive departments cannot be updated.
    let response = client
        .put(format!("/department/{}/", id))
        .header(ContentType::JSON)
        .body(json!({ "DepartmentName": "Platform" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client.patch("/department/999/").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_department_pagination() {
    let client = client().await;
    for name in ["Alpha", "Bravo", "Charlie"] {
        create_department(&client, name).await;
    }

    let page: Value = client
        .get("/department/?page=1&page_size=2")
        .dispatch()
        .await
        .into_json()
        .await
        .unwrap();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert!(
        page["next"]
            .as_str()
            .unwrap()
            .ends_with("/department/?page=2&page_size=2")
    );
    assert!(page["previous"].is_null());

    let page: Value = client
        .get("/department/?page=2&page_size=2")
        .dispatch()
        .await
        .into_json()
        .await
        .unwrap();
    assert_eq!(page["results"][0]["DepartmentName"], "Charlie");
    assert!(page["next"].is_null());
    assert!(page["previous"].is_string());

    let response = client.get("/department/?page=5&page_size=2").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid page" }));
}

#[rocket::async_test]
async fn test_malformed_json_is_rejected() {
    let client = client().await;
    let response = client
        .post("/department/")
        .header(ContentType::JSON)
        .body("{not json")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_out_of_range_page_numbers() {
    let client = client().await;
    create_department(&client, "Engineering").await;

    for page in [i64::MAX, i64::MIN, 0] {
        let response = client
            .get(format!("/department/?page={}&page_size=100", page))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound, "page={page}");
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body, json!({ "error": "Invalid page" }));
    }
}
