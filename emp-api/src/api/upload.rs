//! Photo upload endpoint.

use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::request::Request;
use rocket::{Catcher, Route, State};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::{ApiError, error_response};
use crate::photo_store::{PhotoStore, UploadError, check_upload, storage_name};
use crate::representation::PHOTO_ROUTE;
use crate::request_context::BaseUrl;

#[derive(FromForm)]
pub struct PhotoUpload<'r> {
    file: Option<TempFile<'r>>,
}

#[derive(Serialize, Deserialize, Debug, TS)]
#[ts(export)]
pub struct SavedFile {
    pub file_name: String,
    pub url: String,
}

fn upload_error(err: UploadError) -> ApiError {
    let status = match err {
        UploadError::Storage(_) => Status::InternalServerError,
        _ => Status::BadRequest,
    };
    error_response(status, &err.to_string())
}

/// Save File endpoint.
///
/// - **URL:** `/savefile/`
/// - **Method:** `POST` (`multipart/form-data`, field `file`)
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "file_name": "0b7c1f0e-8f9a-4c55-9a34-1f7f3c2b9d10.png",
///   "url": "http://localhost:8000/photos/0b7c1f0e-8f9a-4c55-9a34-1f7f3c2b9d10.png"
/// }
/// ```
///
/// **Failure (HTTP 400 Bad Request):** no file, a type other than
/// JPEG/PNG/GIF (judged by extension), or more than 5 MiB.
#[post("/savefile", data = "<upload>")]
pub async fn save_file(
    mut upload: Form<PhotoUpload<'_>>,
    store: &State<Box<dyn PhotoStore>>,
    base_url: BaseUrl,
) -> Result<Json<SavedFile>, ApiError> {
    let Some(file) = upload.file.as_mut() else {
        error!("No file provided in request");
        return Err(upload_error(UploadError::Missing));
    };

    let original_name = file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string());

    if let Err(e) = check_upload(original_name.as_deref(), file.len()) {
        error!(
            "Rejected upload {:?} ({} bytes): {}",
            original_name,
            file.len(),
            e
        );
        return Err(upload_error(e));
    }

    let name = storage_name(original_name.as_deref().unwrap_or_default());
    match store.save(&name, file).await {
        Ok(file_name) => {
            info!("File saved successfully: {}", file_name);
            let url = base_url.join(&format!("{}/{}", PHOTO_ROUTE, file_name));
            Ok(Json(SavedFile { file_name, url }))
        }
        Err(e) => {
            error!("Failed to save file {}: {}", name, e);
            Err(upload_error(UploadError::Storage(e)))
        }
    }
}

/// Bodies over the request data limits are cut off before the handler runs.
/// They get the same answer as any other oversize photo.
#[catch(413)]
pub fn upload_too_large(req: &Request) -> ApiError {
    warn!("Rejected oversize upload to {}", req.uri().path());
    upload_error(UploadError::TooLarge)
}

pub const UPLOAD_ROUTE: &str = "/savefile";

pub fn routes() -> Vec<Route> {
    routes![save_file]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![upload_too_large]
}
