//! Application settings read from Rocket's figment.
//!
//! Besides Rocket's own keys, the service understands `photo_dir`
//! (`ROCKET_PHOTO_DIR`), the directory uploaded photos are written to and
//! served from.

use std::path::PathBuf;

use rocket::data::{Limits, ToByteUnit};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub photo_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            photo_dir: PathBuf::from("photos"),
        }
    }
}

/// Request limits large enough for a full-size photo plus multipart
/// overhead, so oversize files reach the upload handler and get a proper
/// error instead of a truncated body.
pub fn upload_limits() -> Limits {
    Limits::default()
        .limit("file", 8.mebibytes())
        .limit("data-form", 8.mebibytes())
}
