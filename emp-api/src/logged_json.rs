//! JSON data guard that logs each accepted request body.
//!
//! Create and update endpoints take `LoggedJson<T>` instead of `Json<T>` so
//! every write leaves a trace of what the client sent.

use rocket::data::{self, FromData};
use rocket::serde::json::Json;
use rocket::{Data, Request};
use serde::{Deserialize, Serialize};

pub struct LoggedJson<T>(pub T);

impl<T> LoggedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for LoggedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r, T: Deserialize<'r> + Serialize> FromData<'r> for LoggedJson<T> {
    type Error = rocket::serde::json::Error<'r>;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        Json::<T>::from_data(req, data).await.map(|Json(body)| {
            let rendered = serde_json::to_string(&body)
                .unwrap_or_else(|_| "<unserializable>".to_string());
            info!("{} {} body: {}", req.method(), req.uri().path(), rendered);
            LoggedJson(body)
        })
    }
}
