//! Request guards describing where a request was addressed.

use std::convert::Infallible;

use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

/// Scheme and authority the client used, e.g. `http://localhost:8000`.
///
/// Empty when the request carried no `Host` header, in which case URLs built
/// on top of it stay relative (`/photos/default.png`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrl(pub String);

impl BaseUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins an absolute path onto the base.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BaseUrl {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        // Local requests carry the header without a parsed host.
        let host = request
            .host()
            .map(|host| host.to_string())
            .or_else(|| request.headers().get_one("Host").map(str::to_string))
            .filter(|host| !host.is_empty());
        let base = match host {
            Some(host) => {
                let scheme = match request.headers().get_one("X-Forwarded-Proto") {
                    Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
                    _ => "http",
                };
                format!("{}://{}", scheme, host)
            }
            None => String::new(),
        };
        Outcome::Success(BaseUrl(base))
    }
}
