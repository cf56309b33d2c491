use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::identity::CallerIdentity;
use crate::errors::AppError;

/// Header the gateway sets after authenticating the caller.
pub const USER_HEADER: &str = "X-User";

impl FromRequest for CallerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .headers()
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok());
        ready(CallerIdentity::from_trusted(user).map_err(AppError::from))
    }
}
