//! HTTP mapping for [`Error`]: every failure becomes a JSON body
//! `{ "message": ... }` (plus `field` for validation failures).

use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;

use crate::error::Error;

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. }
            | Error::DuplicateEmail
            | Error::InvalidCredentials
            | Error::PasswordMismatch
            | Error::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Error::Internal(e) = self {
            log::error!("request failed: {e:?}");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
            field: self.field(),
        })
    }
}

/// `JsonConfig` hook: undecodable bodies become field-level validation errors.
pub fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::validation("body", err.to_string()).into()
}
