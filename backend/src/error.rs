use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::{ErrorCode, ErrorResponse};
use thiserror::Error;

use crate::processor::VoteError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("URL id {path} does not match request body id {body}")]
    IdMismatch { path: u32, body: u32 },
    #[error(transparent)]
    Vote(#[from] VoteError),
}

impl ApiError {
    fn status_and_code(&self) -> (Status, ErrorCode) {
        match self {
            ApiError::IdMismatch { .. } => (Status::BadRequest, ErrorCode::InvalidInput),
            ApiError::Vote(e) => match e {
                VoteError::Validation(_) => (Status::UnprocessableEntity, ErrorCode::ValidationFailed),
                VoteError::NotFound(_) => (Status::NotFound, ErrorCode::NotFound),
                VoteError::Duplicate(_) => (Status::Conflict, ErrorCode::Conflict),
                VoteError::HistoryPropagationFailed { .. } => (Status::BadGateway, ErrorCode::UpstreamFailed),
                VoteError::CompensationFailed { .. } => (Status::InternalServerError, ErrorCode::Inconsistent),
                VoteError::PartialDelete { .. } if e.is_inconsistent() => {
                    (Status::InternalServerError, ErrorCode::Inconsistent)
                }
                VoteError::PartialDelete { .. } => (Status::InternalServerError, ErrorCode::UpstreamFailed),
                VoteError::Store(_) => (Status::InternalServerError, ErrorCode::SystemError),
            },
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let (status, code) = self.status_and_code();
        let body = Json(ErrorResponse::new(code, status.code, self.to_string()));

        rocket::Response::build_from(body.respond_to(req)?)
            .status(status)
            .ok()
    }
}
