use rocket::{Request, catch, serde::json::Json};
use shared::{ErrorCode, ErrorResponse};
use tracing::debug;

use crate::routes::AppState;

/// Requests rejected before reaching a handler still count as failed calls.
fn record_failure(req: &Request) {
    debug!("{} {} rejected before reaching a handler", req.method(), req.uri());
    if let Some(state) = req.rocket().state::<AppState>() {
        state.metrics.record_failure();
    }
}

#[catch(400)]
pub fn bad_request(req: &Request) -> Json<ErrorResponse> {
    record_failure(req);
    Json(ErrorResponse::new(ErrorCode::InvalidInput, 400, "Invalid request parameters."))
}

#[catch(404)]
pub fn not_found(req: &Request) -> Json<ErrorResponse> {
    record_failure(req);
    Json(ErrorResponse::new(ErrorCode::NotFound, 404, "The requested resource was not found."))
}

#[catch(422)]
pub fn unprocessable_entity(req: &Request) -> Json<ErrorResponse> {
    record_failure(req);
    let error_msg = match req.uri().path().segments().next() {
        Some("votes") => "Request body is not a valid vote.",
        _ => "Request could not be processed."
    };

    Json(ErrorResponse::new(ErrorCode::InvalidInput, 422, error_msg))
}

#[catch(500)]
pub fn internal_error(req: &Request) -> Json<ErrorResponse> {
    record_failure(req);
    Json(ErrorResponse::new(ErrorCode::SystemError, 500, "An internal server error occurred."))
}
