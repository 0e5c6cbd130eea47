use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{ReceiptId, ReceiptSubmission};
use super::service::{ReceiptService, ReceiptServiceError};
use super::store::{ReceiptStore, StoreError};
use super::validation::ValidationFailureView;

/// Router builder exposing receipt submission, point lookup, and the debug table dump.
pub fn receipt_router<S>(service: Arc<ReceiptService<S>>) -> Router
where
    S: ReceiptStore + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<S>))
        .route("/receipts/:id/points", get(points_handler::<S>))
        .route("/db", get(database_handler::<S>))
        .with_state(service)
}

pub(crate) async fn process_handler<S>(
    State(service): State<Arc<ReceiptService<S>>>,
    payload: Result<axum::Json<ReceiptSubmission>, JsonRejection>,
) -> Response
where
    S: ReceiptStore + 'static,
{
    let submission = match payload {
        Ok(axum::Json(submission)) => submission,
        Err(rejection) => return invalid_payload(rejection),
    };

    match service.process(submission) {
        Ok(processed) => (StatusCode::OK, axum::Json(processed)).into_response(),
        Err(ReceiptServiceError::Validation(errors)) => {
            let payload = json!({
                "error": errors.to_string(),
                "errors": errors.views(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn points_handler<S>(
    State(service): State<Arc<ReceiptService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: ReceiptStore + 'static,
{
    let id = ReceiptId(id);
    match service.points(&id) {
        Ok(points) => (StatusCode::OK, axum::Json(json!({ "points": points }))).into_response(),
        Err(ReceiptServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({
                "error": "That receipt does not exist.",
                "id": id,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn database_handler<S>(State(service): State<Arc<ReceiptService<S>>>) -> Response
where
    S: ReceiptStore + 'static,
{
    match service.snapshot() {
        Ok(database) => {
            (StatusCode::OK, axum::Json(json!({ "database": database }))).into_response()
        }
        Err(other) => internal_error(other),
    }
}

/// Answers undecodable bodies with 400 in the validation failure shape.
fn invalid_payload(rejection: JsonRejection) -> Response {
    let message = rejection.body_text();
    tracing::warn!(status = %rejection.status(), %message, "receipt payload rejected");
    let failure = ValidationFailureView {
        code: "invalid_payload",
        field: None,
        message: message.clone(),
    };
    let payload = json!({ "error": message, "errors": [failure] });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn internal_error(error: ReceiptServiceError) -> Response {
    tracing::error!(%error, "receipt store failure");
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
