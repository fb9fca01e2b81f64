use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::package::TrackingError;
use crate::metrics::Metrics;

// ============================================================================
// HTTP Error Mapping
// ============================================================================
//
// Validation → 400, Conflict → 409, NotFound → 404, anything else → 500.
// Extractor failures (bad JSON, non-numeric ids) are validation errors too.
//
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub timestamp: NaiveDateTime,
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ResponseError for TrackingError {
    fn status_code(&self) -> StatusCode {
        match self {
            TrackingError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackingError::Conflict(_) => StatusCode::CONFLICT,
            TrackingError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackingError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            TrackingError::Unexpected(e) => {
                tracing::error!(error = ?e, "❌ Unexpected failure while handling request");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorBody {
            timestamp: Utc::now().naive_utc(),
            status: status.as_u16(),
            error: self.category().to_string(),
            message,
        })
    }
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Request body must be JSON".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Malformed JSON request: {}", e),
        other => format!("Unreadable request body: {}", other),
    };
    rejected(TrackingError::Validation(message), req)
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    rejected(
        TrackingError::Validation(format!("Invalid path parameter: {}", err)),
        req,
    )
}

fn rejected(err: TrackingError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), error = %err, "Rejected request before reaching handler");
    if let Some(metrics) = req.app_data::<web::Data<Metrics>>() {
        metrics.record_error(&err);
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: TrackingError) -> (StatusCode, ErrorBody) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_status_mapping() {
        let (status, body) = body_of(TrackingError::Validation("Client name cannot be blank".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.status, 400);
        assert_eq!(body.error, "Validation Error");
        assert_eq!(body.message, "Client name cannot be blank");

        let (status, body) = body_of(TrackingError::Conflict("taken".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "Business Rule Violation");

        let (status, body) = body_of(TrackingError::event_not_found(9)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Resource Not Found");
        assert_eq!(body.message, "Event with id '9' not found");
    }

    #[actix_web::test]
    async fn test_unexpected_hides_details() {
        let (status, body) =
            body_of(TrackingError::Unexpected(anyhow::anyhow!("connection reset by peer"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");
        assert!(!body.message.contains("connection reset"));
    }
}
