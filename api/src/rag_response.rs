use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use faq_rag::RagError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
}

/// Maps pipeline failures onto the HTTP contract: caller mistakes are 400,
/// everything else is 500 with the error message passed through.
#[derive(Debug)]
pub struct ApiError(pub RagError);

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            log::error!("Failed to answer question: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
