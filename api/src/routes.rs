use crate::answer_payload::AnswerPayload;
use crate::rag_response::{AnswerResponse, ApiError, HealthResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use faq_rag::{QueryService, RagError};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService>,
    pub record_count: usize,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/get-answer", post(get_answer))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn get_answer(
    State(state): State<AppState>,
    payload: Result<Json<AnswerPayload>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let question = match payload {
        Ok(Json(payload)) => payload.into_question()?,
        Err(rejection) => {
            log::warn!("Rejected request body: {}", rejection);
            return Err(RagError::MissingQuestion.into());
        }
    };

    log::info!("Answering question: {}", question);
    let answer = state.query_service.answer(&question).await?;
    Ok(Json(AnswerResponse { answer }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        records: state.record_count,
    })
}
