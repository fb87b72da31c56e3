use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::messages::ContactRequest,
    error::AppResult,
    models::ContactMessage,
    response::ApiResponse,
    services::message_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_message))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message stored", body = ApiResponse<ContactMessage>),
        (status = 422, description = "Validation failure"),
    ),
    tag = "Contact"
)]
pub async fn create_message(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ContactMessage>>)> {
    let resp = message_service::create_message(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
