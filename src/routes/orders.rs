use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::orders::{OrderDetail, PlaceOrderRequest, PlaceOrderResponse},
    error::AppResult,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/{code}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order created; pay via the WhatsApp link", body = ApiResponse<PlaceOrderResponse>),
        (status = 404, description = "Unknown menu item"),
        (status = 422, description = "Validation failure or insufficient stock"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PlaceOrderResponse>>)> {
    let resp = order_service::place_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{code}",
    params(
        ("code" = String, Path, description = "Order code, e.g. ORD-AB12CD34")
    ),
    responses(
        (status = 200, description = "Order detail with a fresh WhatsApp link", body = ApiResponse<OrderDetail>),
        (status = 404, description = "No order with that code"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let resp = order_service::get_order_by_code(&state, &code).await?;
    Ok(Json(resp))
}
