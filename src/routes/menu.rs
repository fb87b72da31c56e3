use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::menu::MenuList,
    error::AppResult,
    models::MenuItem,
    response::ApiResponse,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu))
        .route("/{id}", get(get_menu_item))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "Available menu items, newest first", body = ApiResponse<MenuList>)
    ),
    tag = "Menu"
)]
pub async fn list_menu(State(state): State<AppState>) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_available(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item detail", body = ApiResponse<MenuItem>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Menu"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::get_menu_item(&state, id).await?;
    Ok(Json(resp))
}
