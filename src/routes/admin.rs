use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        menu::{ImageUpload, MenuItemForm, MenuList},
        orders::{AdminOrderList, UpdateOrderStatusRequest},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ContactMessage, MenuItem, Order},
    response::ApiResponse,
    routes::params::{OrderListQuery, Pagination},
    services::{dashboard_service, menu_service, message_service, order_service},
    state::AppState,
    storage,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard))
        .route("/menu", get(list_menu))
        .route("/menu", post(create_menu_item))
        .route("/menu/{id}", put(update_menu_item))
        .route("/menu/{id}", delete(delete_menu_item))
        .route("/orders", get(list_orders))
        .route("/orders/export", get(export_orders))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/messages", get(list_messages))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard stats and recent orders", body = ApiResponse<dashboard_service::Dashboard>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<dashboard_service::Dashboard>>> {
    let resp = dashboard_service::overview(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 5"),
    ),
    responses(
        (status = 200, description = "All menu items, newest first", body = ApiResponse<MenuList>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_all(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu",
    responses(
        (status = 201, description = "Menu item created", body = ApiResponse<MenuItem>),
        (status = 400, description = "Bad form data"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItem>>)> {
    let attrs = parse_menu_form(multipart)
        .await?
        .validate()
        .map_err(AppError::BadRequest)?;
    let resp = menu_service::create_menu_item(&state, &user, attrs).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<MenuItem>),
        (status = 400, description = "Bad form data"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let attrs = parse_menu_form(multipart)
        .await?
        .validate()
        .map_err(AppError::BadRequest)?;
    let resp = menu_service::update_menu_item(&state, &user, id, attrs).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/{id}",
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_menu_item(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 5"),
        ("status" = Option<String>, Query, description = "Filter by status"),
    ),
    responses(
        (status = 200, description = "Orders with aggregate stats", body = ApiResponse<AdminOrderList>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<AdminOrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/export",
    responses(
        (status = 200, description = "CSV export of every order, newest first"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn export_orders(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    let (filename, bytes) = order_service::export_orders_csv(&state, &user).await?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        ),
    ];
    Ok((headers, bytes).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/messages",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 5"),
    ),
    responses(
        (status = 200, description = "Contact inbox, newest first", body = ApiResponse<Vec<ContactMessage>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<Vec<ContactMessage>>>> {
    let resp = message_service::list_messages(&state, &user, pagination).await?;
    Ok(Json(resp))
}

/// Assemble a `MenuItemForm` from a multipart stream. An image part must be
/// jpeg or png and within the 2 MiB cap.
async fn parse_menu_form(mut multipart: Multipart) -> AppResult<MenuItemForm> {
    let mut form = MenuItemForm {
        is_available: true,
        ..MenuItemForm::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => {
                form.name = Some(text_field(field).await?);
            }
            "description" => {
                let text = text_field(field).await?;
                form.description = (!text.is_empty()).then_some(text);
            }
            "price" => {
                let text = text_field(field).await?;
                let price = text
                    .parse::<i64>()
                    .map_err(|_| AppError::BadRequest("price must be an integer".into()))?;
                form.price = Some(price);
            }
            "stock" => {
                let text = text_field(field).await?;
                let stock = text
                    .parse::<i32>()
                    .map_err(|_| AppError::BadRequest("stock must be an integer".into()))?;
                form.stock = Some(stock);
            }
            "is_available" => {
                let text = text_field(field).await?;
                form.is_available = match text.as_str() {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => {
                        return Err(AppError::BadRequest(
                            "is_available must be a boolean".into(),
                        ));
                    }
                };
            }
            "image" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let extension = storage::extension_for(&content_type).ok_or_else(|| {
                    AppError::BadRequest("image must be jpeg or png".into())
                })?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;
                if bytes.len() > storage::MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest(format!(
                        "image exceeds the {} KiB limit",
                        storage::MAX_IMAGE_BYTES / 1024
                    )));
                }
                form.image = Some(ImageUpload {
                    extension,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))
}
