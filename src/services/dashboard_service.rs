use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    /// Revenue from completed orders only.
    pub total_sales: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
}

/// Back-office landing page numbers plus the most recent orders.
pub async fn overview(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<Dashboard>> {
    ensure_admin(user)?;
    let (page, per_page, offset) = pagination.normalize();

    let (total_products,): (i64,) = sqlx::query_as("SELECT count(*) FROM menu_items")
        .fetch_one(&state.pool)
        .await?;

    let (total_orders, total_sales): (i64, i64) = sqlx::query_as(
        r#"
        SELECT count(*),
               COALESCE(sum(total_price) FILTER (WHERE status = 'completed'), 0)::BIGINT
        FROM orders
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let recent_orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(per_page)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "Dashboard",
        Dashboard {
            stats: DashboardStats {
                total_products,
                total_orders,
                total_sales,
            },
            recent_orders,
        },
        Some(Meta::paged(page, per_page, total_orders)),
    ))
}
