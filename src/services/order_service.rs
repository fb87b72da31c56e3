use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::log_audit,
    dto::orders::{
        AdminOrder, AdminOrderList, OrderDetail, OrderItemView, OrderStats, PlaceOrderRequest,
        PlaceOrderResponse, UpdateOrderStatusRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{MenuItem, Order, OrderStatus},
    ordercode,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
    whatsapp::{self, OrderSummary, SummaryLine},
};

/// Shown in place of a menu item that was deleted after the order was placed.
const DELETED_ITEM_PLACEHOLDER: &str = "(deleted item)";

/// The order placement workflow. Validation and existence checks run before
/// any transaction; once the transaction is open, every line locks its menu
/// row with `FOR UPDATE` so concurrent placements against the same item
/// serialize instead of racing on stock. Any failure rolls the whole order
/// back, including stock decrements from earlier lines.
pub async fn place_order(
    state: &AppState,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<PlaceOrderResponse>> {
    payload.validate()?;

    let requested_ids: Vec<Uuid> = payload.items.iter().map(|line| line.menu_item_id).collect();
    let known: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM menu_items WHERE id = ANY($1)")
        .bind(&requested_ids)
        .fetch_all(&state.pool)
        .await?;
    for id in &requested_ids {
        if !known.iter().any(|(known_id,)| known_id == id) {
            return Err(AppError::NotFound);
        }
    }

    let mut tx = state.pool.begin().await?;

    // The order row is created up front so line items have a target id; the
    // placeholder total is corrected after the lines are priced.
    let order_code = ordercode::generate();
    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders
            (id, order_code, customer_name, customer_email, customer_phone,
             customer_address, payment_method, status, total_price)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&order_code)
    .bind(&payload.customer_name)
    .bind(&payload.customer_email)
    .bind(&payload.customer_phone)
    .bind(&payload.customer_address)
    .bind(payload.payment_method.as_str())
    .bind(OrderStatus::Pending.as_str())
    .fetch_one(&mut *tx)
    .await?;

    let mut total: i64 = 0;
    let mut lines: Vec<SummaryLine> = Vec::with_capacity(payload.items.len());

    for line in &payload.items {
        let item: MenuItem = sqlx::query_as("SELECT * FROM menu_items WHERE id = $1 FOR UPDATE")
            .bind(line.menu_item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound)?;

        if !item.is_available {
            return Err(AppError::BadRequest(format!(
                "{} is not available for purchase",
                item.name
            )));
        }
        if item.stock < line.quantity {
            return Err(AppError::InsufficientStock { item: item.name });
        }

        sqlx::query("UPDATE menu_items SET stock = stock - $2, updated_at = now() WHERE id = $1")
            .bind(item.id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

        let subtotal = item.price * i64::from(line.quantity);
        total += subtotal;

        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, menu_item_id, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(item.id)
        .bind(line.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;

        lines.push(SummaryLine {
            name: item.name,
            quantity: line.quantity,
            subtotal,
        });
    }

    let total_with_shipping = total + state.config.shipping_fee;
    sqlx::query("UPDATE orders SET total_price = $2, updated_at = now() WHERE id = $1")
        .bind(order.id)
        .bind(total_with_shipping)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let summary = OrderSummary {
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        customer_address: payload.customer_address,
        payment_method: payload.payment_method.as_str().to_string(),
        lines,
        shipping_fee: state.config.shipping_fee,
        total: total_with_shipping,
    };
    let message = whatsapp::confirmation_message(&summary);
    let whatsapp_url = whatsapp::deep_link(&state.config.admin_contact, &message);

    tracing::info!(order_code = %order_code, total = total_with_shipping, "order placed");
    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_placed",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "order_code": &order_code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order ready to send to WhatsApp",
        PlaceOrderResponse {
            order_code,
            whatsapp_url,
        },
        None,
    ))
}

/// Public order lookup. The order code is the capability: anyone holding it
/// can read the order, so there is no auth here.
pub async fn get_order_by_code(state: &AppState, code: &str) -> AppResult<ApiResponse<OrderDetail>> {
    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE order_code = $1")
        .bind(code)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = fetch_item_views(state, &[order.id])
        .await?
        .remove(&order.id)
        .unwrap_or_default();

    let message = whatsapp::status_message(&order.order_code, &order.customer_name, order.total_price);
    let whatsapp_url = whatsapp::deep_link(&state.config.admin_contact, &message);

    Ok(ApiResponse::success(
        "OK",
        OrderDetail {
            order,
            items,
            whatsapp_url,
        },
        None,
    ))
}

/// Admin listing with aggregate stats attached. Stats are computed over the
/// whole ledger, not the filtered page.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<AdminOrderList>> {
    ensure_admin(user)?;

    let (page, per_page, offset) = query.normalize();
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(AppError::BadRequest)?,
        ),
        None => None,
    };

    let (orders, total): (Vec<Order>, i64) = match status {
        Some(status) => {
            let orders = sqlx::query_as(
                "SELECT * FROM orders WHERE status = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(status.as_str())
            .bind(per_page)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;
            let (total,): (i64,) = sqlx::query_as("SELECT count(*) FROM orders WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&state.pool)
                .await?;
            (orders, total)
        }
        None => {
            let orders =
                sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                    .bind(per_page)
                    .bind(offset)
                    .fetch_all(&state.pool)
                    .await?;
            let (total,): (i64,) = sqlx::query_as("SELECT count(*) FROM orders")
                .fetch_one(&state.pool)
                .await?;
            (orders, total)
        }
    };

    let order_ids: Vec<Uuid> = orders.iter().map(|order| order.id).collect();
    let mut item_views = fetch_item_views(state, &order_ids).await?;

    let orders = orders
        .into_iter()
        .map(|order| {
            let items = item_views.remove(&order.id).unwrap_or_default();
            AdminOrder { order, items }
        })
        .collect();

    let stats = aggregate_stats(state).await?;

    Ok(ApiResponse::success(
        "Orders",
        AdminOrderList { orders, stats },
        Some(Meta::paged(page, per_page, total)),
    ))
}

/// Revenue and status-bucket counts over the whole ledger. The processing
/// bucket is everything not completed and not cancelled, so the three buckets
/// always sum to the total.
pub async fn aggregate_stats(state: &AppState) -> AppResult<OrderStats> {
    let row: (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            count(*),
            count(*) FILTER (WHERE status = 'completed'),
            count(*) FILTER (WHERE status = 'cancelled'),
            COALESCE(sum(total_price) FILTER (WHERE status = 'completed'), 0)::BIGINT
        FROM orders
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let (total_count, completed_count, cancelled_count, total_revenue) = row;
    Ok(OrderStats {
        total_revenue,
        total_count,
        completed_count,
        cancelled_count,
        processing_count: total_count - completed_count - cancelled_count,
    })
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    // Membership only: any status may be set from any status. Transition
    // legality is deliberately not enforced (admin corrections are allowed).
    let status = payload
        .status
        .parse::<OrderStatus>()
        .map_err(AppError::BadRequest)?;

    let order: Order = sqlx::query_as(
        "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound)?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_updated",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "status": status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order status updated",
        order,
        None,
    ))
}

/// Full CSV export, newest-first. This is an unbounded read; acceptable at
/// this system's scale.
pub async fn export_orders_csv(state: &AppState, user: &AuthUser) -> AppResult<(String, Vec<u8>)> {
    ensure_admin(user)?;

    let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(&state.pool)
        .await?;

    let bytes = render_export_csv(&orders)?;
    let filename = format!("sales-export-{}.csv", Utc::now().format("%d-%m-%Y"));
    Ok((filename, bytes))
}

pub fn render_export_csv(orders: &[Order]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "Order Code",
            "Customer",
            "Email",
            "Phone",
            "Address",
            "Payment Method",
            "Status",
            "Total Price",
            "Date",
        ])
        .map_err(anyhow::Error::new)?;

    for order in orders {
        writer
            .write_record(&[
                order.order_code.clone(),
                order.customer_name.clone(),
                order.customer_email.clone().unwrap_or_default(),
                order.customer_phone.clone(),
                order.customer_address.clone(),
                order.payment_method.to_uppercase(),
                order.status.to_uppercase(),
                order.total_price.to_string(),
                order.created_at.format("%d-%m-%Y %H:%M").to_string(),
            ])
            .map_err(anyhow::Error::new)?;
    }

    writer
        .into_inner()
        .map_err(|err| AppError::Internal(anyhow::anyhow!("flushing csv: {err}")))
}

/// Line items for a set of orders with the menu name resolved through a LEFT
/// JOIN, so lines survive catalog deletion with a placeholder name.
async fn fetch_item_views(
    state: &AppState,
    order_ids: &[Uuid],
) -> AppResult<ItemViewResult> {
    if order_ids.is_empty() {
        return Ok(ItemViewResult::default());
    }

    #[derive(sqlx::FromRow)]
    struct ItemRow {
        id: Uuid,
        order_id: Uuid,
        menu_item_id: Option<Uuid>,
        quantity: i32,
        price: i64,
        menu_name: Option<String>,
    }

    let rows: Vec<ItemRow> = sqlx::query_as(
        r#"
        SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, oi.price,
               m.name AS menu_name
        FROM order_items oi
        LEFT JOIN menu_items m ON m.id = oi.menu_item_id
        WHERE oi.order_id = ANY($1)
        ORDER BY oi.created_at
        "#,
    )
    .bind(order_ids)
    .fetch_all(&state.pool)
    .await?;

    let mut grouped = ItemViewResult::default();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(OrderItemView {
            id: row.id,
            menu_item_id: row.menu_item_id,
            menu_name: row
                .menu_name
                .unwrap_or_else(|| DELETED_ITEM_PLACEHOLDER.to_string()),
            quantity: row.quantity,
            price: row.price,
            subtotal: row.price * i64::from(row.quantity),
        });
    }
    Ok(grouped)
}

type ItemViewResult = std::collections::HashMap<Uuid, Vec<OrderItemView>>;
