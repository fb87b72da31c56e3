use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::messages::ContactRequest,
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::ContactMessage,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Public contact form.
pub async fn create_message(
    state: &AppState,
    payload: ContactRequest,
) -> AppResult<ApiResponse<ContactMessage>> {
    payload.validate()?;

    let message: ContactMessage = sqlx::query_as(
        r#"
        INSERT INTO messages (id, name, email, whatsapp, subject, message)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.whatsapp)
    .bind(&payload.subject)
    .bind(&payload.message)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Message sent successfully",
        message,
        None,
    ))
}

/// Admin inbox, newest first.
pub async fn list_messages(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<Vec<ContactMessage>>> {
    ensure_admin(user)?;
    let (page, per_page, offset) = pagination.normalize();

    let messages: Vec<ContactMessage> =
        sqlx::query_as("SELECT * FROM messages ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(per_page)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;

    let (total,): (i64,) = sqlx::query_as("SELECT count(*) FROM messages")
        .fetch_one(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Messages",
        messages,
        Some(Meta::paged(page, per_page, total)),
    ))
}
