use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::menu::{MenuItemAttrs, MenuList},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::MenuItem,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    storage::ImageStore,
};

/// Public storefront listing: available items only, newest first.
pub async fn list_available(state: &AppState) -> AppResult<ApiResponse<MenuList>> {
    let items: Vec<MenuItem> = sqlx::query_as(
        "SELECT * FROM menu_items WHERE is_available = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Menu",
        MenuList { items },
        None,
    ))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item: MenuItem = sqlx::query_as("SELECT * FROM menu_items WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Menu item", item, None))
}

/// Admin listing: everything, paged, newest first.
pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<MenuList>> {
    ensure_admin(user)?;
    let (page, per_page, offset) = pagination.normalize();

    let items: Vec<MenuItem> =
        sqlx::query_as("SELECT * FROM menu_items ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(per_page)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;

    let (total,): (i64,) = sqlx::query_as("SELECT count(*) FROM menu_items")
        .fetch_one(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Menu items",
        MenuList { items },
        Some(Meta::paged(page, per_page, total)),
    ))
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    attrs: MenuItemAttrs,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let store = ImageStore::new(&state.config.upload_dir);

    let image_path = match &attrs.image {
        Some(upload) => Some(store.save(upload.extension, &upload.bytes).await?),
        None => None,
    };

    let result: Result<MenuItem, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO menu_items (id, name, description, price, stock, is_available, image)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&attrs.name)
    .bind(&attrs.description)
    .bind(attrs.price)
    .bind(attrs.stock)
    .bind(attrs.is_available)
    .bind(&image_path)
    .fetch_one(&state.pool)
    .await;

    let item = match result {
        Ok(item) => item,
        Err(err) => {
            // Don't leave an orphaned file behind when the insert fails.
            if let Some(path) = &image_path {
                if let Err(cleanup_err) = store.delete(path).await {
                    tracing::warn!(error = %cleanup_err, "failed to clean up image after insert error");
                }
            }
            return Err(err.into());
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_created",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item created",
        item,
        None,
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    attrs: MenuItemAttrs,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let store = ImageStore::new(&state.config.upload_dir);

    let existing: MenuItem = sqlx::query_as("SELECT * FROM menu_items WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;

    let image_path = match &attrs.image {
        Some(upload) => Some(store.save(upload.extension, &upload.bytes).await?),
        None => existing.image.clone(),
    };

    let result: Result<MenuItem, sqlx::Error> = sqlx::query_as(
        r#"
        UPDATE menu_items
        SET name = $2, description = $3, price = $4, stock = $5,
            is_available = $6, image = $7, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&attrs.name)
    .bind(&attrs.description)
    .bind(attrs.price)
    .bind(attrs.stock)
    .bind(attrs.is_available)
    .bind(&image_path)
    .fetch_one(&state.pool)
    .await;

    let item = match result {
        Ok(item) => item,
        Err(err) => {
            // Don't leave an orphaned file behind when the update fails.
            if attrs.image.is_some() {
                if let Some(path) = &image_path {
                    if let Err(cleanup_err) = store.delete(path).await {
                        tracing::warn!(error = %cleanup_err, "failed to clean up image after update error");
                    }
                }
            }
            return Err(err.into());
        }
    };

    // A replaced image's previous file must not linger in blob storage.
    if attrs.image.is_some() {
        if let Some(old) = &existing.image {
            if let Err(err) = store.delete(old).await {
                tracing::warn!(error = %err, "failed to delete replaced image");
            }
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_updated",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item updated",
        item,
        None,
    ))
}

/// Deletes the stored image first, then the row. Historical order lines keep
/// a NULL menu reference thanks to the weak foreign key.
pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let store = ImageStore::new(&state.config.upload_dir);

    let existing: MenuItem = sqlx::query_as("SELECT * FROM menu_items WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(image) = &existing.image {
        store.delete(image).await?;
    }

    sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_deleted",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item deleted",
        serde_json::json!({}),
        None,
    ))
}
