use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod contact;
pub mod doc;
pub mod health;
pub mod menu;
pub mod orders;
pub mod params;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/orders", orders::router())
        .nest("/contact", contact::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
