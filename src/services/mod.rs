pub mod auth_service;
pub mod dashboard_service;
pub mod menu_service;
pub mod message_service;
pub mod order_service;
