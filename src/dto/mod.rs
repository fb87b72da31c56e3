pub mod auth;
pub mod menu;
pub mod messages;
pub mod orders;
