pub mod audit;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod ordercode;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod whatsapp;
