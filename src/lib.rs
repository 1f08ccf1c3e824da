//! Control de portería
//!
//! API JSON para registrar personas, vehículos y autorizaciones de una
//! empresa, y controlar las entradas y salidas de visitas en su filial.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
