//! Services module
//!
//! Este módulo contiene la lógica de negocio que no pertenece a un solo
//! repositorio: resolución de entidades por clave natural y generación de reportes.

pub mod ensure_service;
pub mod report_service;

pub use ensure_service::{ensure_person, ensure_vehicle};
pub use report_service::ReportRenderer;
