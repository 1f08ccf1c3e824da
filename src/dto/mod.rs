//! DTOs de la API
//!
//! Cuerpos de petición (con su esquema de validación) y formas de respuesta.

pub mod api_response;
pub mod authorized_dto;
pub mod lookup_dto;
pub mod person_dto;
pub mod vehicle_dto;
pub mod vehicle_person_dto;
pub mod visit_dto;

pub use api_response::{ApiResponse, OkResponse, UrlResponse};
