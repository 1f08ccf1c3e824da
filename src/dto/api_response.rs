use serde::Serialize;

/// Respuesta estándar `{ ok: true, data }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Respuesta sin cuerpo `{ ok: true }`
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Respuesta de las exportaciones `{ ok: true, url }`
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub ok: bool,
    pub url: String,
}

impl UrlResponse {
    pub fn new(url: String) -> Self {
        Self { ok: true, url }
    }
}
