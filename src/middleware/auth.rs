//! Middleware de autenticación
//!
//! Todas las rutas `/api` exigen el token compartido `API_TOKEN`, enviado como
//! `Authorization: Bearer <token>` o en la cookie `token`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use subtle::ConstantTimeEq;

use crate::state::AppState;
use crate::utils::errors::AppError;

/// Nombre de la cookie alternativa al header
pub const TOKEN_COOKIE: &str = "token";

/// Extrae el token de un header `Authorization` con esquema Bearer (sin distinguir mayúsculas)
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn tokens_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Rechaza con 401 toda petición sin el token configurado.
/// Si `API_TOKEN` no está configurado no pasa ninguna petición.
pub async fn require_api_token(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.api_token.as_deref() else {
        tracing::warn!("🔒 API_TOKEN no configurado; petición rechazada");
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    };

    let from_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);
    let provided = from_header.or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()));

    match provided {
        Some(token) if tokens_match(&token, expected) => Ok(next.run(request).await),
        _ => Err(AppError::Unauthorized("Unauthorized".to_string())),
    }
}
