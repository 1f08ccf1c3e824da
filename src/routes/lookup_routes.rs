use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::LookupController;
use crate::dto::lookup_dto::PlateLookup;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_lookup_router() -> Router<AppState> {
    Router::new().route("/plate/:plate", get(lookup_plate))
}

/// La respuesta va sin el envoltorio `ok`: el cliente discrimina por `type`
async fn lookup_plate(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> Result<Json<PlateLookup>, AppError> {
    let controller = LookupController::new(&state);
    let result = controller.lookup_plate(&plate).await?;
    Ok(Json(result))
}
