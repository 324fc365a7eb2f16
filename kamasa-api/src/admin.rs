use axum::{
    extract::{Path, State},
    routing::put,
    Json, Router,
};
use kamasa_catalog::{parse_schedule_rows, RawScheduleRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/v1/admin/products/{id}/volume-schedule",
        put(put_volume_schedule),
    )
}

#[derive(Debug, Deserialize)]
pub struct VolumeScheduleRequest {
    /// Raw data-entry rows exactly as submitted by the admin form.
    pub rows: Vec<RawScheduleRow>,
}

#[derive(Debug, Serialize)]
pub struct VolumeScheduleResponse {
    pub submitted: usize,
    /// Rows that survived validation and were persisted.
    pub persisted: usize,
}

/// PUT /v1/admin/products/{id}/volume-schedule
///
/// The validating parser is the only path by which a schedule is persisted;
/// blank, non-numeric and inverted rows are dropped silently.
async fn put_volume_schedule(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<VolumeScheduleRequest>,
) -> Result<Json<VolumeScheduleResponse>, AppError> {
    let submitted = req.rows.len();
    let schedule = parse_schedule_rows(&req.rows);
    let persisted = schedule.len();

    if !state.catalog.set_volume_schedule(product_id, schedule) {
        return Err(AppError::NotFoundError(format!(
            "Product not found: {product_id}"
        )));
    }

    tracing::info!(%product_id, submitted, persisted, "volume schedule updated");
    Ok(Json(VolumeScheduleResponse {
        submitted,
        persisted,
    }))
}
