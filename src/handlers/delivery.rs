use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{error::Result, handlers::AppState};

/// Get all deliveries handler
pub async fn get_all_deliveries(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let deliveries = state.deliveries.get_all().await?;
    Ok((StatusCode::OK, Json(deliveries)))
}

/// Deliveries spawned by one shipment
pub async fn get_shipment_deliveries(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    // 404 for unknown shipments rather than an empty list
    state.shipments.get_by_id(&id).await?;
    let deliveries = state.deliveries.get_by_shipment(&id).await?;
    Ok((StatusCode::OK, Json(deliveries)))
}

/// Get delivery by ID handler
pub async fn get_delivery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let delivery = state.deliveries.get_by_id(&id).await?;
    Ok((StatusCode::OK, Json(delivery)))
}
