use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{AppError, Result},
    handlers::AppState,
    lifecycle::{RetentionInput, StatusChangeRequest, derived_status},
    models::shipment::{Shipment, ShipmentInput},
};

/// Shipments are always reported with their derived status
fn present(mut shipment: Shipment) -> Shipment {
    shipment.status = derived_status(&shipment);
    shipment
}

/// Get all shipments handler
pub async fn get_all_shipments(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let shipments: Vec<Shipment> = state
        .shipments
        .get_all()
        .await?
        .into_iter()
        .map(present)
        .collect();
    Ok((StatusCode::OK, Json(shipments)))
}

/// Get shipment by ID handler
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let shipment = state.shipments.get_by_id(&id).await?;
    Ok((StatusCode::OK, Json(present(shipment))))
}

/// Create shipment handler
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(input): Json<ShipmentInput>,
) -> Result<impl IntoResponse> {
    if input.client_id.trim().is_empty() {
        return Err(AppError::Validation("client is required".into()));
    }
    if input.tracking_number.trim().is_empty() {
        return Err(AppError::Validation("tracking number is required".into()));
    }

    let shipment = input.into_shipment(state.clock.now());
    let saved = state.shipments.insert(&shipment).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Delete shipment handler
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.shipments.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Status change handler
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse> {
    let outcome = state.lifecycle.change_status(&id, request).await?;
    Ok((StatusCode::OK, Json(outcome)))
}

/// Replace the fiscal action of a retained shipment
pub async fn update_fiscal_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RetentionInput>,
) -> Result<impl IntoResponse> {
    let shipment = state.lifecycle.update_fiscal_action(&id, input).await?;
    Ok((StatusCode::OK, Json(present(shipment))))
}
