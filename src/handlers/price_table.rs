use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{AppError, Result},
    handlers::AppState,
    models::price_table::PriceTableInput,
};

/// Get all price tables handler
pub async fn get_all_price_tables(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let tables = state.price_tables.get_all().await?;
    Ok((StatusCode::OK, Json(tables)))
}

/// Get price table by ID handler
pub async fn get_price_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let table = state.price_tables.get_by_id(&id).await?;
    Ok((StatusCode::OK, Json(table)))
}

/// Create or update price table handler
pub async fn save_price_table(
    State(state): State<AppState>,
    Json(input): Json<PriceTableInput>,
) -> Result<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("price table name is required".into()));
    }
    if !input.multiplier.is_finite() || input.multiplier <= 0.0 {
        return Err(AppError::Validation(
            "price table multiplier must be positive".into(),
        ));
    }

    let table = input.into_price_table(state.clock.now());
    let saved = state.price_tables.save(&table).await?;
    Ok((StatusCode::OK, Json(saved)))
}

/// Delete price table handler
pub async fn delete_price_table(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.price_tables.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
