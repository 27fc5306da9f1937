use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::Result,
    handlers::AppState,
    models::budget::{Budget, BudgetInput},
    pricing,
};

/// Price a budget without saving it
pub async fn quote_budget(
    State(state): State<AppState>,
    Json(input): Json<BudgetInput>,
) -> Result<impl IntoResponse> {
    let table = state.price_tables.get_by_id(&input.price_table_id).await?;
    let quote = pricing::quote(&input, &table)?;
    Ok((StatusCode::OK, Json(quote)))
}

/// Create budget handler. The total is always recomputed from the inputs.
pub async fn create_budget(
    State(state): State<AppState>,
    Json(input): Json<BudgetInput>,
) -> Result<impl IntoResponse> {
    let table = state.price_tables.get_by_id(&input.price_table_id).await?;
    let quote = pricing::quote(&input, &table)?;

    let budget = Budget {
        id: uuid::Uuid::new_v4().to_string(),
        client_id: input.client_id,
        price_table_id: table.id,
        delivery_type: input.delivery_type,
        merchandise_value: input.merchandise_value,
        has_collection: input.has_collection,
        has_delivery: input.has_delivery,
        packages: input.packages,
        additional_services: input.additional_services,
        total_volumes: quote.total_volumes,
        total_value: quote.total_value,
        notes: input.notes,
        created_at: state.clock.now(),
    };

    let saved = state.budgets.insert(&budget).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Get all budgets handler
pub async fn get_all_budgets(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let budgets = state.budgets.get_all().await?;
    Ok((StatusCode::OK, Json(budgets)))
}

/// Get budget by ID handler
pub async fn get_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let budget = state.budgets.get_by_id(&id).await?;
    Ok((StatusCode::OK, Json(budget)))
}

/// Delete budget handler
pub async fn delete_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.budgets.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
