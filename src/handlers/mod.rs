use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    db::{BudgetStore, DbPool, DeliveryStore, PriceTableStore, ShipmentStore},
    lifecycle::{Clock, ShipmentLifecycle, SystemClock},
    ws::{ConnectionManager, SharedConnectionManager},
};

pub mod budget;
pub mod delivery;
pub mod price_table;
pub mod shipment;
pub mod ws;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub price_tables: PriceTableStore,
    pub budgets: BudgetStore,
    pub shipments: ShipmentStore,
    pub deliveries: DeliveryStore,
    pub lifecycle: Arc<ShipmentLifecycle>,
    pub connection_manager: SharedConnectionManager,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        let shipments = ShipmentStore::new(pool.clone());
        let deliveries = DeliveryStore::new(pool.clone());
        let connection_manager = Arc::new(ConnectionManager::new());
        let lifecycle = Arc::new(ShipmentLifecycle::new(
            Arc::new(shipments.clone()),
            Arc::new(deliveries.clone()),
            connection_manager.clone(),
            clock.clone(),
        ));

        Self {
            price_tables: PriceTableStore::new(pool.clone()),
            budgets: BudgetStore::new(pool),
            shipments,
            deliveries,
            lifecycle,
            connection_manager,
            clock,
        }
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/price-tables",
            get(price_table::get_all_price_tables).post(price_table::save_price_table),
        )
        .route(
            "/price-tables/{id}",
            get(price_table::get_price_table).delete(price_table::delete_price_table),
        )
        .route("/quotes", post(budget::quote_budget))
        .route(
            "/budgets",
            get(budget::get_all_budgets).post(budget::create_budget),
        )
        .route(
            "/budgets/{id}",
            get(budget::get_budget).delete(budget::delete_budget),
        )
        .route(
            "/shipments",
            get(shipment::get_all_shipments).post(shipment::create_shipment),
        )
        .route(
            "/shipments/{id}",
            get(shipment::get_shipment).delete(shipment::delete_shipment),
        )
        .route("/shipments/{id}/status", post(shipment::change_status))
        .route(
            "/shipments/{id}/fiscal-action",
            axum::routing::put(shipment::update_fiscal_action),
        )
        .route(
            "/shipments/{id}/deliveries",
            get(delivery::get_shipment_deliveries),
        )
        .route("/deliveries", get(delivery::get_all_deliveries))
        .route("/deliveries/{id}", get(delivery::get_delivery))
        .route("/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "Velomax server is running."
}
