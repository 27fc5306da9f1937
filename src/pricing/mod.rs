//! Freight pricing: pure functions from package measurements, a delivery
//! type and a price table to monetary values.

pub mod engine;
pub mod extras;
pub mod quote;

pub use engine::{
    budget_total, cubic_weight, effective_weight, freight_for_package, freight_for_weight,
    round_cents, surcharge_factor,
};
pub use extras::{custom_service_charge, door_to_door_charge, insurance_charge, waiting_charge};
pub use quote::{ExtraCharge, Quote, QuoteLine, quote, total_volumes, validate_budget_input};

use crate::models::price_table::DeliveryType;

/// A price table lacks an entry the quote needs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("price table '{table}' has no rate for delivery type '{delivery_type}'")]
    MissingRate {
        table: String,
        delivery_type: DeliveryType,
    },

    #[error("price table '{table}' has no custom service named '{service}'")]
    MissingCustomService { table: String, service: String },
}
