use crate::models::price_table::{PriceTable, VehicleClass};

use super::PricingError;
use super::engine::round_cents;

/// Ad valorem plus GRIS over the declared merchandise value
pub fn insurance_charge(merchandise_value: f64, table: &PriceTable) -> f64 {
    if merchandise_value <= 0.0 {
        return 0.0;
    }
    let pct = table.insurance_rates.ad_valorem + table.insurance_rates.gris;
    round_cents(merchandise_value * pct / 100.0)
}

pub fn door_to_door_charge(km: f64, table: &PriceTable) -> f64 {
    if km <= 0.0 {
        return 0.0;
    }
    round_cents(km * table.door_to_door_rate_per_km * table.multiplier)
}

pub fn waiting_charge(hours: f64, class: VehicleClass, table: &PriceTable) -> f64 {
    if hours <= 0.0 {
        return 0.0;
    }
    round_cents(hours * table.waiting_hour_rates.rate_for(class))
}

/// Charge for a table-specific custom service, matched by name ignoring case.
pub fn custom_service_charge(
    name: &str,
    weight: f64,
    table: &PriceTable,
) -> Result<f64, PricingError> {
    let service = table
        .custom_services
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| PricingError::MissingCustomService {
            table: table.name.clone(),
            service: name.to_string(),
        })?;

    let base = if weight <= service.min_weight {
        service.base_rate
    } else {
        service.base_rate + (weight - service.min_weight) * service.excess_rate
    };

    Ok(round_cents(base * table.multiplier))
}
