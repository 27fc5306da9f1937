use crate::models::budget::{AdditionalService, PackageMeasurement};
use crate::models::price_table::{DeliveryType, PriceTable};

use super::PricingError;

/// cm³ per kg used by carriers to turn a volume into a billable weight
pub const CUBIC_DIVISOR: f64 = 6000.0;

/// Flat amount added when the budget includes collection at the origin
pub const COLLECTION_SURCHARGE: f64 = 50.0;

/// Multiplier applied when the budget does not include final delivery
pub const NO_DELIVERY_FACTOR: f64 = 0.7;

/// Volumetric weight of a package. Non-positive dimensions yield 0.
pub fn cubic_weight(width: f64, length: f64, height: f64) -> f64 {
    if width <= 0.0 || length <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    (width * length * height) / CUBIC_DIVISOR
}

/// Carriers bill the larger of actual and volumetric weight.
pub fn effective_weight(real_weight: f64, cubic_weight: f64) -> f64 {
    real_weight.max(cubic_weight)
}

/// Surcharge factor applied to the freight sum for a delivery type
pub fn surcharge_factor(delivery_type: DeliveryType) -> f64 {
    match delivery_type {
        DeliveryType::Emergency => 1.5,
        DeliveryType::Exclusive => 2.0,
        DeliveryType::Saturday => 1.3,
        DeliveryType::SundayHoliday => 1.5,
        DeliveryType::ScheduledDifficultAccess => 1.2,
        DeliveryType::InfectiousBiological => 1.5,
        _ => 1.0,
    }
}

/// Freight for a single unit of the given effective weight, already scaled
/// by the table multiplier.
pub fn freight_for_weight(
    delivery_type: DeliveryType,
    effective_weight: f64,
    table: &PriceTable,
) -> Result<f64, PricingError> {
    let rule = table
        .rates
        .rule_for(delivery_type)
        .ok_or_else(|| PricingError::MissingRate {
            table: table.name.clone(),
            delivery_type,
        })?;

    let base = if effective_weight <= rule.weight_limit {
        rule.minimum_rate
    } else {
        rule.minimum_rate + (effective_weight - rule.weight_limit) * rule.excess_rate_per_kg
    };

    Ok(base * table.multiplier)
}

/// Freight for a package line: per-unit freight at the package's effective
/// weight, times its quantity.
pub fn freight_for_package(
    delivery_type: DeliveryType,
    package: &PackageMeasurement,
    table: &PriceTable,
) -> Result<f64, PricingError> {
    let cubic = cubic_weight(package.width, package.length, package.height);
    let weight = effective_weight(package.weight, cubic);
    let unit = freight_for_weight(delivery_type, weight, table)?;
    Ok(unit * f64::from(package.quantity))
}

/// Total value of a budget.
///
/// Freight of every package plus additional services, times the delivery
/// type surcharge, plus the collection surcharge, then the no-delivery
/// discount. Rounded to cents only at the end.
pub fn budget_total(
    packages: &[PackageMeasurement],
    delivery_type: DeliveryType,
    table: &PriceTable,
    additional_services: &[AdditionalService],
    has_collection: bool,
    has_delivery: bool,
) -> Result<f64, PricingError> {
    let mut total = 0.0;
    for package in packages {
        total += freight_for_package(delivery_type, package, table)?;
    }
    total += additional_services.iter().map(|s| s.value).sum::<f64>();

    total *= surcharge_factor(delivery_type);

    if has_collection {
        total += COLLECTION_SURCHARGE;
    }
    if !has_delivery {
        total *= NO_DELIVERY_FACTOR;
    }

    Ok(round_cents(total))
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::price_table::{RateRule, ServiceRates};
    use chrono::Utc;

    fn emergency_table() -> PriceTable {
        PriceTable {
            id: "pt-1".to_string(),
            name: "Tabela Padrão".to_string(),
            multiplier: 1.0,
            rates: ServiceRates {
                emergency: Some(RateRule {
                    minimum_rate: 30.0,
                    weight_limit: 10.0,
                    excess_rate_per_kg: 2.0,
                }),
                standard: Some(RateRule {
                    minimum_rate: 20.0,
                    weight_limit: 5.0,
                    excess_rate_per_kg: 1.5,
                }),
                ..Default::default()
            },
            door_to_door_rate_per_km: 0.0,
            waiting_hour_rates: Default::default(),
            insurance_rates: Default::default(),
            custom_services: vec![],
            last_edit: Utc::now(),
        }
    }

    fn light_package() -> PackageMeasurement {
        PackageMeasurement {
            width: 10.0,
            length: 10.0,
            height: 10.0,
            weight: 2.0,
            quantity: 1,
        }
    }

    #[test]
    fn cubic_weight_of_fifty_cm_cube() {
        let cubic = cubic_weight(50.0, 50.0, 50.0);
        assert!((cubic - 20.8333).abs() < 1e-3);
        assert!((effective_weight(5.0, cubic) - cubic).abs() < f64::EPSILON);
    }

    #[test]
    fn cubic_weight_is_zero_for_degenerate_dimensions() {
        assert_eq!(cubic_weight(0.0, 50.0, 50.0), 0.0);
        assert_eq!(cubic_weight(-10.0, 50.0, 50.0), 0.0);
    }

    #[test]
    fn effective_weight_never_below_real_weight() {
        for (real, w, l, h) in [(5.0, 1.0, 1.0, 1.0), (0.5, 100.0, 80.0, 60.0), (30.0, 0.0, 0.0, 0.0)] {
            let cubic = cubic_weight(w, l, h);
            assert!(effective_weight(real, cubic) >= real);
        }
    }

    #[test]
    fn freight_charges_minimum_up_to_limit_then_excess() {
        let table = emergency_table();
        assert_eq!(freight_for_weight(DeliveryType::Emergency, 10.0, &table).unwrap(), 30.0);
        assert_eq!(freight_for_weight(DeliveryType::Emergency, 15.0, &table).unwrap(), 40.0);
    }

    #[test]
    fn freight_is_monotonic_in_weight() {
        let table = emergency_table();
        let mut previous = 0.0;
        for step in 0..60 {
            let weight = step as f64 * 0.5;
            let freight = freight_for_weight(DeliveryType::Standard, weight, &table).unwrap();
            assert!(freight >= previous);
            previous = freight;
        }
    }

    #[test]
    fn freight_scales_with_multiplier_and_quantity() {
        let mut table = emergency_table();
        table.multiplier = 1.1;
        let package = PackageMeasurement {
            quantity: 3,
            ..light_package()
        };
        let freight = freight_for_package(DeliveryType::Emergency, &package, &table).unwrap();
        assert!((freight - 99.0).abs() < 1e-9);
    }

    #[test]
    fn missing_rate_is_a_configuration_error() {
        let table = emergency_table();
        let err = freight_for_weight(DeliveryType::Reshipment, 1.0, &table).unwrap_err();
        assert_eq!(
            err,
            PricingError::MissingRate {
                table: "Tabela Padrão".to_string(),
                delivery_type: DeliveryType::Reshipment,
            }
        );
    }

    #[test]
    fn emergency_budget_applies_surcharge() {
        let table = emergency_table();
        let total = budget_total(&[light_package()], DeliveryType::Emergency, &table, &[], false, true)
            .unwrap();
        assert_eq!(total, 45.0);
    }

    #[test]
    fn collection_is_added_after_surcharge() {
        let table = emergency_table();
        let total = budget_total(&[light_package()], DeliveryType::Emergency, &table, &[], true, true)
            .unwrap();
        assert_eq!(total, 95.0);
    }

    #[test]
    fn missing_delivery_discounts_thirty_percent() {
        let table = emergency_table();
        let without_delivery =
            budget_total(&[light_package()], DeliveryType::Emergency, &table, &[], false, false)
                .unwrap();
        assert_eq!(without_delivery, 31.5);

        let both = budget_total(&[light_package()], DeliveryType::Emergency, &table, &[], true, false)
            .unwrap();
        assert_eq!(both, 66.5);
    }

    #[test]
    fn additional_services_are_surcharged_with_freight() {
        let table = emergency_table();
        let services = vec![AdditionalService {
            description: "Ajudante".to_string(),
            value: 10.0,
        }];
        let total =
            budget_total(&[light_package()], DeliveryType::Emergency, &table, &services, false, true)
                .unwrap();
        assert_eq!(total, 60.0);
    }

    #[test]
    fn budget_total_is_idempotent() {
        let table = emergency_table();
        let packages = vec![
            light_package(),
            PackageMeasurement {
                width: 50.0,
                length: 50.0,
                height: 50.0,
                weight: 5.0,
                quantity: 2,
            },
        ];
        let first = budget_total(&packages, DeliveryType::Standard, &table, &[], true, false);
        let second = budget_total(&packages, DeliveryType::Standard, &table, &[], true, false);
        assert_eq!(first, second);
    }
}
