use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::budget::{BudgetInput, PackageMeasurement, QuoteExtras};
use crate::models::price_table::PriceTable;

use super::engine::{budget_total, cubic_weight, effective_weight, freight_for_package, round_cents};
use super::extras::{custom_service_charge, door_to_door_charge, insurance_charge, waiting_charge};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub cubic_weight: f64,
    pub effective_weight: f64,
    pub quantity: u32,
    pub freight: f64,
}

/// Priced budget input, with a per-package breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub price_table_id: String,
    pub lines: Vec<QuoteLine>,
    pub total_volumes: u32,
    pub total_value: f64,
    pub insurance_value: f64,
    pub extra_charges: Vec<ExtraCharge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraCharge {
    pub description: String,
    pub value: f64,
}

/// Rejects budget inputs no carrier would price.
pub fn validate_budget_input(input: &BudgetInput) -> Result<()> {
    if input.client_id.trim().is_empty() {
        return Err(AppError::Validation("client is required".into()));
    }
    if input.packages.is_empty() {
        return Err(AppError::Validation(
            "at least one package is required".into(),
        ));
    }
    for (index, package) in input.packages.iter().enumerate() {
        if package.quantity < 1 {
            return Err(AppError::Validation(format!(
                "package {} must have a quantity of at least 1",
                index + 1
            )));
        }
        if [package.width, package.length, package.height, package.weight]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(AppError::Validation(format!(
                "package {} has an invalid dimension or weight",
                index + 1
            )));
        }
    }
    if !input.merchandise_value.is_finite() || input.merchandise_value < 0.0 {
        return Err(AppError::Validation(
            "merchandise value cannot be negative".into(),
        ));
    }
    total_volumes(&input.packages)?;
    Ok(())
}

pub fn quote(input: &BudgetInput, table: &PriceTable) -> Result<Quote> {
    validate_budget_input(input)?;

    let mut lines = Vec::with_capacity(input.packages.len());
    for package in &input.packages {
        let cubic = cubic_weight(package.width, package.length, package.height);
        lines.push(QuoteLine {
            cubic_weight: round_cents(cubic),
            effective_weight: round_cents(effective_weight(package.weight, cubic)),
            quantity: package.quantity,
            freight: round_cents(freight_for_package(input.delivery_type, package, table)?),
        });
    }

    let total_value = budget_total(
        &input.packages,
        input.delivery_type,
        table,
        &input.additional_services,
        input.has_collection,
        input.has_delivery,
    )?;

    let quote = Quote {
        price_table_id: table.id.clone(),
        lines,
        total_volumes: total_volumes(&input.packages)?,
        total_value,
        insurance_value: insurance_charge(input.merchandise_value, table),
        extra_charges: extra_charges(&input.extras, table)?,
    };

    tracing::debug!(
        "Quoted {} package line(s) on table {}: {}",
        quote.lines.len(),
        table.name,
        quote.total_value
    );

    Ok(quote)
}

/// Sum of package quantities; a count past `u32::MAX` is rejected.
pub fn total_volumes(packages: &[PackageMeasurement]) -> Result<u32> {
    packages
        .iter()
        .try_fold(0u32, |total, p| total.checked_add(p.quantity))
        .ok_or_else(|| AppError::Validation("total package quantity is too large".into()))
}

fn extra_charges(extras: &QuoteExtras, table: &PriceTable) -> Result<Vec<ExtraCharge>> {
    let mut charges = Vec::new();

    if extras.door_to_door_km > 0.0 {
        charges.push(ExtraCharge {
            description: format!("Door to door ({} km)", extras.door_to_door_km),
            value: door_to_door_charge(extras.door_to_door_km, table),
        });
    }
    if let Some(waiting) = &extras.waiting {
        if !waiting.hours.is_finite() || waiting.hours < 0.0 {
            return Err(AppError::Validation("waiting hours cannot be negative".into()));
        }
        if waiting.hours > 0.0 {
            charges.push(ExtraCharge {
                description: format!("Waiting {} h", waiting.hours),
                value: waiting_charge(waiting.hours, waiting.vehicle_class, table),
            });
        }
    }
    for service in &extras.custom_services {
        charges.push(ExtraCharge {
            description: service.name.clone(),
            value: custom_service_charge(&service.name, service.weight, table)?,
        });
    }

    Ok(charges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::budget::{CustomServiceRequest, WaitingRequest};
    use crate::models::price_table::{
        CustomService, DeliveryType, PriceTableInput, RateRule, ServiceRates, VehicleClass,
    };
    use crate::pricing::PricingError;
    use chrono::Utc;

    fn table() -> PriceTable {
        PriceTableInput {
            id: Some("pt-quote".to_string()),
            name: "Tabela Padrão".to_string(),
            multiplier: 1.0,
            rates: ServiceRates {
                standard: Some(RateRule {
                    minimum_rate: 25.0,
                    weight_limit: 10.0,
                    excess_rate_per_kg: 2.0,
                }),
                ..Default::default()
            },
            door_to_door_rate_per_km: 0.0,
            waiting_hour_rates: Default::default(),
            insurance_rates: Default::default(),
            custom_services: vec![],
        }
        .into_price_table(Utc::now())
    }

    fn input(packages: Vec<PackageMeasurement>) -> BudgetInput {
        BudgetInput {
            client_id: "client-1".to_string(),
            price_table_id: "pt-quote".to_string(),
            delivery_type: DeliveryType::Standard,
            merchandise_value: 0.0,
            has_collection: false,
            has_delivery: true,
            packages,
            additional_services: vec![],
            notes: None,
            extras: QuoteExtras::default(),
        }
    }

    #[test]
    fn quote_breaks_down_each_package() {
        let quote = quote(
            &input(vec![
                PackageMeasurement {
                    width: 50.0,
                    length: 50.0,
                    height: 50.0,
                    weight: 5.0,
                    quantity: 2,
                },
                PackageMeasurement {
                    width: 10.0,
                    length: 10.0,
                    height: 10.0,
                    weight: 1.0,
                    quantity: 1,
                },
            ]),
            &table(),
        )
        .unwrap();

        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].cubic_weight, 20.83);
        assert_eq!(quote.lines[0].effective_weight, 20.83);
        assert_eq!(quote.total_volumes, 3);
        // 2 x (25 + 10.8333 x 2) + 25
        assert_eq!(quote.total_value, 118.33);
    }

    #[test]
    fn extras_are_listed_but_not_totalled() {
        let mut table = table();
        table.door_to_door_rate_per_km = 2.0;
        table.waiting_hour_rates.car = 30.0;
        table.custom_services.push(CustomService {
            name: "Refrigerado".to_string(),
            min_weight: 5.0,
            base_rate: 40.0,
            excess_rate: 4.0,
        });

        let mut budget = input(vec![PackageMeasurement {
            width: 10.0,
            length: 10.0,
            height: 10.0,
            weight: 1.0,
            quantity: 1,
        }]);
        budget.extras = QuoteExtras {
            door_to_door_km: 10.0,
            waiting: Some(WaitingRequest {
                hours: 2.0,
                vehicle_class: VehicleClass::Car,
            }),
            custom_services: vec![CustomServiceRequest {
                name: "refrigerado".to_string(),
                weight: 7.0,
            }],
        };

        let quote = quote(&budget, &table).unwrap();
        let values: Vec<f64> = quote.extra_charges.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![20.0, 60.0, 48.0]);
        assert_eq!(quote.total_value, 25.0);
    }

    #[test]
    fn unknown_custom_service_fails_the_quote() {
        let mut budget = input(vec![PackageMeasurement {
            width: 10.0,
            length: 10.0,
            height: 10.0,
            weight: 1.0,
            quantity: 1,
        }]);
        budget.extras.custom_services.push(CustomServiceRequest {
            name: "Blindado".to_string(),
            weight: 1.0,
        });
        let err = quote(&budget, &table()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::MissingCustomService { .. })
        ));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = quote(
            &input(vec![PackageMeasurement {
                width: 10.0,
                length: 10.0,
                height: 10.0,
                weight: 1.0,
                quantity: 0,
            }]),
            &table(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn oversized_quantity_total_is_rejected() {
        let huge = PackageMeasurement {
            width: 10.0,
            length: 10.0,
            height: 10.0,
            weight: 1.0,
            quantity: u32::MAX,
        };
        let err = quote(&input(vec![huge, huge]), &table()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(total_volumes(&[huge]).unwrap(), u32::MAX);
    }

    #[test]
    fn empty_package_list_is_rejected() {
        let err = quote(&input(vec![]), &table()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn missing_rate_surfaces_as_pricing_error() {
        let mut budget = input(vec![PackageMeasurement {
            width: 10.0,
            length: 10.0,
            height: 10.0,
            weight: 1.0,
            quantity: 1,
        }]);
        budget.delivery_type = DeliveryType::Exclusive;
        let err = quote(&budget, &table()).unwrap_err();
        assert!(matches!(err, AppError::Pricing(_)));
    }
}
