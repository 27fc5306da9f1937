use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery-type classification of a budget. Each keyword selects one rate
/// rule of the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryType {
    Standard,
    Emergency,
    Saturday,
    Exclusive,
    ScheduledDifficultAccess,
    MetropolitanRegion,
    SundayHoliday,
    NormalBiological,
    InfectiousBiological,
    TrackedVehicle,
    DoorToDoorInterior,
    Reshipment,
}

impl DeliveryType {
    pub const ALL: [DeliveryType; 12] = [
        DeliveryType::Standard,
        DeliveryType::Emergency,
        DeliveryType::Saturday,
        DeliveryType::Exclusive,
        DeliveryType::ScheduledDifficultAccess,
        DeliveryType::MetropolitanRegion,
        DeliveryType::SundayHoliday,
        DeliveryType::NormalBiological,
        DeliveryType::InfectiousBiological,
        DeliveryType::TrackedVehicle,
        DeliveryType::DoorToDoorInterior,
        DeliveryType::Reshipment,
    ];

    /// Keyword as it appears on the wire and in price table columns
    pub fn keyword(&self) -> &'static str {
        match self {
            DeliveryType::Standard => "standard",
            DeliveryType::Emergency => "emergency",
            DeliveryType::Saturday => "saturday",
            DeliveryType::Exclusive => "exclusive",
            DeliveryType::ScheduledDifficultAccess => "scheduledDifficultAccess",
            DeliveryType::MetropolitanRegion => "metropolitanRegion",
            DeliveryType::SundayHoliday => "sundayHoliday",
            DeliveryType::NormalBiological => "normalBiological",
            DeliveryType::InfectiousBiological => "infectiousBiological",
            DeliveryType::TrackedVehicle => "trackedVehicle",
            DeliveryType::DoorToDoorInterior => "doorToDoorInterior",
            DeliveryType::Reshipment => "reshipment",
        }
    }
}

impl std::fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Minimum charge up to a weight limit, plus a per-kg rate above it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRule {
    pub minimum_rate: f64,
    pub weight_limit: f64,
    pub excess_rate_per_kg: f64,
}

/// One optional rate rule per delivery type. A `None` entry is a gap in the
/// table's configuration and is reported when a quote asks for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRates {
    pub standard: Option<RateRule>,
    pub emergency: Option<RateRule>,
    pub saturday: Option<RateRule>,
    pub exclusive: Option<RateRule>,
    pub scheduled_difficult_access: Option<RateRule>,
    pub metropolitan_region: Option<RateRule>,
    pub sunday_holiday: Option<RateRule>,
    pub normal_biological: Option<RateRule>,
    pub infectious_biological: Option<RateRule>,
    pub tracked_vehicle: Option<RateRule>,
    pub door_to_door_interior: Option<RateRule>,
    pub reshipment: Option<RateRule>,
}

impl ServiceRates {
    pub fn rule_for(&self, delivery_type: DeliveryType) -> Option<&RateRule> {
        match delivery_type {
            DeliveryType::Standard => self.standard.as_ref(),
            DeliveryType::Emergency => self.emergency.as_ref(),
            DeliveryType::Saturday => self.saturday.as_ref(),
            DeliveryType::Exclusive => self.exclusive.as_ref(),
            DeliveryType::ScheduledDifficultAccess => self.scheduled_difficult_access.as_ref(),
            DeliveryType::MetropolitanRegion => self.metropolitan_region.as_ref(),
            DeliveryType::SundayHoliday => self.sunday_holiday.as_ref(),
            DeliveryType::NormalBiological => self.normal_biological.as_ref(),
            DeliveryType::InfectiousBiological => self.infectious_biological.as_ref(),
            DeliveryType::TrackedVehicle => self.tracked_vehicle.as_ref(),
            DeliveryType::DoorToDoorInterior => self.door_to_door_interior.as_ref(),
            DeliveryType::Reshipment => self.reshipment.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Motorcycle,
    Car,
    Van,
    Truck,
}

/// Hourly waiting rates, per vehicle class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitingHourRates {
    pub motorcycle: f64,
    pub car: f64,
    pub van: f64,
    pub truck: f64,
}

impl WaitingHourRates {
    pub fn rate_for(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Motorcycle => self.motorcycle,
            VehicleClass::Car => self.car,
            VehicleClass::Van => self.van,
            VehicleClass::Truck => self.truck,
        }
    }
}

/// Insurance percentages applied to the merchandise value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRates {
    pub ad_valorem: f64,
    pub gris: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomService {
    pub name: String,
    pub min_weight: f64,
    pub base_rate: f64,
    pub excess_rate: f64,
}

/// A named set of rate rules, selectable per client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    pub id: String,
    pub name: String,
    pub multiplier: f64,
    pub rates: ServiceRates,
    pub door_to_door_rate_per_km: f64,
    pub waiting_hour_rates: WaitingHourRates,
    pub insurance_rates: InsuranceRates,
    pub custom_services: Vec<CustomService>,
    pub last_edit: DateTime<Utc>,
}

/// Price table payload as submitted by a client; id and timestamp are
/// assigned by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTableInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub rates: ServiceRates,
    #[serde(default)]
    pub door_to_door_rate_per_km: f64,
    #[serde(default)]
    pub waiting_hour_rates: WaitingHourRates,
    #[serde(default)]
    pub insurance_rates: InsuranceRates,
    #[serde(default)]
    pub custom_services: Vec<CustomService>,
}

fn default_multiplier() -> f64 {
    1.0
}

impl PriceTableInput {
    pub fn into_price_table(self, last_edit: DateTime<Utc>) -> PriceTable {
        PriceTable {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name,
            multiplier: self.multiplier,
            rates: self.rates,
            door_to_door_rate_per_km: self.door_to_door_rate_per_km,
            waiting_hour_rates: self.waiting_hour_rates,
            insurance_rates: self.insurance_rates,
            custom_services: self.custom_services,
            last_edit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_type_keywords_match_serde_names() {
        for delivery_type in DeliveryType::ALL {
            let json = serde_json::to_value(delivery_type).unwrap();
            assert_eq!(json.as_str().unwrap(), delivery_type.keyword());
        }
    }

    #[test]
    fn rule_lookup_returns_configured_entry_only() {
        let rates = ServiceRates {
            emergency: Some(RateRule {
                minimum_rate: 30.0,
                weight_limit: 10.0,
                excess_rate_per_kg: 2.0,
            }),
            ..Default::default()
        };
        assert!(rates.rule_for(DeliveryType::Emergency).is_some());
        assert!(rates.rule_for(DeliveryType::Standard).is_none());
    }

    #[test]
    fn input_defaults_multiplier_to_one() {
        let input: PriceTableInput = serde_json::from_value(serde_json::json!({
            "name": "Tabela Padrão"
        }))
        .unwrap();
        let table = input.into_price_table(Utc::now());
        assert_eq!(table.multiplier, 1.0);
        assert!(!table.id.is_empty());
    }
}
