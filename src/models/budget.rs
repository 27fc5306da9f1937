use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::price_table::{DeliveryType, VehicleClass};

/// Dimensions in cm, weight in kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageMeasurement {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalService {
    pub description: String,
    pub value: f64,
}

/// Freight quote for a prospective shipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub client_id: String,
    pub price_table_id: String,
    pub delivery_type: DeliveryType,
    pub merchandise_value: f64,
    pub has_collection: bool,
    pub has_delivery: bool,
    pub packages: Vec<PackageMeasurement>,
    pub additional_services: Vec<AdditionalService>,
    pub total_volumes: u32,
    pub total_value: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Budget form payload. Totals are never accepted from the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub client_id: String,
    pub price_table_id: String,
    pub delivery_type: DeliveryType,
    #[serde(default)]
    pub merchandise_value: f64,
    #[serde(default)]
    pub has_collection: bool,
    #[serde(default = "default_has_delivery")]
    pub has_delivery: bool,
    pub packages: Vec<PackageMeasurement>,
    #[serde(default)]
    pub additional_services: Vec<AdditionalService>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub extras: QuoteExtras,
}

/// Optional table-priced services shown next to a quote. They are
/// informational and never part of the budget total.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteExtras {
    #[serde(default)]
    pub door_to_door_km: f64,
    #[serde(default)]
    pub waiting: Option<WaitingRequest>,
    #[serde(default)]
    pub custom_services: Vec<CustomServiceRequest>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingRequest {
    pub hours: f64,
    pub vehicle_class: VehicleClass,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomServiceRequest {
    pub name: String,
    pub weight: f64,
}

fn default_has_delivery() -> bool {
    true
}
