use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::shipment::{FiscalAction, Shipment, ShipmentStatus};

/// Retention form. The amount arrives as typed by the operator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionInput {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub amount_to_pay: String,
    #[serde(default)]
    pub action_number: Option<String>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RetentionInput {
    pub fn into_fiscal_action(self) -> Result<FiscalAction> {
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("retention reason is required".into()));
        }

        let amount: f64 = self
            .amount_to_pay
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| {
                AppError::Validation(format!(
                    "amount to pay '{}' is not a number",
                    self.amount_to_pay
                ))
            })?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::Validation(
                "amount to pay cannot be negative".into(),
            ));
        }

        Ok(FiscalAction {
            reason: reason.to_string(),
            amount_to_pay: amount,
            action_number: self.action_number.filter(|s| !s.trim().is_empty()),
            payment_date: self.payment_date,
            release_date: self.release_date,
            notes: self.notes.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Receipt data supplied when documents are handed over
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_time: Option<NaiveTime>,
    #[serde(default)]
    pub document_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: ShipmentStatus,
    #[serde(default)]
    pub retention: Option<RetentionInput>,
    #[serde(default)]
    pub receipt: Option<DeliveryReceipt>,
}

/// Validated receipt: everything needed to write deliveries
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReceipt {
    pub receiver_name: String,
    pub delivery_date: NaiveDate,
    pub delivery_time: NaiveTime,
    pub document_ids: Vec<String>,
}

/// A status change request checked against the shipment it targets
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedChange {
    Retain(FiscalAction),
    Deliver(ValidReceipt),
    Move,
}

impl StatusChangeRequest {
    pub fn is_delivery(&self) -> bool {
        matches!(
            self.status,
            ShipmentStatus::DeliveredFinal | ShipmentStatus::PartiallyDelivered
        )
    }

    /// Checks the request without touching any record.
    pub fn validate(&self, shipment: &Shipment) -> Result<ValidatedChange> {
        if self.status == ShipmentStatus::Retained {
            let retention = self.retention.clone().ok_or_else(|| {
                AppError::Validation("retention reason and amount are required".into())
            })?;
            return Ok(ValidatedChange::Retain(retention.into_fiscal_action()?));
        }

        if !self.is_delivery() {
            return Ok(ValidatedChange::Move);
        }

        let receipt = self
            .receipt
            .as_ref()
            .ok_or_else(|| AppError::Validation("delivery receipt is required".into()))?;

        let receiver_name = receipt.receiver_name.trim();
        if receiver_name.is_empty() {
            return Err(AppError::Validation("receiver name is required".into()));
        }
        let delivery_date = receipt
            .delivery_date
            .ok_or_else(|| AppError::Validation("delivery date is required".into()))?;
        let delivery_time = receipt
            .delivery_time
            .ok_or_else(|| AppError::Validation("delivery time is required".into()))?;

        let mut document_ids = Vec::new();
        if !shipment.documents.is_empty() {
            if receipt.document_ids.is_empty() {
                return Err(AppError::Validation(
                    "select at least one document to deliver".into(),
                ));
            }
            for id in &receipt.document_ids {
                if !shipment.documents.iter().any(|d| &d.id == id) {
                    return Err(AppError::Validation(format!(
                        "document {} does not belong to shipment {}",
                        id, shipment.tracking_number
                    )));
                }
                if !document_ids.contains(id) {
                    document_ids.push(id.clone());
                }
            }
        }

        Ok(ValidatedChange::Deliver(ValidReceipt {
            receiver_name: receiver_name.to_string(),
            delivery_date,
            delivery_time,
            document_ids,
        }))
    }
}
