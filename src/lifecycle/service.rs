use std::sync::Arc;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::delivery::Delivery;
use crate::models::shipment::{Document, Shipment, ShipmentStatus};

use super::ports::{Clock, DeliveryRepository, EventSink, ShipmentEvent, ShipmentRepository};
use super::request::{RetentionInput, StatusChangeRequest, ValidReceipt, ValidatedChange};
use super::status::resolve_status;

/// Writes of a status transition, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    MarkDocuments,
    UpdateShipment,
    CreateDeliveries,
}

impl std::fmt::Display for TransitionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionStep::MarkDocuments => write!(f, "mark_documents"),
            TransitionStep::UpdateShipment => write!(f, "update_shipment"),
            TransitionStep::CreateDeliveries => write!(f, "create_deliveries"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub requested: ShipmentStatus,
    /// Document counts overrode the requested status
    pub overridden: bool,
    pub shipment: Shipment,
    pub deliveries: Vec<Delivery>,
}

/// Progress of a running transition. Completed writes are never rolled
/// back; a failure reports what already went through.
struct Saga {
    shipment_id: String,
    completed: Vec<String>,
}

impl Saga {
    fn new(shipment_id: &str) -> Self {
        Self {
            shipment_id: shipment_id.to_string(),
            completed: Vec::new(),
        }
    }

    fn record(&mut self, entry: String) {
        self.completed.push(entry);
    }

    fn fail(self, step: TransitionStep, source: AppError) -> AppError {
        tracing::warn!(
            "Status change of shipment {} failed at {} after {} write(s): {}",
            self.shipment_id,
            step,
            self.completed.len(),
            source
        );
        AppError::PartialTransition {
            failed_step: step.to_string(),
            completed: self.completed,
            source: Box::new(source),
        }
    }
}

/// Drives shipments through their status lifecycle
pub struct ShipmentLifecycle {
    shipments: Arc<dyn ShipmentRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
}

impl ShipmentLifecycle {
    pub fn new(
        shipments: Arc<dyn ShipmentRepository>,
        deliveries: Arc<dyn DeliveryRepository>,
        events: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shipments,
            deliveries,
            events,
            clock,
        }
    }

    /// Apply a status change request to a shipment.
    ///
    /// Validation happens before any write. The writes then run as
    /// documents, shipment, deliveries; see [`TransitionStep`].
    pub async fn change_status(
        &self,
        shipment_id: &str,
        request: StatusChangeRequest,
    ) -> Result<TransitionOutcome> {
        let current = self.shipments.get_shipment(shipment_id).await?;
        let change = match request.validate(&current) {
            Ok(change) => change,
            Err(e) => return Err(self.reject(&current, e).await),
        };
        let now = self.clock.now();

        let mut next = current.clone();
        let mut newly_delivered: Vec<Document> = Vec::new();
        let mut receipt: Option<ValidReceipt> = None;

        match change {
            ValidatedChange::Retain(action) => {
                next.fiscal_action = Some(action);
            }
            ValidatedChange::Deliver(valid) => {
                for document in next.documents.iter_mut() {
                    if valid.document_ids.contains(&document.id) && !document.is_delivered {
                        document.is_delivered = true;
                        newly_delivered.push(document.clone());
                    }
                }
                next.receiver_name = Some(valid.receiver_name.clone());
                next.delivery_date = Some(valid.delivery_date);
                next.delivery_time = Some(valid.delivery_time);
                receipt = Some(valid);
            }
            ValidatedChange::Move => {}
        }

        next.status = resolve_status(request.status, &next.documents);
        if next.status != ShipmentStatus::Retained {
            next.fiscal_action = None;
        }
        next.is_retained = next.status == ShipmentStatus::Retained;
        next.last_edit = now;

        if next.status != request.status {
            tracing::warn!(
                "Shipment {} requested {} but {} of {} documents are delivered; status set to {}",
                current.tracking_number,
                request.status,
                next.delivered_count(),
                next.documents.len(),
                next.status
            );
        }

        let mut saga = Saga::new(shipment_id);

        for document in &newly_delivered {
            if let Err(e) = self
                .shipments
                .mark_document_delivered(shipment_id, &document.id, now)
                .await
            {
                return Err(saga.fail(TransitionStep::MarkDocuments, e));
            }
            saga.record(format!("document {} marked delivered", document.id));
        }

        if let Err(e) = self.shipments.update_status(&next).await {
            return Err(saga.fail(TransitionStep::UpdateShipment, e));
        }
        saga.record(format!("shipment {} set to {}", next.id, next.status));

        let mut created = Vec::new();
        if let Some(receipt) = &receipt {
            for delivery in self.deliveries_for(&current, &newly_delivered, receipt) {
                if let Err(e) = self.deliveries.create_delivery(&delivery).await {
                    return Err(saga.fail(TransitionStep::CreateDeliveries, e));
                }
                saga.record(format!("delivery {} created", delivery.id));
                created.push(delivery);
            }
        }

        tracing::info!(
            "Shipment {} moved from {} to {} ({} delivery record(s))",
            next.tracking_number,
            current.status,
            next.status,
            created.len()
        );

        self.events
            .publish(ShipmentEvent::StatusChanged {
                shipment_id: next.id.clone(),
                status: next.status,
            })
            .await;
        if !created.is_empty() {
            self.events
                .publish(ShipmentEvent::DeliveriesCreated {
                    shipment_id: next.id.clone(),
                    delivery_ids: created.iter().map(|d| d.id.clone()).collect(),
                })
                .await;
        }

        Ok(TransitionOutcome {
            requested: request.status,
            overridden: next.status != request.status,
            shipment: next,
            deliveries: created,
        })
    }

    /// Replace the fiscal action of a shipment that is currently retained.
    pub async fn update_fiscal_action(
        &self,
        shipment_id: &str,
        input: RetentionInput,
    ) -> Result<Shipment> {
        let mut shipment = self.shipments.get_shipment(shipment_id).await?;
        if shipment.status != ShipmentStatus::Retained {
            let err = AppError::Validation(format!(
                "shipment {} is not retained",
                shipment.tracking_number
            ));
            return Err(self.reject(&shipment, err).await);
        }

        let action = match input.into_fiscal_action() {
            Ok(action) => action,
            Err(e) => return Err(self.reject(&shipment, e).await),
        };
        shipment.fiscal_action = Some(action);
        shipment.last_edit = self.clock.now();
        self.shipments.update_status(&shipment).await?;

        tracing::info!("Fiscal action of shipment {} replaced", shipment.tracking_number);
        Ok(shipment)
    }

    /// Report a refused request to the event sink and hand the error back.
    async fn reject(&self, shipment: &Shipment, err: AppError) -> AppError {
        tracing::info!(
            "Rejected change on shipment {}: {}",
            shipment.tracking_number,
            err
        );
        self.events
            .publish(ShipmentEvent::TransitionRejected {
                shipment_id: shipment.id.clone(),
                reason: err.to_string(),
            })
            .await;
        err
    }

    /// One delivery per newly delivered document, or one for the whole
    /// shipment when it carries no documents and was not delivered before.
    fn deliveries_for(
        &self,
        shipment: &Shipment,
        newly_delivered: &[Document],
        receipt: &ValidReceipt,
    ) -> Vec<Delivery> {
        let now = self.clock.now();
        let base_note = format!("Delivery of shipment {}", shipment.tracking_number);

        let record = |document: Option<&Document>| {
            let notes = match document {
                Some(doc) if !doc.invoice_numbers.is_empty() => {
                    format!("{} - invoices {}", base_note, doc.invoice_numbers.join(", "))
                }
                _ => base_note.clone(),
            };
            Delivery {
                id: uuid::Uuid::new_v4().to_string(),
                client_id: shipment.client_id.clone(),
                shipment_id: shipment.id.clone(),
                document_id: document.map(|d| d.id.clone()),
                delivery_date: receipt.delivery_date,
                delivery_time: receipt.delivery_time,
                receiver_name: receipt.receiver_name.clone(),
                weight: document.and_then(|d| d.weight).unwrap_or(0.0),
                packages: document.and_then(|d| d.packages).unwrap_or(0),
                notes,
                created_at: now,
            }
        };

        if shipment.documents.is_empty() {
            if shipment.status == ShipmentStatus::DeliveredFinal {
                return Vec::new();
            }
            return vec![record(None)];
        }

        newly_delivered.iter().map(|doc| record(Some(doc))).collect()
    }
}
