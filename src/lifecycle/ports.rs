use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::delivery::Delivery;
use crate::models::shipment::{Shipment, ShipmentStatus};

/// Shipment records as seen by the lifecycle
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn get_shipment(&self, id: &str) -> Result<Shipment>;

    /// Flag a single document as delivered. One write per document.
    async fn mark_document_delivered(
        &self,
        shipment_id: &str,
        document_id: &str,
        last_edit: DateTime<Utc>,
    ) -> Result<()>;

    /// Persist status, retention and receipt fields of the shipment row.
    async fn update_status(&self, shipment: &Shipment) -> Result<()>;
}

#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn create_delivery(&self, delivery: &Delivery) -> Result<()>;
}

/// Notification emitted after a transition has been written or refused
#[derive(Debug, Clone, PartialEq)]
pub enum ShipmentEvent {
    StatusChanged {
        shipment_id: String,
        status: ShipmentStatus,
    },
    DeliveriesCreated {
        shipment_id: String,
        delivery_ids: Vec<String>,
    },
    /// Validation refused the request; nothing was written
    TransitionRejected { shipment_id: String, reason: String },
}

/// Receiver of lifecycle notifications, owned by the application shell.
/// `publish` runs inside the request; it must not wait on slow consumers.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: ShipmentEvent);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
