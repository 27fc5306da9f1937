use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::shipment::ShipmentStatus;

/// WebSocket message types pushed by the server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Connection status update to client
    ConnectionStatus,
    /// A shipment changed status
    ShipmentUpdate,
    /// New delivery records were created
    DeliveriesUpdated,
    /// A status change was refused before anything was written
    TransitionRejected,
    /// Pong reply to a client ping
    Pong,
}

/// WebSocket message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage<T> {
    /// Message type
    #[serde(rename = "type")]
    pub type_: MessageType,
    /// Message data
    pub data: T,
    /// Timestamp when the message was created
    pub timestamp: DateTime<Utc>,
    /// Optional message ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

impl<T> WebSocketMessage<T> {
    pub fn new(type_: MessageType, data: T) -> Self {
        Self {
            type_,
            data,
            timestamp: Utc::now(),
            id: Some(Uuid::new_v4()),
        }
    }
}

/// Connection status message sent to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStatusData {
    pub status: ConnectionStatus,
}

/// Connection status enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
}

/// Payload of a `shipment_update` message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentUpdateData {
    pub shipment_id: String,
    pub status: ShipmentStatus,
}

/// Payload of a `deliveries_updated` message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveriesUpdatedData {
    pub shipment_id: String,
    pub delivery_ids: Vec<String>,
}

/// Payload of a `transition_rejected` message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRejectedData {
    pub shipment_id: String,
    pub reason: String,
}
