use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{
    RwLock,
    mpsc::{self, error::TrySendError},
};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    lifecycle::{EventSink, ShipmentEvent},
    models::{
        ConnectionStatus, ConnectionStatusData, DeliveriesUpdatedData, MessageType,
        ShipmentUpdateData, TransitionRejectedData, WebSocketMessage,
    },
};

/// WebSocket connection manager
pub struct ConnectionManager {
    connections: RwLock<HashMap<Uuid, mpsc::Sender<Message>>>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection
    pub async fn register(&self, id: Uuid, sender: mpsc::Sender<Message>) {
        let mut connections = self.connections.write().await;
        connections.insert(id, sender);
        tracing::info!("Registered connection {}", id);
    }

    /// Unregister a connection
    pub async fn unregister(&self, id: &Uuid) {
        let mut connections = self.connections.write().await;
        connections.remove(id);
        tracing::info!("Unregistered connection {}", id);
    }

    /// Send a message to a specific connection. Never waits on the client:
    /// a full queue is reported as an error.
    pub async fn send_to(&self, connection_id: &Uuid, message: impl Serialize) -> Result<()> {
        let sender = self
            .connections
            .read()
            .await
            .get(connection_id)
            .cloned()
            .ok_or_else(|| {
                AppError::WebSocket(format!("Connection {} not found", connection_id))
            })?;

        let message_json = serde_json::to_string(&message).map_err(AppError::Json)?;
        if let Err(e) = sender.try_send(Message::Text(message_json.into())) {
            tracing::error!("Failed to send message to {}: {}", connection_id, e);
            return Err(AppError::WebSocket(format!(
                "Failed to send message: {}",
                e
            )));
        }
        Ok(())
    }

    /// Broadcast a message to all connections.
    ///
    /// Senders are copied out so the lock is released before sending.
    /// Clients whose queue is full or closed are dropped.
    pub async fn broadcast(&self, message: impl Serialize) -> Result<()> {
        let message_json = serde_json::to_string(&message).map_err(AppError::Json)?;
        let senders: Vec<(Uuid, mpsc::Sender<Message>)> = self
            .connections
            .read()
            .await
            .iter()
            .map(|(id, sender)| (*id, sender.clone()))
            .collect();

        let mut stale = Vec::new();
        for (id, sender) in senders {
            match sender.try_send(Message::Text(message_json.clone().into())) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Connection {} is not reading; dropping it", id);
                    stale.push(id);
                }
                Err(TrySendError::Closed(_)) => stale.push(id),
            }
        }

        for id in &stale {
            self.unregister(id).await;
        }

        Ok(())
    }

    /// Send a connection status update to a specific connection
    pub async fn send_connection_status(
        &self,
        connection_id: &Uuid,
        status: ConnectionStatus,
    ) -> Result<()> {
        let status_data = ConnectionStatusData { status };
        let message = WebSocketMessage::new(MessageType::ConnectionStatus, status_data);
        self.send_to(connection_id, message).await
    }

    /// Get the number of active connections
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }
}

#[async_trait]
impl EventSink for ConnectionManager {
    async fn publish(&self, event: ShipmentEvent) {
        let result = match event {
            ShipmentEvent::StatusChanged {
                shipment_id,
                status,
            } => {
                self.broadcast(WebSocketMessage::new(
                    MessageType::ShipmentUpdate,
                    ShipmentUpdateData {
                        shipment_id,
                        status,
                    },
                ))
                .await
            }
            ShipmentEvent::DeliveriesCreated {
                shipment_id,
                delivery_ids,
            } => {
                self.broadcast(WebSocketMessage::new(
                    MessageType::DeliveriesUpdated,
                    DeliveriesUpdatedData {
                        shipment_id,
                        delivery_ids,
                    },
                ))
                .await
            }
            ShipmentEvent::TransitionRejected {
                shipment_id,
                reason,
            } => {
                self.broadcast(WebSocketMessage::new(
                    MessageType::TransitionRejected,
                    TransitionRejectedData {
                        shipment_id,
                        reason,
                    },
                ))
                .await
            }
        };

        if let Err(e) = result {
            tracing::error!("Error broadcasting shipment event: {}", e);
        }
    }
}

/// Shared state for the connection manager
pub type SharedConnectionManager = Arc<ConnectionManager>;

/// Handle a WebSocket connection. Clients only listen; the one message they
/// may send is a `ping`.
pub async fn handle_socket(socket: WebSocket, connection_manager: SharedConnectionManager) {
    let connection_id = Uuid::new_v4();
    tracing::info!("New websocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(100);

    connection_manager.register(connection_id, tx.clone()).await;

    if let Err(e) = connection_manager
        .send_connection_status(&connection_id, ConnectionStatus::Connected)
        .await
    {
        tracing::error!("Error sending connection status: {}", e);
    }

    // Task to forward messages from the channel to the WebSocket
    let mut forward_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = sender.send(message).await {
                tracing::error!("Error sending WebSocket message: {}", e);
                break;
            }
        }
    });

    // Task to handle incoming messages
    let manager = connection_manager.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    tracing::debug!("Received message: {}", text.as_str());
                    let is_ping = serde_json::from_str::<Value>(text.as_str())
                        .ok()
                        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(|t| t == "ping"))
                        .unwrap_or(false);
                    if is_ping {
                        let pong = WebSocketMessage::new(MessageType::Pong, Value::Null);
                        if let Err(e) = manager.send_to(&connection_id, pong).await {
                            tracing::error!("Error sending pong: {}", e);
                        }
                    }
                }
                Ok(Message::Ping(data)) => {
                    if let Err(e) = tx.send(Message::Pong(data)).await {
                        tracing::error!("Error sending pong: {}", e);
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut forward_task => receive_task.abort(),
        _ = &mut receive_task => forward_task.abort(),
    }

    connection_manager.unregister(&connection_id).await;
    tracing::info!("WebSocket connection closed: {}", connection_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shipment::ShipmentStatus;

    #[tokio::test]
    async fn shipment_events_reach_registered_connections() {
        let manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), tx).await;
        assert_eq!(manager.connection_count().await, 1);

        manager
            .publish(ShipmentEvent::StatusChanged {
                shipment_id: "s-1".to_string(),
                status: ShipmentStatus::PartiallyDelivered,
            })
            .await;

        match rx.recv().await {
            Some(Message::Text(text)) => {
                let json: Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(json["type"], "shipment_update");
                assert_eq!(json["data"]["status"], "partially_delivered");
                assert_eq!(json["data"]["shipmentId"], "s-1");
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn stalled_client_does_not_block_broadcast() {
        let manager = ConnectionManager::new();
        let (stalled_tx, _stalled_rx) = mpsc::channel(1);
        stalled_tx
            .try_send(Message::Text("unread".into()))
            .unwrap();
        manager.register(Uuid::new_v4(), stalled_tx).await;

        let (live_tx, mut live_rx) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), live_tx).await;

        let publish = manager.publish(ShipmentEvent::StatusChanged {
            shipment_id: "s-1".to_string(),
            status: ShipmentStatus::AtCarrier,
        });
        tokio::time::timeout(std::time::Duration::from_secs(2), publish)
            .await
            .expect("publish waited on a stalled client");

        assert!(matches!(live_rx.recv().await, Some(Message::Text(_))));
        assert_eq!(manager.connection_count().await, 1);
    }

    #[tokio::test]
    async fn closed_clients_are_dropped_on_broadcast() {
        let manager = ConnectionManager::new();
        let (tx, rx) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), tx).await;
        drop(rx);

        manager.broadcast(serde_json::json!({ "type": "pong" })).await.unwrap();
        assert_eq!(manager.connection_count().await, 0);
    }

    #[tokio::test]
    async fn rejections_are_broadcast() {
        let manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), tx).await;

        manager
            .publish(ShipmentEvent::TransitionRejected {
                shipment_id: "s-2".to_string(),
                reason: "receiver name is required".to_string(),
            })
            .await;

        match rx.recv().await {
            Some(Message::Text(text)) => {
                let json: Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(json["type"], "transition_rejected");
                assert_eq!(json["data"]["shipmentId"], "s-2");
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_to_unknown_connection_fails() {
        let manager = ConnectionManager::new();
        let result = manager
            .send_connection_status(&Uuid::new_v4(), ConnectionStatus::Connected)
            .await;
        assert!(matches!(result, Err(AppError::WebSocket(_))));
    }
}
