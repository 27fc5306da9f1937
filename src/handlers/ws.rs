use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};

use crate::{handlers::AppState, ws::handle_socket};

/// Handler for WebSocket connections
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

/// Handle a new WebSocket connection
async fn handle_websocket(socket: WebSocket, state: AppState) {
    handle_socket(socket, state.connection_manager).await;
}
