use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

/// Chat traffic relayed between everyone watching one room. The engine's
/// own narration arrives on the same channel as `narration` messages.
#[derive(Debug, Serialize, Deserialize)]
struct WebSocketMessage {
    message_type: String,
    player_id: String,
    player_name: String,
    content: String,
    timestamp: String,
    room_id: String,
}

pub async fn handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.clone(), room_id))
}

pub async fn handle_socket(ws: WebSocket, state: AppState, room_id: String) {
    info!("New WebSocket connection established for room: {}", room_id);
    let tx = state.get_or_create_room_channel(&room_id).await;

    let (mut sender, mut receiver) = ws.split();
    let mut rx = tx.subscribe();

    let default_player_id = Uuid::new_v4().to_string();
    let room_id_for_send = room_id.clone();
    let room_id_for_receive = room_id.clone();

    let receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Text(text) = msg {
                match serde_json::from_str::<WebSocketMessage>(&text) {
                    Ok(mut ws_message) => {
                        if ws_message.player_id.trim().is_empty() {
                            ws_message.player_id = default_player_id.clone();
                        }
                        ws_message.room_id = room_id_for_receive.clone();

                        if let Ok(response) = serde_json::to_string(&ws_message) {
                            if let Err(e) = tx.send(Message::Text(response)) {
                                info!("Dropping room channel for {}: {}", room_id_for_receive, e);
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        let error_message = WebSocketMessage {
                            message_type: "error".to_string(),
                            player_id: "system".to_string(),
                            player_name: "System".to_string(),
                            content: format!("Malformed message: {}", e),
                            timestamp: chrono::Local::now().to_rfc3339(),
                            room_id: room_id_for_receive.clone(),
                        };

                        if let Ok(error_response) = serde_json::to_string(&error_message) {
                            let _ = tx.send(Message::Text(error_response));
                        }
                    }
                }
            }
        }
    });

    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if let Message::Text(text) = &msg {
                // Skip traffic addressed to other rooms on a shared channel
                if let Ok(ws_message) = serde_json::from_str::<WebSocketMessage>(text) {
                    if ws_message.room_id != room_id_for_send {
                        continue;
                    }
                }
            }

            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let _ = tokio::join!(receive_task, send_task);
}
