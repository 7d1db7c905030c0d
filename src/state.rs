use axum::extract::ws::Message;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{broadcast, Mutex};

use crate::models::config::DebugConfig;
use crate::models::{impostor::ImpostorGame, werewolf::WerewolfGame};

/// Process-wide session store: one entry per chat room per game type.
/// Sessions share nothing; callers hold the map lock for the whole
/// read-modify-write of one action.
#[derive(Clone)]
pub struct AppState {
    pub werewolf_games: Arc<Mutex<HashMap<String, WerewolfGame>>>,
    pub impostor_games: Arc<Mutex<HashMap<String, ImpostorGame>>>,
    pub channel: Arc<Mutex<HashMap<String, broadcast::Sender<Message>>>>,
    pub debug_config: Arc<DebugConfig>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            werewolf_games: Arc::new(Mutex::new(HashMap::new())),
            impostor_games: Arc::new(Mutex::new(HashMap::new())),
            channel: Arc::new(Mutex::new(HashMap::new())),
            debug_config: Arc::new(DebugConfig::from_env()),
        }
    }

    pub async fn get_or_create_room_channel(&self, room_id: &str) -> broadcast::Sender<Message> {
        let mut channels = self.channel.lock().await;
        if let Some(channel) = channels.get(room_id) {
            channel.clone()
        } else {
            let (tx, _) = broadcast::channel(1000);
            channels.insert(room_id.to_string(), tx.clone());
            tx
        }
    }

    pub async fn broadcast_phase_change(
        &self,
        room_id: &str,
        from_phase: &str,
        to_phase: &str,
    ) -> Result<(), String> {
        let tx = self.get_or_create_room_channel(room_id).await;

        let phase_notification = serde_json::json!({
            "message_type": "phase_change",
            "from_phase": from_phase,
            "to_phase": to_phase,
            "room_id": room_id,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Ok(message_text) = serde_json::to_string(&phase_notification) {
            // Nobody listening on the room channel is fine
            let _ = tx.send(Message::Text(message_text));
        }

        Ok(())
    }

    /// Relays one of the engine's narration strings to everyone watching
    /// the room.
    pub async fn broadcast_narration(&self, room_id: &str, content: &str) -> Result<(), String> {
        let tx = self.get_or_create_room_channel(room_id).await;

        let notification = serde_json::json!({
            "message_type": "narration",
            "content": content,
            "room_id": room_id,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Ok(message_text) = serde_json::to_string(&notification) {
            let _ = tx.send(Message::Text(message_text));
        }

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
