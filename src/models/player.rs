use serde::{Deserialize, Serialize};

use super::role::Role;

/// One seat in a werewolf game. Every transient flag is always present and
/// starts at its documented default; nothing is conditionally absent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub user_id: u64,
    pub name: String,
    pub username: Option<String>,
    /// Set once when the game starts, never reassigned.
    pub role: Option<Role>,
    /// Monotonic: once false it never becomes true again.
    pub is_alive: bool,
    pub has_seen_role: bool,
    /// Guardian shield, valid for the current night only.
    pub is_protected: bool,
    pub is_in_love: bool,
    /// Symmetric pair reference by identity; set once by Cupid.
    pub lover_id: Option<u64>,
    /// Pied Piper's mark, permanent.
    pub is_enchanted: bool,
    /// Current target, shared by wolf consensus and day voting.
    pub vote: Option<u64>,
    pub night_action_done: bool,
}

impl Player {
    pub fn new(user_id: u64, name: String, username: Option<String>) -> Self {
        Player {
            user_id,
            name,
            username,
            role: None,
            is_alive: true,
            has_seen_role: false,
            is_protected: false,
            is_in_love: false,
            lover_id: None,
            is_enchanted: false,
            vote: None,
            night_action_done: false,
        }
    }

    pub fn is_wolf(&self) -> bool {
        self.role == Some(Role::Werewolf)
    }
}
