use std::env;

#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub verbose_logging: bool,
    // Whether roster listings may reveal assigned roles
    pub show_player_roles: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let debug_mode = cfg!(debug_assertions) || env::var("DEBUG_MODE").is_ok();

        Self {
            enabled: debug_mode,
            verbose_logging: debug_mode,
            show_player_roles: false,
        }
    }
}

impl DebugConfig {
    pub fn from_env() -> Self {
        let enabled = env::var("DEBUG_ENABLED")
            .map(|v| v == "true")
            .unwrap_or_else(|_| cfg!(debug_assertions));
        let verbose_logging = env::var("DEBUG_VERBOSE_LOGGING")
            .map(|v| v == "true")
            .unwrap_or(enabled);
        let show_player_roles = env::var("DEBUG_SHOW_PLAYER_ROLES")
            .map(|v| v == "true")
            .unwrap_or(false);

        Self {
            enabled,
            verbose_logging,
            show_player_roles,
        }
    }
}
