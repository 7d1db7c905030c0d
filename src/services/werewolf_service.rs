use log::{debug, info};

use crate::{
    error::GameError,
    models::werewolf::{GamePhase, NightAction, NightActionRequest, WerewolfGame},
    state::AppState,
};

fn phase_name(phase: GamePhase) -> String {
    format!("{:?}", phase)
}

async fn announce_transition(state: &AppState, chat_id: &str, from: GamePhase, to: GamePhase) {
    if from != to {
        let _ = state
            .broadcast_phase_change(chat_id, &phase_name(from), &phase_name(to))
            .await;
    }
}

pub async fn create_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
    name: &str,
    username: Option<String>,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    if games.contains_key(chat_id) {
        return Err(GameError::GameExists);
    }
    let mut game = WerewolfGame::new(chat_id.to_string(), user_id);
    let joined = game.add_player(user_id, name.to_string(), username)?;
    games.insert(chat_id.to_string(), game);
    info!("werewolf game created in chat {}", chat_id);
    Ok(format!("Werewolf game created! {}", joined))
}

pub async fn join_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
    name: &str,
    username: Option<String>,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    game.add_player(user_id, name.to_string(), username)
}

pub async fn leave_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let message = game.remove_player(user_id)?;
    if game.players.is_empty() {
        games.remove(chat_id);
        info!("werewolf game in chat {} abandoned", chat_id);
        return Ok("Everyone left; the game was cancelled.".to_string());
    }
    Ok(message)
}

pub async fn cancel_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get(chat_id).ok_or(GameError::GameNotFound)?;
    if game.creator_id != user_id {
        return Err(GameError::NotCreator);
    }
    games.remove(chat_id);
    info!("werewolf game in chat {} cancelled by creator", chat_id);
    Ok("The game was cancelled.".to_string())
}

pub async fn start_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let message = game.start(user_id)?;
    info!(
        "werewolf game in chat {} started with {} players",
        chat_id,
        game.players.len()
    );
    announce_transition(&state, chat_id, GamePhase::Lobby, GamePhase::Night).await;
    let _ = state.broadcast_narration(chat_id, &message).await;
    Ok(message)
}

pub async fn get_player_role(
    state: AppState,
    chat_id: &str,
    user_id: u64,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    game.player_role(user_id)
}

/// Applies one night action. When the completion predicate flips, the
/// night resolves in the same call and the dawn narration is appended to
/// the actor's private reply as well as broadcast to the room.
pub async fn night_action(
    state: AppState,
    chat_id: &str,
    request: NightActionRequest,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;

    let actor = request.player_id;
    let mut message = match request.action {
        NightAction::CupidLink {
            first_target,
            second_target,
        } => game.cupid_link(actor, first_target, second_target)?,
        NightAction::Protect { target_id } => game.guardian_protect(actor, target_id)?,
        NightAction::WolfVote { target_id } => game.wolf_vote(actor, target_id)?,
        NightAction::Inspect { target_id } => game.seer_inspect(actor, target_id)?,
        NightAction::WitchAct { heal, kill_target } => {
            game.witch_act(actor, heal, kill_target)?
        }
        NightAction::Enchant {
            first_target,
            second_target,
        } => game.piper_enchant(actor, first_target, second_target)?,
    };
    debug!("night action applied in chat {} by {}", chat_id, actor);

    if game.is_night_complete() {
        let dawn = game.resolve_night();
        let to = game.phase;
        announce_transition(&state, chat_id, GamePhase::Night, to).await;
        let _ = state.broadcast_narration(chat_id, &dawn).await;
        if to == GamePhase::Finished {
            games.remove(chat_id);
            info!("werewolf game in chat {} finished", chat_id);
        }
        message.push_str("\n\n");
        message.push_str(&dawn);
    }

    Ok(message)
}

pub async fn start_voting(state: AppState, chat_id: &str) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let message = game.start_voting()?;
    announce_transition(&state, chat_id, GamePhase::DayDiscussion, GamePhase::DayVoting).await;
    let _ = state.broadcast_narration(chat_id, &message).await;
    Ok(message)
}

pub async fn day_vote(
    state: AppState,
    chat_id: &str,
    voter_id: u64,
    target_id: u64,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let from = game.phase;
    let message = game.day_vote(voter_id, target_id)?;
    let to = game.phase;
    announce_transition(&state, chat_id, from, to).await;
    if to != from {
        let _ = state.broadcast_narration(chat_id, &message).await;
    }
    if to == GamePhase::Finished {
        games.remove(chat_id);
        info!("werewolf game in chat {} finished", chat_id);
    }
    Ok(message)
}

pub async fn hunter_shot(
    state: AppState,
    chat_id: &str,
    hunter_id: u64,
    target_id: u64,
) -> Result<String, GameError> {
    let mut games = state.werewolf_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let from = game.phase;
    let message = game.hunter_shot(hunter_id, target_id)?;
    let to = game.phase;
    announce_transition(&state, chat_id, from, to).await;
    let _ = state.broadcast_narration(chat_id, &message).await;
    if to == GamePhase::Finished {
        games.remove(chat_id);
        info!("werewolf game in chat {} finished", chat_id);
    }
    Ok(message)
}

// --- queries ---

pub async fn get_players(state: AppState, chat_id: &str) -> Result<String, GameError> {
    let games = state.werewolf_games.lock().await;
    let game = games.get(chat_id).ok_or(GameError::GameNotFound)?;
    let mut listing = game.players_list();
    if state.debug_config.show_player_roles {
        for p in &game.players {
            if let Some(role) = p.role {
                listing.push_str(&format!("\n[debug] {} = {}", p.name, role));
            }
        }
    }
    Ok(listing)
}

pub async fn get_alive(state: AppState, chat_id: &str) -> Result<String, GameError> {
    let games = state.werewolf_games.lock().await;
    let game = games.get(chat_id).ok_or(GameError::GameNotFound)?;
    Ok(game.alive_list())
}

pub async fn get_phase(state: AppState, chat_id: &str) -> Result<String, GameError> {
    let games = state.werewolf_games.lock().await;
    let game = games.get(chat_id).ok_or(GameError::GameNotFound)?;
    Ok(phase_name(game.phase))
}

pub async fn is_night_complete(state: AppState, chat_id: &str) -> Result<bool, GameError> {
    let games = state.werewolf_games.lock().await;
    let game = games.get(chat_id).ok_or(GameError::GameNotFound)?;
    Ok(game.is_night_complete())
}

pub async fn get_game_state(
    state: AppState,
    chat_id: &str,
) -> Result<WerewolfGame, GameError> {
    let games = state.werewolf_games.lock().await;
    games
        .get(chat_id)
        .cloned()
        .ok_or(GameError::GameNotFound)
}
