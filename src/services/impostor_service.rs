use log::info;

use crate::{error::GameError, models::impostor::ImpostorGame, state::AppState};

pub async fn create_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
    name: &str,
    username: Option<String>,
) -> Result<String, GameError> {
    let mut games = state.impostor_games.lock().await;
    if games.contains_key(chat_id) {
        return Err(GameError::GameExists);
    }
    let mut game = ImpostorGame::new(chat_id.to_string(), user_id);
    let joined = game.add_player(user_id, name.to_string(), username)?;
    games.insert(chat_id.to_string(), game);
    info!("impostor game created in chat {}", chat_id);
    Ok(format!("Impostor game created! {}", joined))
}

pub async fn join_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
    name: &str,
    username: Option<String>,
) -> Result<String, GameError> {
    let mut games = state.impostor_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    game.add_player(user_id, name.to_string(), username)
}

pub async fn leave_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
) -> Result<String, GameError> {
    let mut games = state.impostor_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let message = game.remove_player(user_id)?;
    if game.players.is_empty() {
        games.remove(chat_id);
        info!("impostor game in chat {} abandoned", chat_id);
        return Ok("Everyone left; the game was cancelled.".to_string());
    }
    Ok(message)
}

pub async fn start_game(
    state: AppState,
    chat_id: &str,
    user_id: u64,
) -> Result<String, GameError> {
    let mut games = state.impostor_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let message = game.start(user_id)?;
    let _ = state.broadcast_narration(chat_id, &message).await;
    Ok(message)
}

pub async fn get_player_role(
    state: AppState,
    chat_id: &str,
    user_id: u64,
) -> Result<String, GameError> {
    let mut games = state.impostor_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    game.player_role(user_id)
}

pub async fn start_voting(state: AppState, chat_id: &str) -> Result<String, GameError> {
    let mut games = state.impostor_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let message = game.start_voting()?;
    let _ = state.broadcast_narration(chat_id, &message).await;
    Ok(message)
}

/// Records one vote; the last vote closes the round, publishes the
/// results, and drops the session.
pub async fn vote(
    state: AppState,
    chat_id: &str,
    voter_id: u64,
    target_id: u64,
) -> Result<String, GameError> {
    let mut games = state.impostor_games.lock().await;
    let game = games.get_mut(chat_id).ok_or(GameError::GameNotFound)?;
    let mut message = game.vote(voter_id, target_id)?;

    if game.all_voted() {
        let results = game.results();
        games.remove(chat_id);
        info!("impostor game in chat {} finished", chat_id);
        let _ = state.broadcast_narration(chat_id, &results).await;
        message.push_str("\n\n");
        message.push_str(&results);
    }

    Ok(message)
}

pub async fn get_players(state: AppState, chat_id: &str) -> Result<String, GameError> {
    let games = state.impostor_games.lock().await;
    let game = games.get(chat_id).ok_or(GameError::GameNotFound)?;
    Ok(game.players_list())
}
