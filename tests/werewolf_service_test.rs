use party_server::error::GameError;
use party_server::models::role::Role;
use party_server::models::werewolf::{NightAction, NightActionRequest};
use party_server::services::werewolf_service;
use party_server::state::AppState;

/// Creates a 6-player lobby in `chat_id` and starts it.
async fn setup_started_game(state: &AppState, chat_id: &str) {
    werewolf_service::create_game(state.clone(), chat_id, 1, "P1", None)
        .await
        .unwrap();
    for id in 2..=6 {
        werewolf_service::join_game(state.clone(), chat_id, id, &format!("P{}", id), None)
            .await
            .unwrap();
    }
    werewolf_service::start_game(state.clone(), chat_id, 1)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_lobby_lifecycle() {
    let state = AppState::new();

    let created = werewolf_service::create_game(state.clone(), "room", 1, "Ana", None)
        .await
        .unwrap();
    assert!(created.contains("Ana joined"));

    // One live session per room
    assert_eq!(
        werewolf_service::create_game(state.clone(), "room", 2, "Bruno", None).await,
        Err(GameError::GameExists)
    );

    werewolf_service::join_game(state.clone(), "room", 2, "Bruno", None)
        .await
        .unwrap();
    let listing = werewolf_service::get_players(state.clone(), "room")
        .await
        .unwrap();
    assert!(listing.contains("Ana") && listing.contains("Bruno"));

    // Everyone leaving drops the session
    werewolf_service::leave_game(state.clone(), "room", 2)
        .await
        .unwrap();
    let gone = werewolf_service::leave_game(state.clone(), "room", 1)
        .await
        .unwrap();
    assert!(gone.contains("cancelled"));
    assert_eq!(
        werewolf_service::get_players(state.clone(), "room").await,
        Err(GameError::GameNotFound)
    );
}

#[tokio::test]
async fn test_start_assigns_roles_and_enters_night() {
    let state = AppState::new();
    setup_started_game(&state, "room").await;

    let game = werewolf_service::get_game_state(state.clone(), "room")
        .await
        .unwrap();
    assert_eq!(game.players.len(), 6);
    assert!(game.players.iter().all(|p| p.role.is_some()));
    assert_eq!(
        game.players.iter().filter(|p| p.is_wolf()).count(),
        1,
        "6 players carry exactly one wolf"
    );
    assert_eq!(game.day_number, 1);
    assert_eq!(
        werewolf_service::get_phase(state.clone(), "room").await.unwrap(),
        "Night"
    );
    assert!(!werewolf_service::is_night_complete(state.clone(), "room")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_night_auto_resolves_and_lynch_ends_the_game() {
    let state = AppState::new();
    setup_started_game(&state, "room").await;

    // The roles are shuffled; read them back to drive the night
    let game = werewolf_service::get_game_state(state.clone(), "room")
        .await
        .unwrap();
    let wolf = game
        .players
        .iter()
        .find(|p| p.is_wolf())
        .map(|p| p.user_id)
        .unwrap();
    let seer = game
        .players
        .iter()
        .find(|p| p.role == Some(Role::Seer))
        .map(|p| p.user_id)
        .unwrap();
    let victim = game
        .players
        .iter()
        .find(|p| !p.is_wolf() && p.role != Some(Role::Seer))
        .map(|p| p.user_id)
        .unwrap();

    werewolf_service::night_action(
        state.clone(),
        "room",
        NightActionRequest {
            player_id: wolf,
            action: NightAction::WolfVote { target_id: victim },
        },
    )
    .await
    .unwrap();

    // The seer's inspection completes the night inline
    let reply = werewolf_service::night_action(
        state.clone(),
        "room",
        NightActionRequest {
            player_id: seer,
            action: NightAction::Inspect { target_id: wolf },
        },
    )
    .await
    .unwrap();
    assert!(reply.contains("WEREWOLF"));
    assert!(reply.contains("DAY 1"));
    assert_eq!(
        werewolf_service::get_phase(state.clone(), "room").await.unwrap(),
        "DayDiscussion"
    );

    werewolf_service::start_voting(state.clone(), "room")
        .await
        .unwrap();

    // Everyone turns on the wolf; the wolf deflects
    let game = werewolf_service::get_game_state(state.clone(), "room")
        .await
        .unwrap();
    let alive: Vec<u64> = game
        .alive_players()
        .iter()
        .map(|p| p.user_id)
        .collect();
    let scapegoat = *alive.iter().find(|id| **id != wolf).unwrap();

    let mut verdict = String::new();
    for voter in alive {
        let target = if voter == wolf { scapegoat } else { wolf };
        verdict = werewolf_service::day_vote(state.clone(), "room", voter, target)
            .await
            .unwrap();
    }
    assert!(verdict.contains("VILLAGERS WIN"));

    // Finished sessions are dropped from the store
    assert_eq!(
        werewolf_service::get_phase(state.clone(), "room").await,
        Err(GameError::GameNotFound)
    );
}

#[tokio::test]
async fn test_wrong_phase_actions_are_rejected() {
    let state = AppState::new();
    werewolf_service::create_game(state.clone(), "room", 1, "Ana", None)
        .await
        .unwrap();

    assert_eq!(
        werewolf_service::start_voting(state.clone(), "room").await,
        Err(GameError::WrongPhase)
    );
    assert_eq!(
        werewolf_service::day_vote(state.clone(), "room", 1, 2).await,
        Err(GameError::WrongPhase)
    );
    assert_eq!(
        werewolf_service::start_game(state.clone(), "room", 1).await,
        Err(GameError::NotEnoughPlayers(6))
    );
}

#[tokio::test]
async fn test_cancel_is_creator_only() {
    let state = AppState::new();
    werewolf_service::create_game(state.clone(), "room", 1, "Ana", None)
        .await
        .unwrap();
    werewolf_service::join_game(state.clone(), "room", 2, "Bruno", None)
        .await
        .unwrap();

    assert_eq!(
        werewolf_service::cancel_game(state.clone(), "room", 2).await,
        Err(GameError::NotCreator)
    );
    werewolf_service::cancel_game(state.clone(), "room", 1)
        .await
        .unwrap();
    assert_eq!(
        werewolf_service::get_players(state.clone(), "room").await,
        Err(GameError::GameNotFound)
    );
}
