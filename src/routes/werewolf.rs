use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::models::werewolf::NightActionRequest;
use crate::services::werewolf_service;
use crate::state::AppState;
use crate::utils::websocket;

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRequest {
    pub player_id: u64,
    pub name: String,
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteAction {
    pub voter_id: u64,
    pub target_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShotAction {
    pub hunter_id: u64,
    pub target_id: u64,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // Lobby
        // curl -X POST http://localhost:8080/api/werewolf/{chatid}/create -d '{"player_id":1,"name":"Ana"}'
        .route("/:chatid/create", post(create_game))
        .route("/:chatid/join", post(join_game))
        .route("/:chatid/leave/:playerid", post(leave_game))
        .route("/:chatid/cancel/:playerid", post(cancel_game))
        .route("/:chatid/start/:playerid", post(start_game))
        // Actions
        .nest(
            "/:chatid/actions",
            Router::new()
                .route("/night", post(night_action))
                .route("/start-voting", post(start_voting))
                .route("/vote", post(day_vote))
                .route("/shoot", post(hunter_shot)),
        )
        // Queries
        .route("/:chatid/role/:playerid", get(get_role))
        .route("/:chatid/players", get(get_players))
        .route("/:chatid/alive", get(get_alive))
        .route("/:chatid/phase", get(get_phase))
        .route("/:chatid/night-complete", get(night_complete))
        .route("/:chatid/state", get(get_game_state))
        // Room channel
        // websocat ws://localhost:8080/api/werewolf/{chatid}/ws
        .route("/:chatid/ws", get(websocket::handler))
        .with_state(state)
}

async fn create_game(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> impl IntoResponse {
    match werewolf_service::create_game(state, &chat_id, req.player_id, &req.name, req.username)
        .await
    {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn join_game(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> impl IntoResponse {
    match werewolf_service::join_game(state, &chat_id, req.player_id, &req.name, req.username)
        .await
    {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn leave_game(
    State(state): State<AppState>,
    Path((chat_id, player_id)): Path<(String, u64)>,
) -> impl IntoResponse {
    match werewolf_service::leave_game(state, &chat_id, player_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn cancel_game(
    State(state): State<AppState>,
    Path((chat_id, player_id)): Path<(String, u64)>,
) -> impl IntoResponse {
    match werewolf_service::cancel_game(state, &chat_id, player_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn start_game(
    State(state): State<AppState>,
    Path((chat_id, player_id)): Path<(String, u64)>,
) -> impl IntoResponse {
    match werewolf_service::start_game(state, &chat_id, player_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn night_action(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(request): Json<NightActionRequest>,
) -> impl IntoResponse {
    match werewolf_service::night_action(state, &chat_id, request).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn start_voting(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match werewolf_service::start_voting(state, &chat_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn day_vote(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(vote): Json<VoteAction>,
) -> impl IntoResponse {
    match werewolf_service::day_vote(state, &chat_id, vote.voter_id, vote.target_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn hunter_shot(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(shot): Json<ShotAction>,
) -> impl IntoResponse {
    match werewolf_service::hunter_shot(state, &chat_id, shot.hunter_id, shot.target_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn get_role(
    State(state): State<AppState>,
    Path((chat_id, player_id)): Path<(String, u64)>,
) -> impl IntoResponse {
    match werewolf_service::get_player_role(state, &chat_id, player_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn get_players(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match werewolf_service::get_players(state, &chat_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn get_alive(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match werewolf_service::get_alive(state, &chat_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn get_phase(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match werewolf_service::get_phase(state, &chat_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn night_complete(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match werewolf_service::is_night_complete(state, &chat_id).await {
        Ok(complete) => (StatusCode::OK, Json(complete)).into_response(),
        Err(error) => error_response(error).into_response(),
    }
}

async fn get_game_state(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match werewolf_service::get_game_state(state, &chat_id).await {
        Ok(game) => (StatusCode::OK, Json(game)).into_response(),
        Err(error) => error_response(error).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, body::Body, http::Request};
    use tower::ServiceExt;

    fn join_body(player_id: u64, name: &str) -> Body {
        Body::from(
            serde_json::to_vec(&JoinRequest {
                player_id,
                name: name.to_string(),
                username: None,
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_and_join() {
        let state = AppState::new();
        let app = routes(state);

        let request = Request::builder()
            .method("POST")
            .uri("/chat1/create")
            .header("content-type", "application/json")
            .body(join_body(1, "Ana"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/chat1/join")
            .header("content-type", "application/json")
            .body(join_body(2, "Bruno"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: String = serde_json::from_slice(&body).unwrap();
        assert!(message.contains("Bruno joined"));
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let state = AppState::new();
        let app = routes(state);

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let request = Request::builder()
                .method("POST")
                .uri("/chat1/create")
                .header("content-type", "application/json")
                .body(join_body(1, "Ana"))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_unknown_game_is_not_found() {
        let state = AppState::new();
        let app = routes(state);

        let request = Request::builder()
            .method("GET")
            .uri("/nowhere/players")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_start_requires_creator() {
        let state = AppState::new();
        let app = routes(state.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/chat1/create")
            .header("content-type", "application/json")
            .body(join_body(1, "Ana"))
            .unwrap();
        app.clone().oneshot(request).await.unwrap();

        for id in 2..=6 {
            let request = Request::builder()
                .method("POST")
                .uri("/chat1/join")
                .header("content-type", "application/json")
                .body(join_body(id, &format!("P{}", id)))
                .unwrap();
            app.clone().oneshot(request).await.unwrap();
        }

        let request = Request::builder()
            .method("POST")
            .uri("/chat1/start/2")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = Request::builder()
            .method("POST")
            .uri("/chat1/start/1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
