use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::services::impostor_service;
use crate::state::AppState;

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

pub fn routes(state: AppState) -> Router {
    Router::new()
        // curl -X POST http://localhost:8080/api/impostor/{chatid}/create -d '{"player_id":1,"name":"Ana"}'
        .route("/:chatid/create", post(create_game))
        .route("/:chatid/join", post(join_game))
        .route("/:chatid/leave/:playerid", post(leave_game))
        .route("/:chatid/start/:playerid", post(start_game))
        .route("/:chatid/start-voting", post(start_voting))
        .route("/:chatid/vote", post(vote))
        .route("/:chatid/role/:playerid", get(get_role))
        .route("/:chatid/players", get(get_players))
        .with_state(state)
}

async fn create_game(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> impl IntoResponse {
    match impostor_service::create_game(state, &chat_id, req.player_id, &req.name, req.username)
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
    match impostor_service::join_game(state, &chat_id, req.player_id, &req.name, req.username)
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
    match impostor_service::leave_game(state, &chat_id, player_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn start_game(
    State(state): State<AppState>,
    Path((chat_id, player_id)): Path<(String, u64)>,
) -> impl IntoResponse {
    match impostor_service::start_game(state, &chat_id, player_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn start_voting(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match impostor_service::start_voting(state, &chat_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn vote(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<VoteAction>,
) -> impl IntoResponse {
    match impostor_service::vote(state, &chat_id, req.voter_id, req.target_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn get_role(
    State(state): State<AppState>,
    Path((chat_id, player_id)): Path<(String, u64)>,
) -> impl IntoResponse {
    match impostor_service::get_player_role(state, &chat_id, player_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
    }
}

async fn get_players(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> impl IntoResponse {
    match impostor_service::get_players(state, &chat_id).await {
        Ok(message) => (StatusCode::OK, Json(message)),
        Err(error) => error_response(error),
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
    async fn test_full_lobby_flow() {
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

        for (id, name) in [(2, "Bruno"), (3, "Clara")] {
            let request = Request::builder()
                .method("POST")
                .uri("/chat1/join")
                .header("content-type", "application/json")
                .body(join_body(id, name))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let request = Request::builder()
            .method("POST")
            .uri("/chat1/start/1")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("GET")
            .uri("/chat1/role/2")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: String = serde_json::from_slice(&body).unwrap();
        assert!(message.contains("secret word") || message.contains("IMPOSTOR"));
    }
}
