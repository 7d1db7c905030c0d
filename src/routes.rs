use axum::{http::StatusCode, Json, Router};

use crate::error::{ErrorKind, GameError};
use crate::state::AppState;

mod impostor;
mod werewolf;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/api/werewolf", werewolf::routes(state.clone()))
        .nest("/api/impostor", impostor::routes(state.clone()))
}

/// Turns a game error into the response the chat front end relays.
pub(crate) fn error_response(error: GameError) -> (StatusCode, Json<String>) {
    let status = match error.kind() {
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::Phase => StatusCode::CONFLICT,
        ErrorKind::Target => StatusCode::BAD_REQUEST,
        ErrorKind::State => {
            if error == GameError::GameNotFound {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            }
        }
    };
    (status, Json(error.to_string()))
}
