use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::lobby::RoomCode;

const LOG_TARGET: &str = "server::error";

#[derive(Debug)]
pub enum ApiError {
    RoomNotFound(RoomCode),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::RoomNotFound(code) => {
                debug!(target: LOG_TARGET, room_code = %code, "room lookup missed");
                (StatusCode::NOT_FOUND, format!("Room {code} not found")).into_response()
            }
        }
    }
}
