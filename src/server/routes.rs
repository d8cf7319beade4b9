use std::sync::Arc;

use axum::extract::Path;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cards::CardCatalog;
use crate::lobby::{RoomCode, RoomSummary};

use super::dto::{HealthResponse, RoomsResponse};
use super::error::ApiError;
use super::gateway::{ws_handler, Gateway};
use super::logging::log_requests;

/// Axum facade: the `/ws` game socket plus read-only JSON endpoints.
pub struct EldritchServer {
    router: Router,
}

impl EldritchServer {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        let router = Router::new()
            .route("/ws", get(ws_handler))
            .route("/api/cards", get(get_cards))
            .route("/api/health", get(get_health))
            .route("/api/rooms", get(list_rooms))
            .route("/api/rooms/:code", get(get_room))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .layer(middleware::from_fn(log_requests))
                    .layer(Extension(gateway)),
            );

        Self { router }
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn get_cards(Extension(gateway): Extension<Arc<Gateway>>) -> Json<CardCatalog> {
    Json(gateway.catalog().clone())
}

async fn get_health(Extension(gateway): Extension<Arc<Gateway>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        active_rooms: gateway.stats().active_rooms,
        connected_players: gateway.connected_count(),
    })
}

async fn list_rooms(Extension(gateway): Extension<Arc<Gateway>>) -> Json<RoomsResponse> {
    Json(RoomsResponse {
        stats: gateway.stats(),
        rooms: gateway.room_summaries(),
    })
}

async fn get_room(
    Extension(gateway): Extension<Arc<Gateway>>,
    Path(code): Path<RoomCode>,
) -> Result<Json<RoomSummary>, ApiError> {
    gateway
        .room_summary(&code)
        .map(Json)
        .ok_or(ApiError::RoomNotFound(code))
}
