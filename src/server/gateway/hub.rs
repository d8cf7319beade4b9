use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::cards::CardCatalog;
use crate::config::LobbyConfig;
use crate::engine::duel::{
    ActionError, DuelEngine, DuelRules, GameState, InvariantCheck, Phase, PlayerAction, Role,
    StateError,
};
use crate::lobby::{LobbyError, RegistryStats, RoomCode, RoomRegistry, RoomSummary, MAX_PLAYERS};
use crate::tokio_tools::{spawn_after, spawn_named_task};

use super::error::GatewayError;
use super::messages::{
    ActionRecord, ClientId, ClientRequest, JoinRoomRequest, ServerEnvelope, ServerMessage,
};

const LOG_TARGET: &str = "server::gateway";

/// One encoded `{type, data, timestamp}` frame, shared between recipients.
pub type Frame = Arc<str>;
pub type Outbound = mpsc::UnboundedSender<Frame>;

struct RoomState {
    registry: RoomRegistry,
    rng: StdRng,
}

/// Messages produced while the room lock is held, delivered after it is released.
#[derive(Default)]
struct Outbox {
    messages: Vec<(Vec<ClientId>, ServerMessage)>,
    ended_room: Option<RoomCode>,
}

impl Outbox {
    fn send(&mut self, to: ClientId, message: ServerMessage) {
        self.messages.push((vec![to], message));
    }

    fn broadcast(&mut self, to: &[ClientId], message: ServerMessage) {
        self.messages.push((to.to_vec(), message));
    }
}

enum JoinOutcome {
    Waiting { players: Vec<ClientId> },
    Started { players: Vec<ClientId>, game: GameState },
}

/// Routes client requests to the room registry and the duel engine.
///
/// Every request runs to completion under a single lock, so room state changes strictly
/// in arrival order. Connections only hold the sending half of their outbound queue.
pub struct Gateway {
    rooms: Mutex<RoomState>,
    connections: DashMap<ClientId, Outbound>,
    catalog: Arc<CardCatalog>,
    config: LobbyConfig,
}

impl Gateway {
    pub fn new(catalog: Arc<CardCatalog>, config: LobbyConfig, rng_seed: Option<u64>) -> Self {
        let rng = rng_seed
            .map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);
        Self {
            rooms: Mutex::new(RoomState {
                registry: RoomRegistry::new(config.clone()),
                rng,
            }),
            connections: DashMap::new(),
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn connect(&self, outbound: Outbound) -> ClientId {
        let client = Uuid::new_v4();
        self.connections.insert(client, outbound);
        info!(
            target: LOG_TARGET,
            client_id = %client,
            connections = self.connections.len(),
            "client connected"
        );
        let mut outbox = Outbox::default();
        outbox.send(client, ServerMessage::Connected { client_id: client });
        self.deliver(outbox);
        client
    }

    pub fn handle_text(self: &Arc<Self>, client: ClientId, raw: &str) {
        let mut outbox = Outbox::default();
        let result =
            ClientRequest::parse(raw).and_then(|request| self.route(client, request, &mut outbox));
        if let Err(err) = result {
            self.reject(client, &err, &mut outbox);
        }
        let ended_room = outbox.ended_room.take();
        self.deliver(outbox);
        if let Some(code) = ended_room {
            self.schedule_removal(code);
        }
    }

    /// Forgets the connection. The opponent is told; a room that never started is dropped.
    pub fn disconnect(&self, client: ClientId) {
        self.connections.remove(&client);
        let mut outbox = Outbox::default();
        {
            let mut rooms = self.rooms.lock();
            let registry = &mut rooms.registry;
            if let Some(code) = registry.detach_player(client) {
                let seen =
                    registry.with_room(&code, |room| (room.opponent_of(client), room.status));
                if let Some((opponent, status)) = seen {
                    if let Some(opponent) = opponent {
                        outbox.send(opponent, ServerMessage::OpponentDisconnected {});
                    }
                    if status == Phase::Waiting {
                        registry.remove_room(&code);
                    }
                }
            }
        }
        info!(
            target: LOG_TARGET,
            client_id = %client,
            connections = self.connections.len(),
            "client disconnected"
        );
        self.deliver(outbox);
    }

    fn route(
        &self,
        client: ClientId,
        request: ClientRequest,
        outbox: &mut Outbox,
    ) -> Result<(), GatewayError> {
        match request {
            ClientRequest::JoinRoom(request) => self.join_room(client, request, outbox),
            ClientRequest::PlayerAction(action) => self.player_action(client, action, outbox),
            ClientRequest::Ping => {
                outbox.send(client, ServerMessage::pong());
                Ok(())
            }
        }
    }

    fn join_room(
        &self,
        client: ClientId,
        request: JoinRoomRequest,
        outbox: &mut Outbox,
    ) -> Result<(), GatewayError> {
        let mut rooms = self.rooms.lock();
        let RoomState { registry, rng } = &mut *rooms;

        if let Some(current) = registry.player_room(client).cloned() {
            let live = registry
                .get_room(&current)
                .is_some_and(|room| room.status != Phase::Ended);
            if live {
                return Err(LobbyError::AlreadyInRoom.into());
            }
            registry.detach_player(client);
        }

        let code = match request.room_code {
            Some(code) => {
                if registry.join_room(&code).is_none() {
                    return Err(LobbyError::RoomUnavailable(code).into());
                }
                code
            }
            None => registry.create_room(rng)?,
        };
        let role = registry.add_player(&code, client)?;
        info!(
            target: LOG_TARGET,
            room_code = %code,
            player_id = %client,
            ?role,
            "player joined room"
        );

        let catalog = &self.catalog;
        let outcome = registry
            .with_room(&code, |room| match room.seats() {
                Some(seats) if room.status == Phase::Waiting => {
                    let game = DuelEngine::initialize(catalog, seats, rng);
                    room.game_state = Some(game.clone());
                    room.status = Phase::Playing;
                    JoinOutcome::Started {
                        players: room.players.clone(),
                        game,
                    }
                }
                _ => JoinOutcome::Waiting {
                    players: room.players.clone(),
                },
            })
            .ok_or(GatewayError::JoinFailed("room vanished while seating"))?;

        outbox.send(
            client,
            ServerMessage::PlayerAssigned {
                player_id: client,
                game_room: code.clone(),
            },
        );
        if role == Role::Player {
            outbox.send(client, ServerMessage::RoomCode { code: code.clone() });
        }
        match outcome {
            JoinOutcome::Started { players, game } => {
                info!(target: LOG_TARGET, room_code = %code, "room full, game started");
                outbox.broadcast(&players, ServerMessage::GameStart { game_state: game });
                outbox.broadcast(&players, ServerMessage::OpponentConnected {});
            }
            JoinOutcome::Waiting { players } => {
                outbox.broadcast(
                    &players,
                    ServerMessage::WaitingForOpponent {
                        players_connected: players.len(),
                        players_needed: MAX_PLAYERS,
                    },
                );
            }
        }
        Ok(())
    }

    fn player_action(
        &self,
        client: ClientId,
        action: PlayerAction,
        outbox: &mut Outbox,
    ) -> Result<(), GatewayError> {
        let echo = ActionRecord {
            action: action.clone(),
            player_id: client,
        };
        let kind = action.kind();

        let mut rooms = self.rooms.lock();
        let registry = &mut rooms.registry;
        let code = registry
            .player_room(client)
            .cloned()
            .ok_or(GatewayError::NotInRoom)?;
        let (players, game_state, transition) = registry
            .with_room(&code, |room| {
                let game = room
                    .game_state
                    .as_mut()
                    .ok_or(ActionError::GameNotStarted)?;
                let transition = DuelEngine::apply_action(game, client, action)?;
                game.validate_invariants()
                    .map_err(|StateError::InvariantViolation(detail)| {
                        GatewayError::Internal(detail)
                    })?;
                let snapshot = game.clone();
                if transition.winner().is_some() {
                    room.status = Phase::Ended;
                }
                Ok::<_, GatewayError>((room.players.clone(), snapshot, transition))
            })
            .ok_or(GatewayError::NotInRoom)??;
        drop(rooms);

        debug!(
            target: LOG_TARGET,
            room_code = %code,
            player_id = %client,
            action = ?kind,
            turn = game_state.turn,
            events = transition.events().len(),
            "action applied"
        );
        outbox.broadcast(
            &players,
            ServerMessage::GameStateUpdate {
                game_state: game_state.clone(),
                action: echo,
                discarded_card: transition.discarded().cloned(),
            },
        );
        outbox.send(
            client,
            ServerMessage::ActionSuccess {
                kind,
                game_state: game_state.clone(),
            },
        );
        if let Some(winner) = transition.winner() {
            info!(target: LOG_TARGET, room_code = %code, winner = %winner, "game ended");
            outbox.broadcast(
                &players,
                ServerMessage::GameEnd {
                    winner,
                    final_game_state: game_state,
                },
            );
            outbox.ended_room = Some(code);
        }
        Ok(())
    }

    fn reject(&self, client: ClientId, err: &GatewayError, outbox: &mut Outbox) {
        match err {
            GatewayError::Internal(detail) | GatewayError::JoinFailed(detail) => {
                error!(target: LOG_TARGET, client_id = %client, detail, "request failed");
            }
            _ => debug!(target: LOG_TARGET, client_id = %client, error = %err, "request rejected"),
        }
        outbox.send(client, ServerMessage::error(err.to_string()));
    }

    fn deliver(&self, outbox: Outbox) {
        for (recipients, message) in outbox.messages {
            let frame: Frame = match serde_json::to_string(&ServerEnvelope::now(message)) {
                Ok(json) => json.into(),
                Err(err) => {
                    error!(target: LOG_TARGET, error = %err, "failed to encode outbound message");
                    continue;
                }
            };
            for client in recipients {
                let Some(sender) = self.connections.get(&client) else {
                    continue;
                };
                if sender.send(Arc::clone(&frame)).is_err() {
                    debug!(
                        target: LOG_TARGET,
                        client_id = %client,
                        "connection closed, frame dropped"
                    );
                }
            }
        }
    }

    fn schedule_removal(self: &Arc<Self>, code: RoomCode) {
        let gateway = Arc::downgrade(self);
        let grace = self.config.ended_room_grace;
        spawn_after(format!("reap-room-{code}"), grace, async move {
            if let Some(gateway) = gateway.upgrade() {
                gateway.remove_ended_room(&code);
            }
        });
    }

    fn remove_ended_room(&self, code: &RoomCode) {
        let mut rooms = self.rooms.lock();
        let ended = rooms
            .registry
            .get_room(code)
            .is_some_and(|room| room.status == Phase::Ended);
        if ended {
            rooms.registry.remove_room(code);
        }
    }

    /// Drops rooms idle past the configured limit as of `now`.
    pub fn sweep_idle_rooms(&self, now: Instant) -> usize {
        self.rooms.lock().registry.sweep_expired(now)
    }

    pub fn spawn_sweeper(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let gateway = Arc::clone(self);
        let period = self.config.sweep_interval;
        spawn_named_task("room-sweeper", async move {
            let mut ticker = tokio::time::interval(period);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!(target: LOG_TARGET, "room sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = gateway.sweep_idle_rooms(Instant::now());
                        debug!(target: LOG_TARGET, removed, "idle room sweep finished");
                    }
                }
            }
        })
    }

    pub fn stats(&self) -> RegistryStats {
        self.rooms.lock().registry.stats()
    }

    pub fn room_summaries(&self) -> Vec<RoomSummary> {
        self.rooms.lock().registry.summaries()
    }

    pub fn room_summary(&self, code: &RoomCode) -> Option<RoomSummary> {
        self.rooms.lock().registry.get_room(code).map(|room| room.summary())
    }

    pub fn connected_count(&self) -> usize {
        self.connections.len()
    }

    #[cfg(test)]
    pub(crate) fn with_game<T>(
        &self,
        code: &RoomCode,
        f: impl FnOnce(&mut GameState) -> T,
    ) -> Option<T> {
        self.rooms
            .lock()
            .registry
            .with_room(code, |room| room.game_state.as_mut().map(f))
            .flatten()
    }
}
