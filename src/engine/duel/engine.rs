use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use crate::cards::{generate_deck, CardCatalog};

use super::actions::*;
use super::errors::*;
use super::events::*;
use super::rules::*;
use super::seating::Seating;
use super::state::*;
use super::types::*;

const LOG_TARGET: &str = "engine::duel";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Continued {
        events: Vec<GameEvent>,
        discarded: Option<DiscardedCard>,
    },
    GameEnded {
        events: Vec<GameEvent>,
        discarded: Option<DiscardedCard>,
        winner: PlayerId,
    },
}

impl Transition {
    pub fn events(&self) -> &[GameEvent] {
        match self {
            Transition::Continued { events, .. } | Transition::GameEnded { events, .. } => events,
        }
    }

    pub fn discarded(&self) -> Option<&DiscardedCard> {
        match self {
            Transition::Continued { discarded, .. } | Transition::GameEnded { discarded, .. } => {
                discarded.as_ref()
            }
        }
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Transition::GameEnded { winner, .. } => Some(*winner),
            Transition::Continued { .. } => None,
        }
    }
}

pub trait DuelRules {
    fn initialize<R: Rng + ?Sized>(
        catalog: &CardCatalog,
        seats: [PlayerId; 2],
        rng: &mut R,
    ) -> GameState;

    /// Validates `action` against the current state and applies it. On error the state
    /// is left untouched.
    fn apply_action(
        state: &mut GameState,
        actor: PlayerId,
        action: PlayerAction,
    ) -> Result<Transition, ActionError>;
}

pub struct DuelEngine;

fn opening_player_state<R: Rng + ?Sized>(
    catalog: &CardCatalog,
    seat: usize,
    rng: &mut R,
) -> PlayerState {
    let mut deck = generate_deck(catalog, rng);
    let hand_size = OPENING_HAND.min(deck.len());
    let hand = deck.split_off(deck.len() - hand_size).into_iter().rev().collect();
    PlayerState {
        hand,
        field: Default::default(),
        deck,
        meridian: Meridian::full(STARTING_MERIDIAN),
        deck_count: STARTING_DECK_COUNT,
        role: Role::for_seat(seat),
    }
}

fn play_card(
    state: &mut GameState,
    actor: PlayerId,
    hand_index: usize,
    field_slot: usize,
    events: &mut Vec<GameEvent>,
) -> Result<(), ActionError> {
    let player = state.player_mut(actor).ok_or(ActionError::UnknownPlayer)?;
    let cost = player
        .hand
        .get(hand_index)
        .map(|card| card.cost())
        .ok_or(ActionError::InvalidHandIndex { index: hand_index })?;
    if field_slot >= FIELD_SLOTS || player.field[field_slot].is_some() {
        return Err(ActionError::InvalidFieldSlot { slot: field_slot });
    }
    if player.meridian.current < cost {
        return Err(ActionError::InsufficientMeridian {
            cost,
            available: player.meridian.current,
        });
    }

    let mut card = player.hand.remove(hand_index);
    card.just_played = true;
    player.meridian.current -= cost;
    debug!(
        target: LOG_TARGET,
        player_id = %actor,
        card = card.name(),
        slot = field_slot,
        meridian = player.meridian.current,
        "card played"
    );
    events.push(GameEvent::CardPlayed {
        player: actor,
        card: card.instance_id,
        slot: field_slot,
        cost,
    });
    player.field[field_slot] = Some(card);
    Ok(())
}

fn attack(
    state: &mut GameState,
    actor: PlayerId,
    attacker_slot: usize,
    target_slot: Option<usize>,
    events: &mut Vec<GameEvent>,
) -> Result<(), ActionError> {
    let defender_id = state.opponent_of(actor).ok_or(ActionError::UnknownPlayer)?;
    let attacker = state
        .player(actor)
        .and_then(|p| p.field_card(attacker_slot))
        .ok_or(ActionError::EmptyAttackerSlot {
            slot: attacker_slot,
        })?;
    if attacker.just_played {
        return Err(ActionError::SummoningSickness {
            slot: attacker_slot,
        });
    }
    let attacker_power = attacker.attack();

    let Some(target_slot) = target_slot else {
        // Direct attacks carry no resolution rule; record the intent only.
        events.push(GameEvent::AttackDeclared {
            player: actor,
            attacker_slot,
        });
        return Ok(());
    };

    let defender_power = state
        .player(defender_id)
        .and_then(|p| p.field_card(target_slot))
        .map(|card| card.attack())
        .ok_or(ActionError::MissingTarget { slot: target_slot })?;

    // Both blows use pre-damage attack values.
    let attacker_health = strike(state, actor, attacker_slot, defender_power);
    let defender_health = strike(state, defender_id, target_slot, attacker_power);
    debug!(
        target: LOG_TARGET,
        attacker_slot,
        target_slot,
        attacker_health,
        defender_health,
        "combat resolved"
    );
    events.push(GameEvent::CombatResolved {
        attacker_slot,
        target_slot,
        attacker_health,
        defender_health,
    });

    bury_if_destroyed(state, actor, attacker_slot, events);
    bury_if_destroyed(state, defender_id, target_slot, events);
    Ok(())
}

fn strike(state: &mut GameState, owner: PlayerId, slot: usize, damage: i32) -> i32 {
    match state.player_mut(owner).and_then(|p| p.field_card_mut(slot)) {
        Some(card) => {
            card.current_health = card.current_health.saturating_sub(damage);
            card.current_health
        }
        None => 0,
    }
}

fn bury_if_destroyed(
    state: &mut GameState,
    owner: PlayerId,
    slot: usize,
    events: &mut Vec<GameEvent>,
) {
    let Some(player) = state.player_mut(owner) else {
        return;
    };
    let destroyed = player
        .field_card(slot)
        .map(|card| card.is_destroyed())
        .unwrap_or(false);
    if !destroyed {
        return;
    }
    if let Some(card) = player.field[slot].take() {
        player.deck_count = player.deck_count.saturating_sub(1);
        debug!(
            target: LOG_TARGET,
            player_id = %owner,
            card = card.name(),
            deck_count = player.deck_count,
            "card destroyed"
        );
        events.push(GameEvent::CardDestroyed {
            owner,
            slot,
            card: card.instance_id,
            deck_count: player.deck_count,
        });
    }
}

fn end_turn(
    state: &mut GameState,
    actor: PlayerId,
    events: &mut Vec<GameEvent>,
) -> Result<Option<DiscardedCard>, ActionError> {
    let rotation = state.next_to_act(actor).ok_or(ActionError::UnknownPlayer)?;
    let turn = if rotation.completed_cycle {
        state.turn + 1
    } else {
        state.turn
    };

    let next = rotation.next;
    let player = state.player_mut(next).ok_or(ActionError::UnknownPlayer)?;
    player.meridian = Meridian::full(meridian_for_turn(turn));
    for card in player.field.iter_mut().flatten() {
        card.just_played = false;
    }

    let mut discarded = None;
    if let Some(card) = player.deck.pop() {
        if player.hand.len() < HAND_LIMIT {
            player.hand.push(card);
            events.push(GameEvent::CardDrawn { player: next });
        } else {
            debug!(
                target: LOG_TARGET,
                player_id = %next,
                card = card.name(),
                "hand full, card discarded"
            );
            let notice = DiscardedCard {
                player_id: next,
                card_name: card.definition.name,
            };
            events.push(GameEvent::CardDiscarded(notice.clone()));
            discarded = Some(notice);
        }
    }

    state.turn = turn;
    state.current_player = next;
    events.push(GameEvent::TurnPassed {
        from: actor,
        to: next,
        turn,
    });
    debug!(target: LOG_TARGET, turn, player_id = %next, "turn passed");
    Ok(discarded)
}

impl DuelRules for DuelEngine {
    fn initialize<R: Rng + ?Sized>(
        catalog: &CardCatalog,
        seats: [PlayerId; 2],
        rng: &mut R,
    ) -> GameState {
        let players: BTreeMap<PlayerId, PlayerState> = seats
            .iter()
            .enumerate()
            .map(|(seat, id)| (*id, opening_player_state(catalog, seat, rng)))
            .collect();
        GameState {
            turn: 1,
            current_player: seats[0],
            game_phase: Phase::Playing,
            winner: None,
            turn_order: seats,
            players,
        }
    }

    fn apply_action(
        state: &mut GameState,
        actor: PlayerId,
        action: PlayerAction,
    ) -> Result<Transition, ActionError> {
        if state.game_phase != Phase::Playing {
            return Err(ActionError::GameNotInProgress);
        }
        if !state.players.contains_key(&actor) {
            return Err(ActionError::UnknownPlayer);
        }
        if state.current_player != actor {
            return Err(ActionError::NotPlayersTurn);
        }

        let mut events = Vec::new();
        let mut discarded = None;
        match action {
            PlayerAction::PlayCard {
                hand_index,
                field_slot,
            } => play_card(state, actor, hand_index, field_slot, &mut events)?,
            PlayerAction::Attack {
                attacker_slot,
                target_slot,
            } => attack(state, actor, attacker_slot, target_slot, &mut events)?,
            PlayerAction::EndTurn => discarded = end_turn(state, actor, &mut events)?,
        }

        if let Some(winner) = deck_depletion_winner(state) {
            state.game_phase = Phase::Ended;
            state.winner = Some(winner);
            events.push(GameEvent::GameWon { winner });
            debug!(target: LOG_TARGET, winner = %winner, "deck depleted, game over");
            return Ok(Transition::GameEnded {
                events,
                discarded,
                winner,
            });
        }

        debug_assert_eq!(state.validate_invariants(), Ok(()));
        Ok(Transition::Continued { events, discarded })
    }
}
