#![cfg(test)]

use rand::{rngs::StdRng, SeedableRng};
use uuid::Uuid;

use crate::cards::{CardCatalog, CardDefinition, CardInstance};

use super::actions::PlayerAction;
use super::engine::{DuelEngine, DuelRules, Transition};
use super::errors::{ActionError, InvariantCheck, StateError};
use super::events::GameEvent;
use super::rules::*;
use super::state::GameState;
use super::types::*;

fn alice() -> PlayerId {
    Uuid::from_u128(0xA11CE)
}

fn bob() -> PlayerId {
    Uuid::from_u128(0xB0B)
}

fn new_duel(seed: u64) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    DuelEngine::initialize(&CardCatalog::builtin(), [alice(), bob()], &mut rng)
}

fn creature(name: &str, attack: i32, health: i32, cost: u32) -> CardInstance {
    let definition = CardDefinition {
        id: 100,
        name: name.to_owned(),
        attack,
        health,
        cost,
        art: String::new(),
        lore: String::new(),
    };
    CardInstance::new(definition, Uuid::new_v4())
}

fn put_in_hand(state: &mut GameState, player: PlayerId, index: usize, card: CardInstance) {
    state.player_mut(player).unwrap().hand[index] = card;
}

/// Places a card that has already survived a turn (no summoning sickness).
fn station(state: &mut GameState, player: PlayerId, slot: usize, card: CardInstance) {
    state.player_mut(player).unwrap().field[slot] = Some(card);
}

fn act(state: &mut GameState, player: PlayerId, action: PlayerAction) -> Transition {
    DuelEngine::apply_action(state, player, action).expect("action should be accepted")
}

fn end_turn(state: &mut GameState, player: PlayerId) -> Transition {
    act(state, player, PlayerAction::EndTurn)
}

#[test]
fn initialize_deals_opening_state_for_both_seats() {
    let st = new_duel(1);
    assert_eq!(st.turn, 1);
    assert_eq!(st.current_player, alice());
    assert_eq!(st.game_phase, Phase::Playing);
    assert_eq!(st.winner, None);
    assert_eq!(st.turn_order, [alice(), bob()]);

    for (id, role) in [(alice(), Role::Player), (bob(), Role::Opponent)] {
        let p = st.player(id).unwrap();
        assert_eq!(p.hand.len(), OPENING_HAND);
        assert_eq!(p.deck.len(), 20 - OPENING_HAND);
        assert_eq!(p.deck_count, 20);
        assert_eq!(p.meridian, Meridian { current: 3, max: 3 });
        assert_eq!(p.occupied_slots(), 0);
        assert_eq!(p.role, role);
    }
    assert_eq!(st.validate_invariants(), Ok(()));
}

#[test]
fn playing_an_affordable_card_spends_meridian_and_marks_sickness() {
    let mut st = new_duel(2);
    put_in_hand(&mut st, alice(), 1, creature("Tentacled Horror", 3, 3, 3));

    let t = act(
        &mut st,
        alice(),
        PlayerAction::PlayCard {
            hand_index: 1,
            field_slot: 2,
        },
    );
    assert!(matches!(t.events()[0], GameEvent::CardPlayed { slot: 2, cost: 3, .. }));

    let p = st.player(alice()).unwrap();
    assert_eq!(p.meridian.current, 0);
    assert_eq!(p.meridian.max, 3);
    assert_eq!(p.hand.len(), 3);
    let placed = p.field_card(2).unwrap();
    assert_eq!(placed.name(), "Tentacled Horror");
    assert!(placed.just_played);
}

#[test]
fn unaffordable_card_is_rejected_without_mutation() {
    let mut st = new_duel(3);
    put_in_hand(&mut st, alice(), 0, creature("Elder Sigil", 4, 2, 4));
    let before = st.clone();

    let err = DuelEngine::apply_action(
        &mut st,
        alice(),
        PlayerAction::PlayCard {
            hand_index: 0,
            field_slot: 0,
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        ActionError::InsufficientMeridian {
            cost: 4,
            available: 3
        }
    );
    assert_eq!(err.to_string(), "Not enough Meridian");
    assert_eq!(st, before);
}

#[test]
fn bad_hand_index_and_slots_are_rejected() {
    let mut st = new_duel(4);
    put_in_hand(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    station(&mut st, alice(), 3, creature("Cosmic Dread", 1, 5, 2));
    let before = st.clone();

    let cases = [
        (
            PlayerAction::PlayCard {
                hand_index: 9,
                field_slot: 0,
            },
            ActionError::InvalidHandIndex { index: 9 },
        ),
        (
            PlayerAction::PlayCard {
                hand_index: 0,
                field_slot: 4,
            },
            ActionError::InvalidFieldSlot { slot: 4 },
        ),
        (
            PlayerAction::PlayCard {
                hand_index: 0,
                field_slot: 3,
            },
            ActionError::InvalidFieldSlot { slot: 3 },
        ),
    ];
    for (action, expected) in cases {
        assert_eq!(
            DuelEngine::apply_action(&mut st, alice(), action),
            Err(expected)
        );
    }
    assert_eq!(st, before);
}

#[test]
fn only_the_current_player_may_act() {
    let mut st = new_duel(5);
    let before = st.clone();
    assert_eq!(
        DuelEngine::apply_action(&mut st, bob(), PlayerAction::EndTurn),
        Err(ActionError::NotPlayersTurn)
    );
    assert_eq!(
        DuelEngine::apply_action(&mut st, Uuid::from_u128(7), PlayerAction::EndTurn),
        Err(ActionError::UnknownPlayer)
    );
    assert_eq!(st, before);
}

#[test]
fn end_turn_strictly_alternates() {
    let mut st = new_duel(6);
    end_turn(&mut st, alice());
    assert_eq!(st.current_player, bob());
    assert_eq!(st.turn, 1);

    let err = DuelEngine::apply_action(&mut st, alice(), PlayerAction::EndTurn).unwrap_err();
    assert_eq!(err, ActionError::NotPlayersTurn);
    assert_eq!(err.to_string(), "Not your turn");

    end_turn(&mut st, bob());
    assert_eq!(st.current_player, alice());
    assert_eq!(st.turn, 2);
}

#[test]
fn meridian_refreshes_from_turn_counter() {
    let mut st = new_duel(7);
    put_in_hand(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    act(
        &mut st,
        alice(),
        PlayerAction::PlayCard {
            hand_index: 0,
            field_slot: 0,
        },
    );
    assert_eq!(st.player(alice()).unwrap().meridian.current, 2);
    end_turn(&mut st, alice());
    assert_eq!(st.player(bob()).unwrap().meridian, Meridian { current: 3, max: 3 });

    end_turn(&mut st, bob());
    assert_eq!(st.turn, 2);
    assert_eq!(st.player(alice()).unwrap().meridian, Meridian { current: 4, max: 4 });

    st.turn = 9;
    end_turn(&mut st, alice());
    assert_eq!(st.turn, 9);
    assert_eq!(st.player(bob()).unwrap().meridian, Meridian { current: 10, max: 10 });

    end_turn(&mut st, bob());
    assert_eq!(st.turn, 10);
    assert_eq!(st.player(alice()).unwrap().meridian.max, MERIDIAN_CAP);
}

#[test]
fn summoning_sickness_wears_off_at_controllers_next_turn() {
    let mut st = new_duel(8);
    put_in_hand(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    station(&mut st, bob(), 0, creature("Cosmic Dread", 1, 5, 2));
    act(
        &mut st,
        alice(),
        PlayerAction::PlayCard {
            hand_index: 0,
            field_slot: 1,
        },
    );

    let attack = PlayerAction::Attack {
        attacker_slot: 1,
        target_slot: Some(0),
    };
    let before = st.clone();
    let err = DuelEngine::apply_action(&mut st, alice(), attack.clone()).unwrap_err();
    assert_eq!(err, ActionError::SummoningSickness { slot: 1 });
    assert_eq!(st, before);

    end_turn(&mut st, alice());
    assert!(st.player(alice()).unwrap().field_card(1).unwrap().just_played);

    end_turn(&mut st, bob());
    assert!(!st.player(alice()).unwrap().field_card(1).unwrap().just_played);
    act(&mut st, alice(), attack);
    assert_eq!(st.player(bob()).unwrap().field_card(0).unwrap().current_health, 3);
}

#[test]
fn mutual_destruction_costs_both_owners_one_deck_count() {
    let mut st = new_duel(9);
    station(&mut st, alice(), 0, creature("Elder Sigil", 4, 2, 4));
    station(&mut st, bob(), 2, creature("Tentacled Horror", 3, 3, 3));

    let t = act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 0,
            target_slot: Some(2),
        },
    );
    assert!(t.events().iter().any(|e| matches!(
        e,
        GameEvent::CombatResolved {
            attacker_health: -1,
            defender_health: -1,
            ..
        }
    )));
    let deaths = t
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::CardDestroyed { .. }))
        .count();
    assert_eq!(deaths, 2);

    let a = st.player(alice()).unwrap();
    let b = st.player(bob()).unwrap();
    assert!(a.field[0].is_none());
    assert!(b.field[2].is_none());
    assert_eq!(a.deck_count, 19);
    assert_eq!(b.deck_count, 19);
    assert_eq!(st.game_phase, Phase::Playing);
}

#[test]
fn surviving_combatants_keep_reduced_health() {
    let mut st = new_duel(10);
    station(&mut st, alice(), 0, creature("Madness Incarnate", 5, 1, 3));
    station(&mut st, bob(), 1, creature("Cosmic Dread", 1, 5, 2));
    station(&mut st, alice(), 3, creature("Cosmic Dread", 1, 5, 2));

    act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 3,
            target_slot: Some(1),
        },
    );
    assert_eq!(st.player(alice()).unwrap().field_card(3).unwrap().current_health, 4);
    assert_eq!(st.player(bob()).unwrap().field_card(1).unwrap().current_health, 4);

    // A second attacker finishes the wounded defender and falls to its counterblow.
    act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 0,
            target_slot: Some(1),
        },
    );
    assert!(st.player(bob()).unwrap().field[1].is_none());
    assert!(st.player(alice()).unwrap().field[0].is_none());
    assert_eq!(st.player(bob()).unwrap().deck_count, 19);
    assert_eq!(st.player(alice()).unwrap().deck_count, 19);
}

#[test]
fn attack_validation_failures_leave_state_untouched() {
    let mut st = new_duel(11);
    station(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    let before = st.clone();

    assert_eq!(
        DuelEngine::apply_action(
            &mut st,
            alice(),
            PlayerAction::Attack {
                attacker_slot: 1,
                target_slot: Some(0)
            }
        ),
        Err(ActionError::EmptyAttackerSlot { slot: 1 })
    );
    assert_eq!(
        DuelEngine::apply_action(
            &mut st,
            alice(),
            PlayerAction::Attack {
                attacker_slot: 0,
                target_slot: Some(0)
            }
        ),
        Err(ActionError::MissingTarget { slot: 0 })
    );
    assert_eq!(
        DuelEngine::apply_action(
            &mut st,
            alice(),
            PlayerAction::Attack {
                attacker_slot: 12,
                target_slot: None
            }
        ),
        Err(ActionError::EmptyAttackerSlot { slot: 12 })
    );
    assert_eq!(st, before);
}

#[test]
fn untargeted_attack_only_records_intent() {
    let mut st = new_duel(12);
    station(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    let before = st.clone();

    let t = act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 0,
            target_slot: None,
        },
    );
    assert_eq!(
        t.events(),
        &[GameEvent::AttackDeclared {
            player: alice(),
            attacker_slot: 0
        }]
    );
    assert_eq!(st, before);
}

#[test]
fn draw_enters_hand_without_touching_deck_count() {
    let mut st = new_duel(13);
    put_in_hand(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    act(
        &mut st,
        alice(),
        PlayerAction::PlayCard {
            hand_index: 0,
            field_slot: 0,
        },
    );
    end_turn(&mut st, alice());
    // Alice is one card short of the limit when her turn comes back around.
    let t = end_turn(&mut st, bob());
    assert!(t.discarded().is_none());

    let a = st.player(alice()).unwrap();
    assert_eq!(a.hand.len(), 4);
    assert_eq!(a.deck.len(), 15);
    assert_eq!(a.deck_count, 20);
}

#[test]
fn full_hand_discards_the_top_card_with_a_notice() {
    let mut st = new_duel(14);
    let top = st.player(bob()).unwrap().deck.last().unwrap().name().to_owned();

    let t = end_turn(&mut st, alice());
    let notice = t.discarded().expect("hand was full");
    assert_eq!(notice.player_id, bob());
    assert_eq!(notice.card_name, top);

    let b = st.player(bob()).unwrap();
    assert_eq!(b.hand.len(), HAND_LIMIT);
    assert_eq!(b.deck.len(), 15);
    assert_eq!(b.deck_count, 20);
}

#[test]
fn empty_deck_draw_is_a_no_op() {
    let mut st = new_duel(15);
    st.player_mut(bob()).unwrap().deck.clear();
    let t = end_turn(&mut st, alice());
    assert!(t.discarded().is_none());
    assert!(!t
        .events()
        .iter()
        .any(|e| matches!(e, GameEvent::CardDrawn { .. } | GameEvent::CardDiscarded(_))));
    assert_eq!(st.player(bob()).unwrap().hand.len(), 4);
    assert_eq!(st.player(bob()).unwrap().deck_count, 20);
}

#[test]
fn combat_death_at_last_deck_count_ends_the_game() {
    let mut st = new_duel(16);
    station(&mut st, alice(), 0, creature("Madness Incarnate", 5, 1, 3));
    station(&mut st, bob(), 0, creature("Void Spawn", 0, 1, 1));
    st.player_mut(bob()).unwrap().deck_count = 1;

    let t = act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 0,
            target_slot: Some(0),
        },
    );
    assert_eq!(t.winner(), Some(alice()));
    assert!(matches!(t, Transition::GameEnded { .. }));
    assert_eq!(st.game_phase, Phase::Ended);
    assert_eq!(st.winner, Some(alice()));
    assert_eq!(st.player(bob()).unwrap().deck_count, 0);
    assert_eq!(st.validate_invariants(), Ok(()));

    let frozen = st.clone();
    for (who, action) in [
        (bob(), PlayerAction::EndTurn),
        (alice(), PlayerAction::EndTurn),
    ] {
        let err = DuelEngine::apply_action(&mut st, who, action).unwrap_err();
        assert_eq!(err, ActionError::GameNotInProgress);
    }
    assert_eq!(st, frozen);
}

#[test]
fn deck_count_is_floored_at_zero() {
    let mut st = new_duel(17);
    station(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    station(&mut st, bob(), 0, creature("Cosmic Dread", 3, 5, 2));
    st.player_mut(alice()).unwrap().deck_count = 0;

    let t = act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 0,
            target_slot: Some(0),
        },
    );
    assert_eq!(st.player(alice()).unwrap().deck_count, 0);
    assert_eq!(t.winner(), Some(bob()));
}

#[test]
fn simultaneous_depletion_awards_the_second_seat() {
    let mut st = new_duel(21);
    station(&mut st, alice(), 1, creature("Elder Sigil", 4, 2, 4));
    station(&mut st, bob(), 3, creature("Tentacled Horror", 3, 3, 3));
    st.player_mut(alice()).unwrap().deck_count = 1;
    st.player_mut(bob()).unwrap().deck_count = 1;

    let t = act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 1,
            target_slot: Some(3),
        },
    );
    assert_eq!(st.player(alice()).unwrap().deck_count, 0);
    assert_eq!(st.player(bob()).unwrap().deck_count, 0);
    assert_eq!(t.winner(), Some(st.turn_order[1]));
    assert_eq!(st.winner, Some(bob()));
    assert_eq!(st.game_phase, Phase::Ended);
    assert_eq!(
        DuelEngine::apply_action(&mut st, bob(), PlayerAction::EndTurn).unwrap_err(),
        ActionError::GameNotInProgress
    );
}

#[test]
fn extreme_attack_values_saturate_instead_of_overflowing() {
    let mut st = new_duel(22);
    station(&mut st, alice(), 0, creature("Void Spawn", 2, 1, 1));
    station(&mut st, bob(), 0, creature("Inverted Horror", i32::MIN, 4, 1));

    let t = act(
        &mut st,
        alice(),
        PlayerAction::Attack {
            attacker_slot: 0,
            target_slot: Some(0),
        },
    );
    let survivor = st.player(alice()).unwrap().field_card(0).unwrap();
    assert_eq!(survivor.current_health, i32::MAX);
    assert_eq!(st.player(bob()).unwrap().field_card(0).unwrap().current_health, 2);
    assert_eq!(t.winner(), None);
}

#[test]
fn invariant_check_flags_oversized_hand() {
    let mut st = new_duel(18);
    let extra = creature("Void Spawn", 2, 1, 1);
    st.player_mut(alice()).unwrap().hand.push(extra);
    assert_eq!(
        st.validate_invariants(),
        Err(StateError::InvariantViolation("hand over limit"))
    );
}

#[test]
fn game_state_uses_camel_case_wire_names() {
    let st = new_duel(19);
    let value = serde_json::to_value(&st).unwrap();
    assert_eq!(value["turn"], 1);
    assert_eq!(value["gamePhase"], "playing");
    assert_eq!(value["currentPlayer"], alice().to_string());
    assert!(value["winner"].is_null());
    let me = &value["players"][alice().to_string()];
    assert_eq!(me["deckCount"], 20);
    assert_eq!(me["meridian"]["current"], 3);
    assert_eq!(me["field"].as_array().unwrap().len(), FIELD_SLOTS);
    assert_eq!(me["role"], "player");
    crate::test_utils::serde::assert_round_trip_eq(&st);
}
