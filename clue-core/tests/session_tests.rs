mod common;

use clue_core::{
    Action, Applied, CardPool, Game, GameEvent, GameRules, RenderIntent, Table, View, transition,
};
use clue_types::{User, UserState};
use common::*;
use rand::rngs::StdRng;

struct Session {
    pool: CardPool,
    rules: GameRules,
    rng: StdRng,
    game: Option<Game>,
}

impl Session {
    fn new(seed: u64) -> Self {
        Self {
            pool: classic_pool(),
            rules: GameRules::default(),
            rng: rng(seed),
            game: None,
        }
    }

    fn send(&mut self, user: &mut User, others: &mut [User], payload: &str) -> Applied {
        let step = transition(user.state, user.substate, &Action::parse(payload));
        let mut table = Table {
            user,
            others,
            game: &mut self.game,
            pool: &self.pool,
            rules: &self.rules,
        };
        table.apply(step, &mut self.rng).expect("transition should apply")
    }
}

#[test]
fn test_negative_room_is_a_no_op() {
    let mut session = Session::new(1);
    let mut user = test_user(1, UserState::Rooms);
    user.room_id = None;
    user.substate = 2;

    let applied = session.send(&mut user, &mut [], r#"{"room": -1}"#);
    assert_eq!(user.state, UserState::Rooms);
    assert_eq!(user.substate, 2);
    assert_eq!(
        applied.renders,
        vec![RenderIntent::new(
            1,
            View::Pages {
                state: UserState::Rooms,
                page: 2
            }
        )]
    );
}

#[test]
fn test_join_room_binds_it() {
    let mut session = Session::new(1);
    let mut user = test_user(1, UserState::Rooms);
    user.room_id = None;

    session.send(&mut user, &mut [], r#"{"room": 3}"#);
    assert_eq!(user.state, UserState::Room);
    assert_eq!(user.room_id, Some(3));
}

#[test]
fn test_exit_then_greeting() {
    let mut session = Session::new(1);
    let mut user = test_user(1, UserState::Greeting);
    user.room_id = None;

    let applied = session.send(&mut user, &mut [], "to_exit");
    assert_eq!(user.state, UserState::Exit);
    assert_eq!(applied.renders[0].view, View::Farewell);

    session.send(&mut user, &mut [], "hello again");
    assert_eq!(user.state, UserState::Greeting);
    assert_eq!(user.substate, 0);
}

#[test]
fn test_full_turn_through_the_machine() {
    let mut session = Session::new(7);
    let mut alice = test_user(1, UserState::Room);
    let mut bob = test_user(2, UserState::GameWaiting);

    session.send(&mut alice, std::slice::from_mut(&mut bob), r#"{"room": 1}"#);
    assert_eq!(alice.state, UserState::Game);
    assert_eq!(bob.state, UserState::Game);

    let holder = session.game.as_ref().unwrap().current_player().unwrap().user_id;
    let (actor, other) = if holder == alice.id {
        (&mut alice, &mut bob)
    } else {
        (&mut bob, &mut alice)
    };
    let others = std::slice::from_mut(other);
    let initial_turn = session.game.as_ref().unwrap().turn_number;

    let applied = session.send(actor, others, "throw_dice");
    assert_eq!(actor.state, UserState::ThrowDice);
    assert!(matches!(
        applied.renders[0].view,
        View::Board {
            event: Some(GameEvent::DiceThrown { .. })
        }
    ));
    // the observer sees the roll too
    assert_eq!(applied.renders.len(), 2);

    session.send(actor, others, "select_place");
    assert_eq!(actor.state, UserState::SelectPlace);

    let target = session.game.as_ref().unwrap().current_player().unwrap().reachable_places[0].id;
    session.send(actor, others, &format!(r#"{{"new_location": {}}}"#, target));
    assert_eq!(actor.state, UserState::AccusePerson);

    session.send(actor, others, r#"{"accused_person": 2}"#);
    assert_eq!(actor.state, UserState::AccuseWeapon);
    session.send(actor, others, r#"{"accused_weapon": 5}"#);
    assert_eq!(actor.state, UserState::ConfirmAccuse);

    let applied = session.send(actor, others, r#"{"suspiction": {}}"#);
    assert_eq!(actor.state, UserState::CheckSuspicion);
    assert!(applied.game_changed);

    let game = session.game.as_ref().unwrap();
    assert_eq!(game.turn_number, (initial_turn + 1) % 2);
    assert_eq!(game.current_player().unwrap().place.id, target);
    assert_ne!(game.current_player().unwrap().user_id, actor.id);
}

#[test]
fn test_unknown_place_is_ignored() {
    let mut session = Session::new(3);
    let mut solo = test_user(1, UserState::Room);
    session.send(&mut solo, &mut [], r#"{"room": 1}"#);
    session.send(&mut solo, &mut [], "throw_dice");
    session.send(&mut solo, &mut [], "select_place");

    let applied = session.send(&mut solo, &mut [], r#"{"new_location": 77}"#);
    assert_eq!(solo.state, UserState::SelectPlace);
    assert!(!applied.game_changed);
}

#[test]
fn test_board_toggle_keeps_game_state() {
    let mut session = Session::new(3);
    let mut solo = test_user(1, UserState::Room);
    session.send(&mut solo, &mut [], r#"{"room": 1}"#);

    let turn = session.game.as_ref().unwrap().turn_number;
    let applied = session.send(&mut solo, &mut [], "hide_state");
    assert_eq!(solo.state, UserState::Game);
    assert_eq!(solo.substate, 1);
    assert!(!applied.game_changed);

    session.send(&mut solo, &mut [], "show_state");
    assert_eq!(solo.substate, 0);
    assert_eq!(session.game.as_ref().unwrap().turn_number, turn);
}

#[test]
fn test_new_deal_after_a_win() {
    let mut session = Session::new(5);
    let mut solo = test_user(1, UserState::Room);
    session.send(&mut solo, &mut [], r#"{"room": 1}"#);

    let game = session.game.as_mut().unwrap();
    let first_id = game.id;
    let secret = game.secret.clone();
    game.players[0].place = secret.place.clone();
    game.choose_person(secret.person.id).unwrap();
    game.choose_weapon(secret.weapon.id).unwrap();
    solo.state = UserState::ConfirmAccuse;

    session.send(&mut solo, &mut [], r#"{"accuse": 1}"#);
    assert_eq!(solo.state, UserState::CheckAccuse);
    assert!(session.game.as_ref().unwrap().won);

    // turn actions are over once someone has won
    solo.state = UserState::Game;
    let applied = session.send(&mut solo, &mut [], "throw_dice");
    assert!(!applied.game_changed);

    session.send(&mut solo, &mut [], "to_room");
    session.send(&mut solo, &mut [], r#"{"room": 1}"#);
    let game = session.game.as_ref().unwrap();
    assert_ne!(game.id, first_id);
    assert!(!game.won);
}

#[test]
fn test_newcomer_watches_running_game() {
    let mut session = Session::new(11);
    let mut alice = test_user(1, UserState::Room);
    let mut bob = test_user(2, UserState::GameWaiting);
    session.send(&mut alice, std::slice::from_mut(&mut bob), r#"{"room": 1}"#);

    let holder = session.game.as_ref().unwrap().current_player().unwrap().user_id;
    let (actor, other) = if holder == alice.id {
        (&mut alice, &mut bob)
    } else {
        (&mut bob, &mut alice)
    };
    session.send(actor, std::slice::from_mut(other), "throw_dice");
    let actor_state = actor.state;

    let before = session.game.clone().unwrap();
    let mut carol = test_user(3, UserState::GameWaiting);
    let mut seated = vec![alice.clone(), bob.clone()];
    let applied = session.send(&mut carol, &mut seated, "to_game");

    assert_eq!(carol.state, UserState::Game);
    assert!(!applied.game_changed);
    assert!(applied.others_changed.is_empty());

    let game = session.game.as_ref().unwrap();
    assert_eq!(game.id, before.id);
    assert_eq!(game.secret, before.secret);
    assert_eq!(game.player_count(), 2);
    assert_eq!(game.turn_number, before.turn_number);
    assert!(game.player_for(carol.id).is_none());
    for (now, then) in game.players.iter().zip(&before.players) {
        assert_eq!(now.user_id, then.user_id);
        assert_eq!(now.hand, then.hand);
    }
    // the turn holder is left mid-turn
    let holder = seated.iter().find(|u| u.id == holder).unwrap();
    assert_eq!(holder.state, actor_state);
}
