mod common;

use clue_core::{AccusationOutcome, GameEvent, GameRules};
use clue_types::{Card, CardKind};
use common::*;
use std::collections::HashSet;

fn identities(cards: &[Card]) -> Vec<(CardKind, i32)> {
    cards.iter().map(|c| (c.kind, c.id)).collect()
}

#[test]
fn test_classic_three_player_deal() {
    let game = deal_game(3, 1);

    assert_eq!(game.player_count(), 3);
    assert!(game.open_cards.is_empty());
    // 21 cards minus the secret, split three ways
    for player in &game.players {
        assert_eq!(player.hand.len(), 6);
        assert_eq!(player.known_cards, player.hand);
    }
    assert_eq!(game.distances.len(), 9);
}

#[test]
fn test_dealt_cards_partition_the_pool() {
    for players in 1..=6 {
        for seed in 0..5 {
            let game = deal_game(players, seed);
            let mut seen = HashSet::new();

            let secret = [&game.secret.person, &game.secret.weapon, &game.secret.place];
            let dealt = game.players.iter().flat_map(|p| p.hand.iter());
            for card in secret.into_iter().chain(game.open_cards.iter()).chain(dealt) {
                assert!(seen.insert((card.kind, card.id)), "{} dealt twice", card);
            }

            let remainder = (21 - 3) % players as usize;
            assert_eq!(seen.len(), 21 - remainder);
        }
    }
}

#[test]
fn test_open_cards_from_rules_table() {
    let mut rng = rng(8);
    let rules = GameRules {
        dice_faces: 6,
        open_cards: vec![0, 0, 2, 0, 2],
    };
    let game = clue_core::Game::deal(1, classic_pool(), seats(4), &rules, &mut rng).unwrap();
    assert_eq!(game.open_cards.len(), 2);
    assert!(game.players.iter().all(|p| p.hand.len() == 4));
}

#[test]
fn test_aliases_and_places() {
    for seed in 0..10 {
        let game = deal_game(6, seed);
        let aliases: HashSet<_> = game.players.iter().map(|p| p.alias.id).collect();
        assert_eq!(aliases.len(), 6);
        for player in &game.players {
            assert_eq!(player.alias.kind, CardKind::Person);
            assert!(game.pool.places.iter().any(|p| p.is(&player.place)));
        }
    }
}

#[test]
fn test_turn_advances_once_per_suspicion() {
    let mut game = deal_game(4, 12);
    let initial = game.turn_number;

    for k in 1..=9 {
        game.choose_person(1).unwrap();
        game.choose_weapon(1).unwrap();
        let event = game.resolve_suspicion().unwrap();
        assert!(matches!(event, GameEvent::SuspicionResolved { .. }));
        assert_eq!(game.turn_number, (initial + k) % 4);
    }
}

#[test]
fn test_dice_and_movement_keep_the_turn() {
    let mut game = deal_game(3, 4);
    let initial = game.turn_number;
    let mut rng = rng(99);

    game.throw_dice(&GameRules::default(), &mut rng).unwrap();
    let target = game.current_player().unwrap().reachable_places[0].id;
    game.move_current_player(target).unwrap();

    assert_eq!(game.turn_number, initial);
    assert_eq!(game.current_player().unwrap().place.id, target);
}

#[test]
fn test_suspicion_collects_every_match() {
    let mut game = deal_game(3, 2);
    let pool = game.pool.clone();
    let hall = card(&pool, CardKind::Place, 4);
    let plum = card(&pool, CardKind::Person, 2);
    let rope = card(&pool, CardKind::Weapon, 5);

    game.turn_number = 0;
    game.players[0].place = hall.clone();
    rig_hands(
        &mut game,
        vec![
            vec![plum.clone(), card(&pool, CardKind::Weapon, 1)],
            vec![card(&pool, CardKind::Person, 6), rope.clone(), hall.clone()],
            vec![hall.clone()],
        ],
    );
    game.choose_person(2).unwrap();
    game.choose_weapon(5).unwrap();

    let refutations = game.check_suspicion(0).unwrap();
    let pairs: Vec<_> = refutations
        .iter()
        .map(|r| (r.player_number, r.card.kind, r.card.id))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (1, CardKind::Place, 4),
            (1, CardKind::Weapon, 5),
            (2, CardKind::Place, 4),
        ]
    );
    assert!(refutations.iter().all(|r| !game.players[0].holds(&r.card)));
}

#[test]
fn test_single_refutation_teaches_one_card() {
    let mut game = deal_game(3, 6);
    let pool = game.pool.clone();

    game.turn_number = 1;
    game.players[1].place = card(&pool, CardKind::Place, 4);
    rig_hands(
        &mut game,
        vec![
            vec![card(&pool, CardKind::Person, 2), card(&pool, CardKind::Place, 1)],
            vec![card(&pool, CardKind::Weapon, 1)],
            vec![card(&pool, CardKind::Person, 3), card(&pool, CardKind::Place, 2)],
        ],
    );
    game.choose_person(2).unwrap();
    game.choose_weapon(5).unwrap();
    let before = game.players[1].known_cards.len();

    let event = game.resolve_suspicion().unwrap();
    let GameEvent::SuspicionResolved {
        refutations,
        next_turn,
        ..
    } = event
    else {
        panic!("expected a suspicion result");
    };

    assert_eq!(refutations.len(), 1);
    assert_eq!(refutations[0].user_id, game.players[0].user_id);
    assert_eq!(game.players[1].known_cards.len(), before + 1);
    assert_eq!(next_turn, game.players[2].user_id);
}

#[test]
fn test_known_cards_grow_on_repeat_suspicions() {
    let mut game = deal_game(2, 3);
    let pool = game.pool.clone();
    let knife = card(&pool, CardKind::Weapon, 2);
    rig_hands(&mut game, vec![vec![knife.clone()], vec![knife.clone()]]);
    game.choose_person(1).unwrap();
    game.choose_weapon(2).unwrap();

    let start = game.turn_number;
    game.resolve_suspicion().unwrap();
    game.resolve_suspicion().unwrap();
    game.resolve_suspicion().unwrap();

    // each player asked at least once, the first asker twice
    let asker = &game.players[start];
    assert_eq!(
        identities(&asker.known_cards),
        vec![(CardKind::Weapon, 2), (CardKind::Weapon, 2), (CardKind::Weapon, 2)]
    );
}

#[test]
fn test_correct_accusation_wins() {
    let mut game = deal_game(3, 10);
    let secret = game.secret.clone();
    let accuser = game.turn_number;
    game.players[accuser].place = secret.place.clone();
    game.choose_person(secret.person.id).unwrap();
    game.choose_weapon(secret.weapon.id).unwrap();

    let event = game.resolve_accusation().unwrap();
    let user_id = game.players[accuser].user_id;
    assert_eq!(
        event,
        GameEvent::AccusationResolved {
            accuser: user_id,
            outcome: AccusationOutcome::Correct,
            next_turn: None,
        }
    );
    assert!(game.won);
    assert_eq!(game.winner, Some(user_id));
    assert_eq!(game.winner().map(|p| p.number), Some(accuser));
    assert!(game.players.iter().all(|p| p.alive));
}

#[test]
fn test_wrong_accusation_eliminates() {
    let mut game = deal_game(3, 10);
    let secret = game.secret.clone();
    let accuser = game.turn_number;
    game.players[accuser].place = secret.place.clone();
    game.choose_person(secret.person.id).unwrap();
    let wrong_weapon = game
        .pool
        .weapons
        .iter()
        .find(|w| !w.is(&secret.weapon))
        .unwrap()
        .id;
    game.choose_weapon(wrong_weapon).unwrap();

    let event = game.resolve_accusation().unwrap();
    assert!(matches!(
        event,
        GameEvent::AccusationResolved {
            outcome: AccusationOutcome::Wrong,
            next_turn: Some(_),
            ..
        }
    ));
    assert!(!game.won);
    assert!(game.winner.is_none());
    assert!(!game.players[accuser].alive);
    assert_eq!(game.turn_number, (accuser + 1) % 3);
    assert!(game.current_player().unwrap().alive);
}

#[test]
fn test_last_player_out_ends_the_game() {
    let mut game = deal_game(1, 5);
    let secret = game.secret.clone();
    game.players[0].place = secret.place.clone();
    let wrong_person = game.pool.persons.iter().find(|p| !p.is(&secret.person)).unwrap().id;
    game.choose_person(wrong_person).unwrap();
    game.choose_weapon(secret.weapon.id).unwrap();

    let event = game.resolve_accusation().unwrap();
    assert!(matches!(
        event,
        GameEvent::AccusationResolved { next_turn: None, .. }
    ));
    assert!(game.is_over());
    assert!(game.resolve_suspicion().is_err());
}
