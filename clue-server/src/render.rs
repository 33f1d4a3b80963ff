use clue_core::{AccusationOutcome, Action, COMPACT_VIEW, Game, GameEvent, Refutation, View};
use clue_persistence::ContentPage;
use clue_types::{Button, Card, Keyboard, Room, User, UserId, UserState};

use crate::transport::Rendered;

const BUTTONS_PER_ROW: usize = 2;

/// Everything a viewer's screen is drawn from
pub struct Scene<'a> {
    pub viewer: &'a User,
    pub room: Option<&'a Room>,
    /// Everyone bound to the room, the viewer included
    pub occupants: &'a [User],
    /// Room list, only loaded for the ROOMS screen
    pub rooms: &'a [Room],
    pub game: Option<&'a Game>,
    pub page: Option<&'a ContentPage>,
}

impl Scene<'_> {
    fn page_text(&self) -> &str {
        self.page.map(|p| p.text.as_str()).unwrap_or_default()
    }

    fn page_keyboard(&self) -> Keyboard {
        self.page.map(|p| p.keyboard.clone()).unwrap_or_default()
    }

    fn media_name(&self) -> Option<String> {
        self.page.and_then(|p| p.media_name.clone())
    }

    fn room_name(&self) -> &str {
        self.room.map(|r| r.name.as_str()).unwrap_or("No room")
    }

    fn occupant_names(&self) -> String {
        self.occupants
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn render(view: &View, scene: &Scene) -> Rendered {
    match view {
        View::Pages { state, .. } => render_pages(*state, scene),
        View::Room => render_room(scene),
        View::Waiting { not_ready } => render_waiting(not_ready, scene),
        View::Board { event } => render_board(event.as_ref(), scene),
        View::Farewell => Rendered {
            text: "Bye!".to_string(),
            keyboard: None,
            media_name: None,
        },
    }
}

fn rows(buttons: Vec<Button>) -> Keyboard {
    let mut keyboard = Keyboard::new();
    for chunk in buttons.chunks(BUTTONS_PER_ROW) {
        keyboard.push_row(chunk.to_vec());
    }
    keyboard
}

fn render_pages(state: UserState, scene: &Scene) -> Rendered {
    let mut keyboard = Keyboard::new();
    if state == UserState::Rooms {
        for room in scene.rooms {
            keyboard.push_row(vec![Button::new(&room.name, Action::Room(room.id.into()).payload())]);
        }
    }
    keyboard.extend(scene.page_keyboard());

    Rendered {
        text: scene.page_text().to_string(),
        keyboard: Some(keyboard),
        media_name: scene.media_name(),
    }
}

fn render_room(scene: &Scene) -> Rendered {
    let mut text = format!("Room: {}\n", scene.room_name());
    if !scene.page_text().is_empty() {
        text.push_str(scene.page_text());
        text.push('\n');
    }
    text.push_str(&format!("Players here: {}", scene.occupant_names()));

    let mut keyboard = Keyboard::new();
    let mut controls = Vec::new();
    if let Some(room) = scene.room {
        controls.push(Button::new("START", Action::Room(room.id.into()).payload()));
    }
    controls.push(Button::new("Leave", Action::ToRooms.payload()));
    keyboard.push_row(controls);
    keyboard.extend(scene.page_keyboard());

    Rendered {
        text,
        keyboard: Some(keyboard),
        media_name: scene.media_name(),
    }
}

fn render_waiting(not_ready: &[UserId], scene: &Scene) -> Rendered {
    let stragglers: Vec<&str> = scene
        .occupants
        .iter()
        .filter(|u| not_ready.contains(&u.id))
        .map(|u| u.name.as_str())
        .collect();

    let mut text = format!(
        "Room: {}\nPlayers here: {}\n",
        scene.room_name(),
        scene.occupant_names()
    );
    if !scene.page_text().is_empty() {
        text.push_str(scene.page_text());
        text.push('\n');
    }
    if stragglers.is_empty() {
        text.push_str("Everybody is ready.");
    } else {
        text.push_str(&format!("Waiting for: {}", stragglers.join(", ")));
    }

    Rendered {
        text,
        keyboard: Some(scene.page_keyboard()),
        media_name: scene.media_name(),
    }
}

fn names(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "none".to_string();
    }
    cards
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn label(game: &Game, user_id: UserId) -> String {
    match game.player_for(user_id) {
        Some(player) => format!("{} ({})", player.alias, player.name),
        None => format!("user {}", user_id),
    }
}

fn alias(game: &Game, user_id: UserId) -> String {
    game.player_for(user_id)
        .map(|p| p.alias.name.clone())
        .unwrap_or_else(|| format!("user {}", user_id))
}

fn render_board(event: Option<&GameEvent>, scene: &Scene) -> Rendered {
    let Some(game) = scene.game else {
        let mut keyboard = Keyboard::new();
        keyboard.push_row(vec![Button::new("Back to room", Action::ToRoom.payload())]);
        return Rendered {
            text: "No game is running in this room.".to_string(),
            keyboard: Some(keyboard),
            media_name: None,
        };
    };

    let mut keyboard = turn_keyboard(game, scene.viewer);
    keyboard.extend(scene.page_keyboard());

    Rendered {
        text: board_text(game, event, scene),
        keyboard: Some(keyboard),
        media_name: scene.media_name(),
    }
}

fn board_text(game: &Game, event: Option<&GameEvent>, scene: &Scene) -> String {
    let viewer = scene.viewer;
    let me = game.player_for(viewer.id);
    let mut lines = vec![format!("Room: {}", scene.room_name())];

    if viewer.substate != COMPACT_VIEW {
        let seated: Vec<String> = game
            .players
            .iter()
            .map(|p| {
                let mut entry = format!("{} ({})", p.alias, p.name);
                if !p.alive {
                    entry.push_str(" [out]");
                }
                entry
            })
            .collect();
        lines.push(format!("Players: {}", seated.join(", ")));
        lines.push(format!("Persons: {}", names(&game.pool.persons)));
        lines.push(format!("Weapons: {}", names(&game.pool.weapons)));
        lines.push(format!("Places: {}", names(&game.pool.places)));
        if !game.open_cards.is_empty() {
            lines.push(format!("Open cards: {}", names(&game.open_cards)));
        }
        if let Some(me) = me {
            lines.push(format!("Your cards: {}", names(&me.hand)));
            lines.push(format!("Known cards: {}", names(&me.known_cards)));
        }
    }

    match me {
        Some(me) => lines.push(format!("You: {} ({}), in {}", me.alias, me.name, me.place)),
        None => lines.push("You are watching this game.".to_string()),
    }

    if let Some(winner) = game.winner() {
        lines.push(format!(
            "{} ({}) solved it: {} with the {} in the {}.",
            winner.alias, winner.name, game.secret.person, game.secret.weapon, game.secret.place
        ));
    } else if game.is_over() {
        lines.push(format!(
            "Everybody is out. It was {} with the {} in the {}.",
            game.secret.person, game.secret.weapon, game.secret.place
        ));
    } else if let Some(current) = game.current_player() {
        lines.push(format!("Turn: {} ({})", current.alias, current.name));
        if current.has_rolled() {
            if current.user_id == viewer.id {
                lines.push(format!(
                    "You rolled {}. You can reach: {}",
                    current.dice_result,
                    names(&current.reachable_places)
                ));
            } else {
                lines.push(format!("{} rolled {}", current.alias, current.dice_result));
            }
        }
        if current.user_id == viewer.id {
            lines.extend(accusation_progress(game, viewer.state));
        }
    }

    match (event, game.suspected_by) {
        (Some(event), _) => lines.extend(event_lines(game, event, viewer.id)),
        (None, Some(accuser)) if viewer.state == UserState::CheckSuspicion => {
            lines.push(format!("Last suspicion by {}:", alias(game, accuser)));
            lines.extend(refutation_lines(game, accuser, &game.refutations, viewer.id));
        }
        _ => {}
    }

    lines.join("\n")
}

fn accusation_progress(game: &Game, state: UserState) -> Option<String> {
    let chosen = |card: &Option<Card>| {
        card.as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "?".to_string())
    };
    let prompt = match state {
        UserState::AccusePerson => "Who did it?",
        UserState::AccuseWeapon => "With what?",
        UserState::ConfirmAccuse => "Suspect or accuse?",
        _ => return None,
    };
    Some(format!(
        "Accusing: {} with the {} in the {}. {}",
        chosen(&game.accused_person),
        chosen(&game.accused_weapon),
        chosen(&game.accused_place),
        prompt
    ))
}

fn event_lines(game: &Game, event: &GameEvent, viewer: UserId) -> Vec<String> {
    match event {
        GameEvent::GameDealt { players } => {
            vec![format!("A new game with {} players has started.", players)]
        }
        GameEvent::DiceThrown { .. } => Vec::new(),
        GameEvent::Moved { user_id, place } => {
            if *user_id == viewer {
                vec![format!("You walk to the {}.", place)]
            } else {
                vec![format!("{} walks to the {}.", alias(game, *user_id), place)]
            }
        }
        GameEvent::SuspicionResolved {
            accuser,
            place,
            person,
            weapon,
            refutations,
            next_turn,
        } => {
            let mut lines = vec![format!(
                "{} suspects {} with the {} in the {}.",
                alias(game, *accuser),
                person,
                weapon,
                place
            )];
            lines.extend(refutation_lines(game, *accuser, refutations, viewer));
            lines.push(format!("Next turn: {}", label(game, *next_turn)));
            lines
        }
        GameEvent::AccusationResolved {
            accuser,
            outcome,
            next_turn,
        } => {
            let mut lines = match outcome {
                AccusationOutcome::Correct => {
                    vec![format!("{} accuses correctly and wins!", alias(game, *accuser))]
                }
                AccusationOutcome::Wrong => {
                    vec![format!("{} accused wrongly and is out.", alias(game, *accuser))]
                }
            };
            if let Some(next) = next_turn {
                lines.push(format!("Next turn: {}", label(game, *next)));
            }
            lines
        }
    }
}

/// Cards are shown to the accuser only; everyone else sees who refuted
fn refutation_lines(
    game: &Game,
    accuser: UserId,
    refutations: &[Refutation],
    viewer: UserId,
) -> Vec<String> {
    if refutations.is_empty() {
        return vec!["Nobody could refute.".to_string()];
    }
    if accuser == viewer {
        return refutations
            .iter()
            .map(|r| format!("{}: {}", alias(game, r.user_id), r.card))
            .collect();
    }
    let mut refuters: Vec<String> = Vec::new();
    for r in refutations {
        let name = alias(game, r.user_id);
        if !refuters.contains(&name) {
            refuters.push(name);
        }
    }
    vec![format!("Refuted by: {}", refuters.join(", "))]
}

/// Phase buttons, only for the turn holder of a running game
fn turn_keyboard(game: &Game, viewer: &User) -> Keyboard {
    let Some(current) = game.current_player() else {
        return Keyboard::new();
    };
    if game.is_over() || current.user_id != viewer.id {
        return Keyboard::new();
    }

    let buttons = match viewer.state {
        UserState::Game | UserState::CheckSuspicion => {
            vec![Button::new("Roll the dice", Action::ThrowDice.payload())]
        }
        UserState::ThrowDice => vec![Button::new("Choose a place", Action::SelectPlace.payload())],
        UserState::SelectPlace => current
            .reachable_places
            .iter()
            .map(|p| Button::new(&p.name, Action::NewLocation(p.id.into()).payload()))
            .collect(),
        UserState::AccusePerson => game
            .pool
            .persons
            .iter()
            .map(|p| Button::new(&p.name, Action::AccusedPerson(p.id.into()).payload()))
            .collect(),
        UserState::AccuseWeapon => game
            .pool
            .weapons
            .iter()
            .map(|w| Button::new(&w.name, Action::AccusedWeapon(w.id.into()).payload()))
            .collect(),
        UserState::ConfirmAccuse => vec![
            Button::new("Suspect", Action::Suspicion.payload()),
            Button::new("Accuse", Action::Accuse(1).payload()),
        ],
        _ => Vec::new(),
    };
    rows(buttons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clue_core::{CardPool, GameRules, Seat};
    use clue_types::CardKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool() -> CardPool {
        let mut cards = Vec::new();
        for id in 1..=3 {
            cards.push(Card::new(CardKind::Person, id, 1, format!("Person {}", id)));
            cards.push(Card::new(CardKind::Weapon, id, 1, format!("Weapon {}", id)));
            cards.push(Card::new(CardKind::Place, id, 1, format!("Place {}", id)));
        }
        CardPool::new(cards)
    }

    fn user(id: UserId, state: UserState) -> User {
        User {
            id,
            name: format!("User {}", id),
            chat_id: id.into(),
            state,
            substate: 0,
            room_id: Some(1),
            last_message_id: None,
        }
    }

    fn room() -> Room {
        Room {
            id: 1,
            name: "Classic Mansion".to_string(),
            game_id: None,
        }
    }

    fn game() -> Game {
        let mut rng = StdRng::seed_from_u64(5);
        let seats = vec![Seat::new(1, "User 1"), Seat::new(2, "User 2")];
        Game::deal(1, pool(), seats, &GameRules::default(), &mut rng).unwrap()
    }

    fn draw(view: &View, viewer: &User, game: Option<&Game>) -> Rendered {
        let room = room();
        let occupants = vec![user(1, UserState::Room), user(2, UserState::Room)];
        let scene = Scene {
            viewer,
            room: Some(&room),
            occupants: &occupants,
            rooms: std::slice::from_ref(&room),
            game,
            page: None,
        };
        render(view, &scene)
    }

    #[test]
    fn test_room_lists_occupants_and_start() {
        let viewer = user(1, UserState::Room);
        let rendered = draw(&View::Room, &viewer, None);
        assert!(rendered.text.contains("Classic Mansion"));
        assert!(rendered.text.contains("User 1, User 2"));
        let keyboard = rendered.keyboard.unwrap();
        let payloads: Vec<&str> = keyboard.payloads().collect();
        assert_eq!(payloads, vec![r#"{"room": 1}"#, "to_rooms"]);
    }

    #[test]
    fn test_rooms_screen_offers_every_room() {
        let viewer = user(1, UserState::Rooms);
        let rendered = draw(&View::Pages { state: UserState::Rooms, page: 0 }, &viewer, None);
        let keyboard = rendered.keyboard.unwrap();
        assert_eq!(keyboard.rows[0][0].label, "Classic Mansion");
        assert_eq!(keyboard.rows[0][0].payload, r#"{"room": 1}"#);
    }

    #[test]
    fn test_waiting_names_stragglers() {
        let viewer = user(1, UserState::GameWaiting);
        let rendered = draw(&View::Waiting { not_ready: vec![2] }, &viewer, None);
        assert!(rendered.text.contains("Waiting for: User 2"));
    }

    #[test]
    fn test_farewell_clears_keyboard() {
        let viewer = user(1, UserState::Exit);
        let rendered = draw(&View::Farewell, &viewer, None);
        assert_eq!(rendered.text, "Bye!");
        assert_eq!(rendered.keyboard, None);
    }

    #[test]
    fn test_only_turn_holder_gets_dice_button() {
        let game = game();
        let holder = game.current_player().unwrap().user_id;
        let idle = if holder == 1 { 2 } else { 1 };

        let rendered = draw(&View::Board { event: None }, &user(holder, UserState::Game), Some(&game));
        assert!(rendered.keyboard.unwrap().payloads().any(|p| p == "throw_dice"));

        let rendered = draw(&View::Board { event: None }, &user(idle, UserState::Game), Some(&game));
        assert!(rendered.keyboard.unwrap().is_empty());
    }

    #[test]
    fn test_compact_view_hides_cards() {
        let game = game();
        let mut viewer = user(1, UserState::Game);

        let full = draw(&View::Board { event: None }, &viewer, Some(&game));
        assert!(full.text.contains("Your cards:"));

        viewer.substate = COMPACT_VIEW;
        let compact = draw(&View::Board { event: None }, &viewer, Some(&game));
        assert!(!compact.text.contains("Your cards:"));
        assert!(compact.text.contains("You: "));
        assert!(compact.text.contains("Turn: "));
    }

    #[test]
    fn test_suspicion_result_per_viewer() {
        let game = game();
        let card = game.players[1].hand[0].clone();
        let event = GameEvent::SuspicionResolved {
            accuser: game.players[0].user_id,
            place: game.pool.places[0].clone(),
            person: game.pool.persons[0].clone(),
            weapon: game.pool.weapons[0].clone(),
            refutations: vec![Refutation {
                user_id: game.players[1].user_id,
                player_number: 1,
                card: card.clone(),
            }],
            next_turn: game.players[1].user_id,
        };
        let view = View::Board { event: Some(event) };
        let refuter_alias = game.players[1].alias.name.clone();

        let accuser = user(game.players[0].user_id, UserState::CheckSuspicion);
        let seen = draw(&view, &accuser, Some(&game)).text;
        assert!(seen.contains(&format!("{}: {}", refuter_alias, card.name)));

        let observer = user(game.players[1].user_id, UserState::Game);
        let seen = draw(&view, &observer, Some(&game)).text;
        assert!(seen.contains(&format!("Refuted by: {}", refuter_alias)));
        assert!(!seen.contains(&format!("{}: {}", refuter_alias, card.name)));
    }

    #[test]
    fn test_redrawn_board_keeps_suspicion_result() {
        let mut game = game();
        let card = game.players[1].hand[0].clone();
        game.refutations = vec![Refutation {
            user_id: game.players[1].user_id,
            player_number: 1,
            card: card.clone(),
        }];
        game.suspected_by = Some(game.players[0].user_id);
        let view = View::Board { event: None };
        let refuter_alias = game.players[1].alias.name.clone();

        let mut accuser = user(game.players[0].user_id, UserState::CheckSuspicion);
        accuser.substate = COMPACT_VIEW;
        let seen = draw(&view, &accuser, Some(&game)).text;
        assert!(seen.contains("Last suspicion by "));
        assert!(seen.contains(&format!("{}: {}", refuter_alias, card.name)));

        // other states do not repeat it
        let idle = user(game.players[1].user_id, UserState::Game);
        assert!(!draw(&view, &idle, Some(&game)).text.contains("Last suspicion"));
    }
}
