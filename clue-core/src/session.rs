use clue_types::{GameError, RoomId, User, UserId, UserState};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    CardPool, Game, GameEvent, GameRules, Move, RenderIntent, Step, View, players_not_ready,
    seats_for,
};

/// Everything one transition may touch, loaded by the caller for the room
/// in scope (see [`room_in_scope`])
pub struct Table<'a> {
    pub user: &'a mut User,
    /// Other occupants of the room in scope
    pub others: &'a mut [User],
    pub game: &'a mut Option<Game>,
    pub pool: &'a CardPool,
    pub rules: &'a GameRules,
}

#[derive(Debug, Default)]
pub struct Applied {
    pub renders: Vec<RenderIntent>,
    /// The game must be persisted as a new snapshot
    pub game_changed: bool,
    /// Occupants whose rows were moved along (pull-in on game start)
    pub others_changed: Vec<UserId>,
}

/// The room whose occupants, cards and game a step needs
pub fn room_in_scope(user: &User, step: &Step) -> Option<RoomId> {
    match step {
        Step::Go(Move::JoinRoom(id)) => Some(*id),
        _ => user.room_id,
    }
}

/// What a user sees in their current state when nothing happened
pub fn current_view(user: &User, others: &[User]) -> View {
    match user.state {
        UserState::Greeting | UserState::Rules | UserState::Rooms => View::Pages {
            state: user.state,
            page: user.substate,
        },
        UserState::Room => View::Room,
        UserState::GameWaiting => View::Waiting {
            not_ready: players_not_ready(others, user.id).iter().map(|u| u.id).collect(),
        },
        UserState::Exit => View::Farewell,
        _ => View::Board { event: None },
    }
}

impl Table<'_> {
    pub fn apply<R: Rng + ?Sized>(&mut self, step: Step, rng: &mut R) -> Result<Applied, GameError> {
        let mut applied = Applied::default();

        match step {
            Step::Ignore => {
                debug!("User {} input ignored in {}", self.user.id, self.user.state);
                self.render_actor(&mut applied, None);
            }
            Step::SubState(substate) => {
                self.user.substate = substate;
                self.render_actor(&mut applied, None);
            }
            Step::Go(Move::Navigate(state)) => {
                self.user.state = state;
                self.user.substate = 0;
                self.render_actor(&mut applied, None);
                if state == UserState::Room {
                    self.broadcast_room(&mut applied);
                }
            }
            Step::Go(Move::JoinRoom(room_id)) => {
                info!("User {} joins room {}", self.user.id, room_id);
                self.user.room_id = Some(room_id);
                self.user.state = UserState::Room;
                self.user.substate = 0;
                self.render_actor(&mut applied, None);
                self.broadcast_room(&mut applied);
            }
            Step::Go(Move::LeaveRoom) => {
                info!("User {} leaves room {:?}", self.user.id, self.user.room_id);
                self.user.room_id = None;
                self.user.state = UserState::Rooms;
                self.user.substate = 0;
                self.render_actor(&mut applied, None);
                self.broadcast_room(&mut applied);
            }
            Step::Go(Move::StartMatch) => {
                let not_ready = players_not_ready(&*self.others, self.user.id);
                if not_ready.is_empty() {
                    self.enter_game(rng, &mut applied)?;
                } else {
                    let not_ready: Vec<UserId> = not_ready.iter().map(|u| u.id).collect();
                    info!("User {} waits for {:?}", self.user.id, not_ready);
                    self.user.state = UserState::GameWaiting;
                    self.user.substate = 0;
                    applied
                        .renders
                        .push(RenderIntent::new(self.user.id, View::Waiting { not_ready }));
                    self.broadcast_room(&mut applied);
                }
            }
            Step::Go(Move::EnterGame) => self.enter_game(rng, &mut applied)?,
            Step::Go(turn) => self.play(turn, rng, &mut applied)?,
        }

        Ok(applied)
    }

    fn render_actor(&self, applied: &mut Applied, event: Option<GameEvent>) {
        let view = match current_view(&*self.user, &*self.others) {
            View::Board { .. } => View::Board { event },
            other => other,
        };
        applied.renders.push(RenderIntent::new(self.user.id, view));
    }

    fn broadcast_room(&self, applied: &mut Applied) {
        for other in self.others.iter().filter(|u| u.state == UserState::Room) {
            applied.renders.push(RenderIntent::new(other.id, View::Room));
        }
    }

    fn broadcast_board(&self, applied: &mut Applied, event: &Option<GameEvent>) {
        for other in self.others.iter().filter(|u| u.state.is_in_game()) {
            applied.renders.push(RenderIntent::new(
                other.id,
                View::Board {
                    event: event.clone(),
                },
            ));
        }
    }

    /// Deals a fresh game when the room has none running, then pulls the
    /// lobby into the board. Users without a seat watch a running game.
    fn enter_game<R: Rng + ?Sized>(&mut self, rng: &mut R, applied: &mut Applied) -> Result<(), GameError> {
        let room_id = self.user.room_id.ok_or(GameError::NotInRoom {
            user_id: self.user.id,
        })?;

        let needs_deal = self.game.as_ref().is_none_or(|game| game.is_over());

        let event = if needs_deal {
            let seats = seats_for(&*self.user, &*self.others);
            let game = Game::deal(room_id, self.pool.clone(), seats, self.rules, rng)?;
            let players = game.player_count();
            *self.game = Some(game);
            applied.game_changed = true;
            Some(GameEvent::GameDealt { players })
        } else {
            let seated = self
                .game
                .as_ref()
                .is_some_and(|game| game.player_for(self.user.id).is_some());
            if seated {
                debug!("User {} rejoins the running game in room {}", self.user.id, room_id);
            } else {
                debug!("User {} watches the running game in room {}", self.user.id, room_id);
            }
            None
        };

        for other in self.others.iter_mut() {
            let pull = match other.state {
                UserState::Room | UserState::GameWaiting => true,
                state => needs_deal && state.is_in_game(),
            };
            if pull {
                other.state = UserState::Game;
                other.substate = 0;
                applied.others_changed.push(other.id);
            }
        }

        self.user.state = UserState::Game;
        self.user.substate = 0;
        self.render_actor(applied, event.clone());
        self.broadcast_board(applied, &event);
        Ok(())
    }

    /// Turn actions. Only the turn holder of a running game moves anything;
    /// everyone else, and any rejected card id, gets a plain re-render.
    fn play<R: Rng + ?Sized>(&mut self, turn: Move, rng: &mut R, applied: &mut Applied) -> Result<(), GameError> {
        let room_id = self.user.room_id.ok_or(GameError::NotInRoom {
            user_id: self.user.id,
        })?;
        let Some(game) = self.game.as_mut() else {
            return Err(GameError::NoActiveGame { room_id });
        };

        if game.is_over() || !game.is_turn_of(self.user.id) {
            debug!("User {} acted out of turn in room {}", self.user.id, room_id);
            self.render_actor(applied, None);
            return Ok(());
        }

        let result = match &turn {
            Move::ThrowDice => game.throw_dice(self.rules, rng).map(Some),
            Move::SelectPlace => Ok(None),
            Move::MoveTo(place_id) => game.move_current_player(*place_id).map(Some),
            Move::Suspect(person_id) => game.choose_person(*person_id).map(|_| None),
            Move::Arm(weapon_id) => game.choose_weapon(*weapon_id).map(|_| None),
            Move::Suspicion => game.resolve_suspicion().map(Some),
            Move::Accusation => game.resolve_accusation().map(Some),
            other => {
                debug!("{:?} is not a turn action", other);
                Ok(None)
            }
        };

        let event = match result {
            Ok(event) => event,
            Err(err @ GameError::CorruptRecord { .. }) => return Err(err),
            Err(err) => {
                debug!("User {} move {:?} rejected: {}", self.user.id, turn, err);
                self.render_actor(applied, None);
                return Ok(());
            }
        };

        if let Some(target) = turn.target() {
            self.user.state = target;
        }
        applied.game_changed = true;
        self.render_actor(applied, event.clone());
        self.broadcast_board(applied, &event);
        Ok(())
    }
}
