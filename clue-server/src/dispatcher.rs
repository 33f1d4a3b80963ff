use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::media_cache::MediaCache;
use crate::render::{Scene, render};
use crate::transport::{ChatTransport, deliver};
use clue_core::{
    Action, CardPool, Game, GameRules, Move, RenderIntent, Step, Table, View, room_in_scope,
    transition,
};
use clue_persistence::Store;
use clue_types::{InboundEvent, Room, RoomId, User, UserState};

/// Room data loaded for one transition
struct Scope {
    room_id: Option<RoomId>,
    room: Option<Room>,
    pool: CardPool,
    game: Option<Game>,
}

/// Top-level boundary for inbound chat events. A failed transition is
/// logged, the user is reset to GREETING and the event is dropped.
pub struct Dispatcher {
    store: Store,
    transport: Arc<dyn ChatTransport>,
    media: Arc<MediaCache>,
    rules: GameRules,
}

impl Dispatcher {
    pub fn new(
        store: Store,
        transport: Arc<dyn ChatTransport>,
        media: Arc<MediaCache>,
        rules: GameRules,
    ) -> Self {
        Self {
            store,
            transport,
            media,
            rules,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn handle_event(&self, event: InboundEvent) {
        let mut user = match self
            .store
            .users
            .find_or_create(event.chat_id, &event.sender_name)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                error!("Failed to load user for chat {}: {:#}", event.chat_id, e);
                return;
            }
        };
        debug!(
            "Event from chat {} (message {:?}): {}",
            event.chat_id, event.message_id, event.payload
        );

        if let Err(e) = self.process(&mut user, &event.payload).await {
            error!(
                "Transition failed for user {} in {}: {:#}",
                user.id, user.state, e
            );
            user.reset();
            if let Err(e) = self.store.users.save(&user).await {
                error!("Failed to reset user {}: {:#}", user.id, e);
            }
        }
    }

    async fn load_scope(&self, room_id: Option<RoomId>) -> Result<Scope> {
        let Some(id) = room_id else {
            return Ok(Scope {
                room_id: None,
                room: None,
                pool: CardPool::default(),
                game: None,
            });
        };

        let room = self.store.rooms.find_by_id(id).await?;
        let pool = self.store.cards.pool_for_room(id).await?;
        let game = match room.as_ref().and_then(|r| r.game_id) {
            Some(game_id) => {
                let game = self.store.games.load(game_id, pool.clone()).await?;
                if game.is_some() {
                    debug!("Restored game {} for room {}", game_id, id);
                }
                game
            }
            None => None,
        };

        Ok(Scope {
            room_id: Some(id),
            room,
            pool,
            game,
        })
    }

    async fn process(&self, user: &mut User, payload: &str) -> Result<()> {
        let action = Action::parse(payload);
        let mut step = transition(user.state, user.substate, &action);
        let mut scope = self.load_scope(room_in_scope(user, &step)).await?;

        if matches!(step, Step::Go(Move::JoinRoom(_))) && scope.room.is_none() {
            debug!("User {} asked for a missing room", user.id);
            step = Step::Ignore;
            scope = self.load_scope(user.room_id).await?;
        }

        let mut others: Vec<User> = match scope.room_id {
            Some(room_id) => self
                .store
                .users
                .find_room_occupants(room_id)
                .await?
                .into_iter()
                .filter(|u| u.id != user.id)
                .collect(),
            None => Vec::new(),
        };

        let applied = {
            let mut rng = StdRng::from_entropy();
            let mut table = Table {
                user: &mut *user,
                others: &mut others,
                game: &mut scope.game,
                pool: &scope.pool,
                rules: &self.rules,
            };
            table.apply(step, &mut rng)?
        };

        if applied.game_changed {
            if let Some(game) = scope.game.as_mut() {
                self.store.games.save_snapshot(game).await?;
            }
        }
        self.store.users.save(user).await?;
        for other in others.iter().filter(|o| applied.others_changed.contains(&o.id)) {
            self.store.users.save(other).await?;
        }

        info!(
            "User {} (chat {}) now in {} [{}]",
            user.id, user.chat_id, user.state, user.substate
        );

        self.deliver_all(user, &mut others, &scope, applied.renders)
            .await;
        Ok(())
    }

    /// Renders and sends every intent. State is already saved, so failures
    /// here are logged and skipped.
    async fn deliver_all(
        &self,
        user: &mut User,
        others: &mut [User],
        scope: &Scope,
        renders: Vec<RenderIntent>,
    ) {
        let mut occupants: Vec<User> = std::iter::once(&*user)
            .chain(others.iter())
            .filter(|u| scope.room_id.is_some() && u.room_id == scope.room_id)
            .cloned()
            .collect();
        occupants.sort_by_key(|u| u.id);

        let wants_rooms = renders.iter().any(|r| {
            matches!(
                r.view,
                View::Pages {
                    state: UserState::Rooms,
                    ..
                }
            )
        });
        let rooms = if wants_rooms {
            self.store.rooms.all().await.unwrap_or_else(|e| {
                warn!("Failed to load rooms for render: {:#}", e);
                Vec::new()
            })
        } else {
            Vec::new()
        };

        for intent in renders {
            let recipient: &mut User = if intent.user_id == user.id {
                &mut *user
            } else {
                match others.iter_mut().find(|o| o.id == intent.user_id) {
                    Some(other) => other,
                    None => {
                        warn!("No recipient {} for render", intent.user_id);
                        continue;
                    }
                }
            };

            let page = match self
                .store
                .content
                .page(recipient.state, recipient.substate)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Failed to load content for {} [{}]: {:#}",
                        recipient.state, recipient.substate, e
                    );
                    None
                }
            };
            let rendered = render(
                &intent.view,
                &Scene {
                    viewer: &*recipient,
                    room: scope.room.as_ref(),
                    occupants: &occupants,
                    rooms: &rooms,
                    game: scope.game.as_ref(),
                    page: page.as_ref(),
                },
            );

            match deliver(
                self.transport.as_ref(),
                &self.media,
                recipient.chat_id,
                recipient.last_message_id,
                rendered,
            )
            .await
            {
                Ok(message_id) => {
                    if recipient.last_message_id != Some(message_id) {
                        recipient.last_message_id = Some(message_id);
                        if let Err(e) = self.store.users.save(recipient).await {
                            error!(
                                "Failed to record message {} for user {}: {:#}",
                                message_id, recipient.id, e
                            );
                        }
                    }
                }
                Err(e) => error!(
                    "Failed to deliver to user {} (chat {}): {}",
                    recipient.id, recipient.chat_id, e
                ),
            }
        }
    }
}
