use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_tables::{Cards, LinkedMessages, Messages, Rooms};

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const CLASSIC_ROOM: i32 = 1;

const PERSONS: &[&str] = &[
    "Miss Scarlett",
    "Colonel Mustard",
    "Mrs White",
    "Reverend Green",
    "Mrs Peacock",
    "Professor Plum",
];

const WEAPONS: &[&str] = &["Candlestick", "Dagger", "Lead Pipe", "Revolver", "Rope", "Wrench"];

const PLACES: &[&str] = &[
    "Kitchen",
    "Ballroom",
    "Conservatory",
    "Dining Room",
    "Billiard Room",
    "Library",
    "Lounge",
    "Hall",
    "Study",
];

/// (group, order, text, actions)
const PAGES: &[(&str, i32, &str, &str)] = &[
    (
        "greeting",
        0,
        "Welcome to the mansion. Someone was murdered tonight, and you are here to find out who did it, with what, and where.",
        r#"{"r0:c0": {"name": "Rules", "action": "to_rules"}, "r0:c1": {"name": "Rooms", "action": "to_rooms"}, "r1:c0": {"name": "More", "action": "next"}}"#,
    ),
    (
        "greeting",
        1,
        "Play with friends in a shared room. Every move happens right here in the chat.",
        r#"{"r0:c0": {"name": "Back", "action": "prev"}, "r0:c1": {"name": "Rooms", "action": "to_rooms"}, "r1:c0": {"name": "Leave", "action": "to_exit"}}"#,
    ),
    (
        "rules",
        0,
        "Three cards are hidden: a person, a weapon and a place. The rest is dealt to the players.",
        r#"{"r0:c0": {"name": "Next", "action": "next"}, "r1:c0": {"name": "Home", "action": "to_greeting"}}"#,
    ),
    (
        "rules",
        1,
        "On your turn roll the dice, walk to a place you can reach, then name a suspect and a weapon.",
        r#"{"r0:c0": {"name": "Back", "action": "prev"}, "r0:c1": {"name": "Next", "action": "next"}, "r1:c0": {"name": "Home", "action": "to_greeting"}}"#,
    ),
    (
        "rules",
        2,
        "A suspicion asks the table: everyone holding a named card shows it to you. An accusation is final: right and you win, wrong and you are out.",
        r#"{"r0:c0": {"name": "Back", "action": "prev"}, "r0:c1": {"name": "Rooms", "action": "to_rooms"}, "r1:c0": {"name": "Home", "action": "to_greeting"}}"#,
    ),
    (
        "rooms",
        0,
        "Pick a room to join.",
        r#"{"r0:c0": {"name": "Home", "action": "to_greeting"}}"#,
    ),
    ("room", 0, "Press START once everyone is here.", "{}"),
    (
        "waiting",
        0,
        "The game starts as soon as everyone is ready.",
        r#"{"r0:c0": {"name": "To the game", "action": "to_game"}, "r0:c1": {"name": "Back to room", "action": "to_room"}}"#,
    ),
    (
        "board",
        0,
        "",
        r#"{"r0:c0": {"name": "Hide cards", "action": "hide_state"}, "r0:c1": {"name": "Show cards", "action": "show_state"}, "r1:c0": {"name": "Back to room", "action": "to_room"}}"#,
    ),
];

/// (state name, group)
const LINKS: &[(&str, &str)] = &[
    ("GREETING", "greeting"),
    ("RULES", "rules"),
    ("ROOMS", "rooms"),
    ("ROOM", "room"),
    ("GAME_WAITING", "waiting"),
    ("GAME", "board"),
    ("THROW_DICE", "board"),
    ("SELECT_PLACE", "board"),
    ("ACCUSE_PERSON", "board"),
    ("ACCUSE_WEAPON", "board"),
    ("CONFIRM_ACCUSE", "board"),
    ("CHECK_SUSPICTION", "board"),
    ("CHECK_ACCUSE", "board"),
];

fn seed_error(err: impl std::fmt::Display) -> DbErr {
    DbErr::Custom(err.to_string())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut room = Query::insert();
        room.into_table(Rooms::Table)
            .columns([Rooms::Id, Rooms::Name])
            .values([CLASSIC_ROOM.into(), "Classic Mansion".into()])
            .map_err(seed_error)?;
        manager.exec_stmt(room).await?;

        let mut cards = Query::insert();
        cards
            .into_table(Cards::Table)
            .columns([Cards::RoomId, Cards::Kind, Cards::CardId, Cards::Name]);
        for (kind, names) in [("person", PERSONS), ("weapon", WEAPONS), ("place", PLACES)] {
            for (i, name) in names.iter().enumerate() {
                cards
                    .values([
                        CLASSIC_ROOM.into(),
                        kind.into(),
                        (i as i32 + 1).into(),
                        (*name).into(),
                    ])
                    .map_err(seed_error)?;
            }
        }
        manager.exec_stmt(cards).await?;

        let mut messages = Query::insert();
        messages.into_table(Messages::Table).columns([
            Messages::Name,
            Messages::TextContent,
            Messages::Group,
            Messages::Order,
            Messages::Actions,
        ]);
        for (group, order, text, actions) in PAGES {
            messages
                .values([
                    format!("{}_{}", group, order).into(),
                    (*text).into(),
                    (*group).into(),
                    (*order).into(),
                    (*actions).into(),
                ])
                .map_err(seed_error)?;
        }
        manager.exec_stmt(messages).await?;

        let mut links = Query::insert();
        links
            .into_table(LinkedMessages::Table)
            .columns([LinkedMessages::Name, LinkedMessages::Group]);
        for (name, group) in LINKS {
            links
                .values([(*name).into(), (*group).into()])
                .map_err(seed_error)?;
        }
        manager.exec_stmt(links).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(LinkedMessages::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Messages::Table).to_owned())
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Cards::Table)
                    .and_where(Expr::col(Cards::RoomId).eq(CLASSIC_ROOM))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Rooms::Table)
                    .and_where(Expr::col(Rooms::Id).eq(CLASSIC_ROOM))
                    .to_owned(),
            )
            .await
    }
}
