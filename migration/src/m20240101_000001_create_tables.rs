use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::GameId).uuid().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::ChatId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::State)
                            .string()
                            .not_null()
                            .default("GREETING"),
                    )
                    .col(
                        ColumnDef::new(Users::Substate)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::RoomId).integer().null())
                    .col(ColumnDef::new(Users::LastMessageId).big_integer().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Occupant lookups on every room render
        manager
            .create_index(
                Index::create()
                    .name("idx_users_room_id")
                    .table(Users::Table)
                    .col(Users::RoomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cards::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cards::RoomId).integer().not_null())
                    .col(ColumnDef::new(Cards::Kind).string().not_null())
                    .col(ColumnDef::new(Cards::CardId).integer().not_null())
                    .col(ColumnDef::new(Cards::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_room_kind_card")
                    .table(Cards::Table)
                    .col(Cards::RoomId)
                    .col(Cards::Kind)
                    .col(Cards::CardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::RoomId).integer().not_null())
                    .col(ColumnDef::new(Games::Secret).text().not_null())
                    .col(ColumnDef::new(Games::Distances).text().not_null())
                    .col(ColumnDef::new(Games::OpenCards).text().not_null())
                    .col(
                        ColumnDef::new(Games::Started)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::Won)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::TurnNumber)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Games::AccusePlace).integer().null())
                    .col(ColumnDef::new(Games::AccusePerson).integer().null())
                    .col(ColumnDef::new(Games::AccuseWeapon).integer().null())
                    .col(ColumnDef::new(Games::Winner).integer().null())
                    .col(ColumnDef::new(Games::Suspicion).text().null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Players::GameId).uuid().not_null())
                    .col(ColumnDef::new(Players::UserId).integer().not_null())
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(ColumnDef::new(Players::Number).integer().not_null())
                    .col(ColumnDef::new(Players::Cards).text().not_null())
                    .col(ColumnDef::new(Players::KnownCards).text().not_null())
                    .col(ColumnDef::new(Players::Alias).integer().not_null())
                    .col(ColumnDef::new(Players::Place).integer().not_null())
                    .col(
                        ColumnDef::new(Players::DiceResult)
                            .integer()
                            .not_null()
                            .default(-1),
                    )
                    .col(
                        ColumnDef::new(Players::Alive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_game_id")
                            .from(Players::Table, Players::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_game_id")
                    .table(Players::Table)
                    .col(Players::GameId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::Name).string().not_null())
                    .col(ColumnDef::new(Messages::TextContent).text().null())
                    .col(ColumnDef::new(Messages::MediaName).string().null())
                    .col(ColumnDef::new(Messages::Group).string().null())
                    .col(ColumnDef::new(Messages::Order).integer().null())
                    .col(ColumnDef::new(Messages::Actions).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LinkedMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LinkedMessages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LinkedMessages::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LinkedMessages::Group).string().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkedMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Rooms {
    Table,
    Id,
    Name,
    GameId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    ChatId,
    State,
    Substate,
    RoomId,
    LastMessageId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Cards {
    Table,
    Id,
    RoomId,
    Kind,
    CardId,
    Name,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    RoomId,
    Secret,
    Distances,
    OpenCards,
    Started,
    Won,
    TurnNumber,
    AccusePlace,
    AccusePerson,
    AccuseWeapon,
    Winner,
    Suspicion,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    GameId,
    UserId,
    Name,
    Number,
    Cards,
    KnownCards,
    Alias,
    Place,
    DiceResult,
    Alive,
}

#[derive(DeriveIden)]
pub(crate) enum Messages {
    Table,
    Id,
    Name,
    TextContent,
    MediaName,
    Group,
    Order,
    Actions,
}

#[derive(DeriveIden)]
pub(crate) enum LinkedMessages {
    Table,
    Id,
    Name,
    Group,
}
