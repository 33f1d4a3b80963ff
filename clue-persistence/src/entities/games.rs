use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub room_id: i32,
    #[sea_orm(column_type = "Text")]
    pub secret: String,
    #[sea_orm(column_type = "Text")]
    pub distances: String,
    #[sea_orm(column_type = "Text")]
    pub open_cards: String,
    pub started: bool,
    pub won: bool,
    pub turn_number: i32,
    pub accuse_place: Option<i32>,
    pub accuse_person: Option<i32>,
    pub accuse_weapon: Option<i32>,
    pub winner: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub suspicion: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::players::Entity")]
    Players,
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
