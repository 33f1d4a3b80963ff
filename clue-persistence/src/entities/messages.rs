use sea_orm::entity::prelude::*;

/// One page of screen content
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_content: Option<String>,
    pub media_name: Option<String>,
    pub group: Option<String>,
    pub order: Option<i32>,
    /// `{"r<row>:c<col>": {"name": label, "action": payload}}`
    #[sea_orm(column_type = "Text", nullable)]
    pub actions: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
