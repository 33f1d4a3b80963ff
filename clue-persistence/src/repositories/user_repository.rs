use anyhow::Result;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::info;

use crate::entities::{prelude::*, users};
use clue_types::{ChatId, RoomId, User, UserId, UserState};

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            name: model.name,
            chat_id: model.chat_id,
            state: UserState::from_name(&model.state),
            substate: model.substate,
            room_id: model.room_id,
            last_message_id: model.last_message_id,
        }
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_chat_id(&self, chat_id: ChatId) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::ChatId.eq(chat_id))
            .one(&self.db)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    /// First contact: a fresh user in GREETING
    pub async fn create_user(&self, chat_id: ChatId, name: &str) -> Result<User> {
        let now = chrono::Utc::now().into();
        let user_model = users::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name.to_string()),
            chat_id: ActiveValue::Set(chat_id),
            state: ActiveValue::Set(UserState::Greeting.as_str().to_string()),
            substate: ActiveValue::Set(0),
            room_id: ActiveValue::Set(None),
            last_message_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let saved_model = Users::insert(user_model).exec(&self.db).await?;

        let created_user = Users::find_by_id(saved_model.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        info!("Created user {} for chat {}", created_user.id, chat_id);
        Ok(Self::model_to_user(created_user))
    }

    pub async fn find_or_create(&self, chat_id: ChatId, name: &str) -> Result<User> {
        match self.find_by_chat_id(chat_id).await? {
            Some(user) => Ok(user),
            None => self.create_user(chat_id, name).await,
        }
    }

    /// Writes the session columns back
    pub async fn save(&self, user: &User) -> Result<()> {
        let updated_user = users::ActiveModel {
            id: ActiveValue::Unchanged(user.id),
            name: ActiveValue::Set(user.name.clone()),
            chat_id: ActiveValue::Unchanged(user.chat_id),
            state: ActiveValue::Set(user.state.as_str().to_string()),
            substate: ActiveValue::Set(user.substate),
            room_id: ActiveValue::Set(user.room_id),
            last_message_id: ActiveValue::Set(user.last_message_id),
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        Users::update(updated_user).exec(&self.db).await?;
        Ok(())
    }

    pub async fn find_room_occupants(&self, room_id: RoomId) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(users::Column::RoomId.eq(room_id))
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }
}
