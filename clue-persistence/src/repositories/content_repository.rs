use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::entities::{linked_messages, messages, prelude::*};
use clue_types::{Button, Keyboard, UserState};

/// One page of a screen's content, buttons already laid out
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPage {
    pub name: String,
    pub text: String,
    pub media_name: Option<String>,
    pub keyboard: Keyboard,
}

#[derive(Debug, Deserialize)]
struct ActionSpec {
    name: String,
    action: String,
}

/// `"r1:c0"` -> `(1, 0)`
fn parse_position(key: &str) -> Option<(u32, u32)> {
    let (row, col) = key.split_once(':')?;
    let row = row.strip_prefix('r')?.parse().ok()?;
    let col = col.strip_prefix('c')?.parse().ok()?;
    Some((row, col))
}

/// Lays out `{"r<row>:c<col>": {"name": .., "action": ..}}` as keyboard rows
pub fn parse_actions(src: &str) -> Keyboard {
    let specs: BTreeMap<String, ActionSpec> = match serde_json::from_str(src) {
        Ok(specs) => specs,
        Err(e) => {
            warn!("Ignoring malformed content actions: {}", e);
            return Keyboard::new();
        }
    };

    let mut positioned: BTreeMap<(u32, u32), Button> = BTreeMap::new();
    for (key, spec) in specs {
        match parse_position(&key) {
            Some(position) => {
                positioned.insert(position, Button::new(spec.name, spec.action));
            }
            None => warn!("Ignoring content action with bad position '{}'", key),
        }
    }

    let mut keyboard = Keyboard::new();
    let mut current_row = None;
    let mut row = Vec::new();
    for ((r, _), button) in positioned {
        if current_row.is_some_and(|current| current != r) {
            keyboard.push_row(std::mem::take(&mut row));
        }
        current_row = Some(r);
        row.push(button);
    }
    keyboard.push_row(row);
    keyboard
}

#[derive(Clone)]
pub struct ContentRepository {
    db: DatabaseConnection,
}

impl ContentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_page(model: messages::Model) -> ContentPage {
        ContentPage {
            name: model.name,
            text: model.text_content.unwrap_or_default(),
            media_name: model.media_name,
            keyboard: model
                .actions
                .as_deref()
                .map(parse_actions)
                .unwrap_or_default(),
        }
    }

    /// Pages linked to a state, in display order
    pub async fn pages_for(&self, state: UserState) -> Result<Vec<ContentPage>> {
        let link = LinkedMessages::find()
            .filter(linked_messages::Column::Name.eq(state.as_str()))
            .one(&self.db)
            .await?;

        let Some(group) = link.and_then(|l| l.group) else {
            return Ok(Vec::new());
        };

        let pages = Messages::find()
            .filter(messages::Column::Group.eq(group))
            .order_by_asc(messages::Column::Order)
            .order_by_asc(messages::Column::Id)
            .all(&self.db)
            .await?;

        Ok(pages.into_iter().map(Self::model_to_page).collect())
    }

    /// Page at `substate`, clamped to the last page
    pub async fn page(&self, state: UserState, substate: i32) -> Result<Option<ContentPage>> {
        let mut pages = self.pages_for(state).await?;
        if pages.is_empty() {
            return Ok(None);
        }
        let index = usize::try_from(substate).unwrap_or(0).min(pages.len() - 1);
        Ok(Some(pages.swap_remove(index)))
    }
}
