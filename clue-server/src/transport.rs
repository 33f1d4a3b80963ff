use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::media_cache::MediaCache;
use clue_types::{ChatId, Keyboard, MessageId, OutboundMessage};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("message can't be edited")]
    CantEdit,
    #[error("message is not modified")]
    NotModified,
    #[error("delivery failed: {0}")]
    Failed(String),
}

/// Gateway acknowledgement of a sent or edited message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub message_id: MessageId,
    /// Remote id of uploaded media, reusable on later sends
    pub media_id: Option<String>,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<Delivered, TransportError>;
    /// Replaces `message.message_id` in place
    async fn edit(&self, message: &OutboundMessage) -> Result<Delivered, TransportError>;
}

/// A rendered screen ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    /// `None` clears the keyboard
    pub keyboard: Option<Keyboard>,
    pub media_name: Option<String>,
}

/// Edits the recipient's last message when there is one, otherwise sends.
/// An edit the chat refuses becomes a new message; an unchanged message
/// counts as delivered. Returns the message the recipient now sees.
pub async fn deliver(
    transport: &dyn ChatTransport,
    media: &MediaCache,
    chat_id: ChatId,
    last_message_id: Option<MessageId>,
    rendered: Rendered,
) -> Result<MessageId, TransportError> {
    let mut message = OutboundMessage {
        chat_id,
        message_id: last_message_id,
        text: rendered.text,
        keyboard: rendered.keyboard,
        media: rendered.media_name.as_deref().map(|name| media.resolve(name)),
    };

    let delivered = match last_message_id {
        Some(message_id) => match transport.edit(&message).await {
            Ok(delivered) => delivered,
            Err(TransportError::NotModified) => {
                warn!("Message {} in chat {} not modified", message_id, chat_id);
                return Ok(message_id);
            }
            Err(TransportError::CantEdit) => {
                warn!(
                    "Can't edit message {} in chat {}, sending a new one",
                    message_id, chat_id
                );
                message.message_id = None;
                transport.send(&message).await?
            }
            Err(e) => return Err(e),
        },
        None => transport.send(&message).await?,
    };

    if let (Some(name), Some(media_id)) = (rendered.media_name.as_deref(), &delivered.media_id) {
        media.remember(name, media_id);
    }
    Ok(delivered.message_id)
}

#[derive(Debug, Deserialize)]
struct GatewayReply {
    status: String,
    message_id: Option<MessageId>,
    media_id: Option<String>,
}

/// Posts messages as JSON to a chat gateway at `{base_url}/send` and
/// `{base_url}/edit`
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, message: &OutboundMessage) -> Result<Delivered, TransportError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Posting message for chat {} to {}", message.chat_id, url);

        let response = self
            .client
            .post(&url)
            .json(message)
            .send()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        let reply: GatewayReply = response
            .json()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        match reply.status.as_str() {
            "ok" => Ok(Delivered {
                message_id: reply
                    .message_id
                    .or(message.message_id)
                    .ok_or_else(|| TransportError::Failed("reply without message id".to_string()))?,
                media_id: reply.media_id,
            }),
            "cant_edit" => Err(TransportError::CantEdit),
            "not_modified" => Err(TransportError::NotModified),
            other => Err(TransportError::Failed(other.to_string())),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<Delivered, TransportError> {
        self.post("send", message).await
    }

    async fn edit(&self, message: &OutboundMessage) -> Result<Delivered, TransportError> {
        self.post("edit", message).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
    Send,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub kind: DeliveryKind,
    pub message: OutboundMessage,
}

/// In-process transport that keeps every delivery. Sent messages get
/// increasing ids; edits can be switched to fail.
pub struct RecordingTransport {
    deliveries: Mutex<Vec<Recorded>>,
    next_id: AtomicI64,
    refuse_edits: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
            refuse_edits: AtomicBool::new(false),
        }
    }

    /// Every following edit fails with [`TransportError::CantEdit`]
    pub fn refuse_edits(&self, refuse: bool) {
        self.refuse_edits.store(refuse, Ordering::SeqCst);
    }

    pub async fn deliveries(&self) -> Vec<Recorded> {
        self.deliveries.lock().await.clone()
    }

    pub async fn deliveries_to(&self, chat_id: ChatId) -> Vec<Recorded> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter(|r| r.message.chat_id == chat_id)
            .cloned()
            .collect()
    }

    /// What the chat currently shows, the last delivery to it
    pub async fn last_to(&self, chat_id: ChatId) -> Option<OutboundMessage> {
        self.deliveries_to(chat_id).await.pop().map(|r| r.message)
    }

    pub async fn clear(&self) {
        self.deliveries.lock().await.clear();
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<Delivered, TransportError> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.deliveries.lock().await.push(Recorded {
            kind: DeliveryKind::Send,
            message: message.clone(),
        });
        Ok(Delivered {
            message_id,
            media_id: None,
        })
    }

    async fn edit(&self, message: &OutboundMessage) -> Result<Delivered, TransportError> {
        if self.refuse_edits.load(Ordering::SeqCst) {
            return Err(TransportError::CantEdit);
        }
        let message_id = message
            .message_id
            .ok_or_else(|| TransportError::Failed("edit without message id".to_string()))?;

        let mut deliveries = self.deliveries.lock().await;
        let unchanged = deliveries
            .iter()
            .rev()
            .find(|r| r.message.chat_id == message.chat_id)
            .is_some_and(|r| r.message.text == message.text && r.message.keyboard == message.keyboard);
        if unchanged {
            return Err(TransportError::NotModified);
        }
        deliveries.push(Recorded {
            kind: DeliveryKind::Edit,
            message: message.clone(),
        });
        Ok(Delivered {
            message_id,
            media_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(text: &str) -> Rendered {
        Rendered {
            text: text.to_string(),
            keyboard: Some(Keyboard::new()),
            media_name: None,
        }
    }

    #[tokio::test]
    async fn test_first_delivery_sends() {
        let transport = RecordingTransport::new();
        let media = MediaCache::new("./static");

        let id = deliver(&transport, &media, 7, None, screen("hello")).await.unwrap();
        assert_eq!(id, 100);
        let deliveries = transport.deliveries().await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].kind, DeliveryKind::Send);
    }

    #[tokio::test]
    async fn test_edits_in_place() {
        let transport = RecordingTransport::new();
        let media = MediaCache::new("./static");

        let id = deliver(&transport, &media, 7, None, screen("one")).await.unwrap();
        let edited = deliver(&transport, &media, 7, Some(id), screen("two")).await.unwrap();
        assert_eq!(edited, id);
        assert_eq!(transport.deliveries().await[1].kind, DeliveryKind::Edit);
    }

    #[tokio::test]
    async fn test_cant_edit_falls_back_to_send() {
        let transport = RecordingTransport::new();
        let media = MediaCache::new("./static");
        transport.refuse_edits(true);

        let id = deliver(&transport, &media, 7, Some(5), screen("again")).await.unwrap();
        assert_eq!(id, 100);
        let deliveries = transport.deliveries().await;
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].kind, DeliveryKind::Send);
        assert_eq!(deliveries[0].message.message_id, None);
    }

    #[tokio::test]
    async fn test_not_modified_is_delivered() {
        let transport = RecordingTransport::new();
        let media = MediaCache::new("./static");

        let id = deliver(&transport, &media, 7, None, screen("same")).await.unwrap();
        let again = deliver(&transport, &media, 7, Some(id), screen("same")).await.unwrap();
        assert_eq!(again, id);
        assert_eq!(transport.deliveries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_media_resolved_from_static_root() {
        let transport = RecordingTransport::new();
        let media = MediaCache::new("/srv/static");
        let rendered = Rendered {
            media_name: Some("hall.png".to_string()),
            ..screen("hall")
        };

        deliver(&transport, &media, 7, None, rendered).await.unwrap();
        let sent = transport.last_to(7).await.unwrap();
        assert_eq!(
            sent.media,
            Some(clue_types::MediaRef::Path("/srv/static/hall.png".to_string()))
        );
    }
}
