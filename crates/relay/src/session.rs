//! The watched-session side of the relay, consumed as a trait.
//!
//! The concrete transport (a user-session client) produces [`UpdateEvent`]s
//! into an mpsc channel and implements [`SessionClient`] for the fetch /
//! download / edit / reaction calls the pipelines need. Nothing in this crate
//! knows how the session authenticates or speaks its wire protocol.

use {anyhow::Result, async_trait::async_trait, bytes::Bytes};

use voxrelay_common::{ChatRef, MessageId};

/// One reaction currently present on a message, attributed to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub user_id: i64,
    pub emoji: String,
}

/// A notification from the session update stream.
///
/// The transport maps its own update taxonomy onto this: message edits that
/// touch the reaction list become [`UpdateEvent::ReactionsChanged`], and any
/// update kind the relay does not care about becomes [`UpdateEvent::Other`].
#[derive(Debug, Clone)]
pub enum UpdateEvent {
    ReactionsChanged {
        chat: ChatRef,
        message_id: MessageId,
        /// Full reaction summary on the message at edit time, all users.
        reactions: Vec<Reaction>,
    },
    Other,
}

/// What a target message carries besides text. The classifier only needs the
/// variant; payload handles stay inside the session client, which can
/// re-derive them from the chat/message reference on download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Voice,
    VideoNote,
    Photo,
    Document,
    Other,
}

/// A message fetched fresh from the session at dispatch time. The update
/// event only carries a reference; content comes from here.
#[derive(Debug, Clone)]
pub struct SessionMessage {
    pub chat: ChatRef,
    pub id: MessageId,
    pub chat_title: Option<String>,
    pub sender_name: Option<String>,
    pub text: Option<String>,
    pub attachment: Option<Attachment>,
}

/// Abstract chat-session capability.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Fetch a message by reference. `Ok(None)` means the message is gone
    /// (deleted, or access was lost between event and fetch).
    async fn fetch_message(&self, chat: ChatRef, id: MessageId)
    -> Result<Option<SessionMessage>>;

    /// Download the message's audio/video payload fully into memory.
    async fn download_media(&self, message: &SessionMessage) -> Result<Bytes>;

    /// Overwrite the message's text.
    async fn edit_message_text(&self, chat: ChatRef, id: MessageId, text: &str) -> Result<()>;

    /// Replace the operator's reaction set on a message.
    async fn set_reactions(&self, chat: ChatRef, id: MessageId, emojis: Vec<String>)
    -> Result<()>;
}
