//! Identifier newtypes and the outbound-control model shared between the
//! relay core and the notifier implementations.

use serde::{Deserialize, Serialize};

/// A chat, as addressed by the session transport. Telegram chat IDs are i64;
/// supergroups and channels are negative with a `-100` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRef(pub i64);

/// A message within a chat. Telegram message IDs are i32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i32);

/// Handle to a message the notifier has sent, used for later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    pub chat: ChatRef,
    pub message_id: MessageId,
}

/// What happens when an inline control is tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    /// Navigation only: the client opens the URL, nothing comes back to us.
    Url(String),
    /// An opaque action token delivered back through the callback channel.
    Callback(String),
}

/// One inline control attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub action: ControlAction,
}

impl Control {
    #[must_use]
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ControlAction::Url(url.into()),
        }
    }

    #[must_use]
    pub fn callback(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ControlAction::Callback(token.into()),
        }
    }
}

impl ChatRef {
    /// Deep link to a message in this chat, if Telegram supports one.
    ///
    /// Only supergroups/channels (`-100…` IDs) have `t.me/c/` message links;
    /// private chats and basic groups return `None`.
    #[must_use]
    pub fn message_link(&self, message_id: MessageId) -> Option<String> {
        let internal = self.0.checked_neg()?.checked_sub(1_000_000_000_000)?;
        if internal <= 0 {
            return None;
        }
        Some(format!("https://t.me/c/{internal}/{}", message_id.0))
    }
}

impl std::fmt::Display for ChatRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supergroup_message_link() {
        let chat = ChatRef(-1001234567890);
        assert_eq!(
            chat.message_link(MessageId(42)).unwrap(),
            "https://t.me/c/1234567890/42"
        );
    }

    #[test]
    fn private_chat_has_no_message_link() {
        assert_eq!(ChatRef(777000).message_link(MessageId(1)), None);
    }

    #[test]
    fn basic_group_has_no_message_link() {
        assert_eq!(ChatRef(-4321).message_link(MessageId(1)), None);
    }
}
