//! The outbound bot identity, consumed as a trait, plus the callback channel
//! through which its inline controls come back to us.

use {anyhow::Result, async_trait::async_trait};

use voxrelay_common::{ChatRef, Control, MessageHandle};

/// Abstract outbound-notification capability.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one HTML-formatted message with inline controls; returns a handle
    /// usable for later edits.
    async fn send_message(
        &self,
        chat: ChatRef,
        html: &str,
        controls: &[Control],
    ) -> Result<MessageHandle>;

    /// Replace a previously sent message's text and controls.
    async fn edit_message(
        &self,
        handle: MessageHandle,
        html: &str,
        controls: &[Control],
    ) -> Result<()>;
}

/// What the callback transport should tell the operator after an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReply {
    /// Short text shown to the operator; `None` acknowledges silently.
    pub alert: Option<String>,
    /// Interrupting alert rather than a passive toast.
    pub show_alert: bool,
}

impl ActionReply {
    /// Passive acknowledgment text.
    #[must_use]
    pub fn toast(text: impl Into<String>) -> Self {
        Self {
            alert: Some(text.into()),
            show_alert: false,
        }
    }

    /// Interrupting alert, for failures the operator must notice.
    #[must_use]
    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            alert: Some(text.into()),
            show_alert: true,
        }
    }
}

/// Receiver of inline-control activations. The callback transport forwards
/// every activation here and answers the originating query with the returned
/// [`ActionReply`]. Unknown tokens must be acknowledged silently, never
/// rejected loudly.
#[async_trait]
pub trait ActionSink: Send + Sync {
    /// `source` is the message the tapped control was attached to, when the
    /// transport knows it; used to mutate that message into a success state.
    async fn handle_action(&self, token: &str, source: Option<MessageHandle>) -> ActionReply;
}
