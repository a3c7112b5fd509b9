//! Inline-control activations: token parsing and the follow-up actions.
//!
//! Tokens are `<verb>:<correlation-id>`. The verb picks the action, the id
//! resolves through the correlation cache. Stale and malformed tokens are
//! expected traffic (old messages keep their buttons forever), so they get a
//! calm answer, never an error path.

use {async_trait::async_trait, std::sync::Arc, tracing::{debug, info, warn}};

use {
    voxrelay_cache::EntryKind,
    voxrelay_common::{Control, MessageHandle},
};

use crate::{
    notify::{ActionReply, ActionSink},
    state::Relay,
};

/// Replaces the diff message once its fix has been written back.
const FIX_APPLIED_HTML: &str = "✅ <b>Fix applied.</b>";

/// The verbs inline controls can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ActionToken {
    ApplyFix(String),
    Summarize(String),
}

fn parse_token(token: &str) -> Option<ActionToken> {
    let (verb, id) = token.split_once(':')?;
    if id.is_empty() {
        return None;
    }
    match verb {
        "fix" => Some(ActionToken::ApplyFix(id.to_string())),
        "summ" => Some(ActionToken::Summarize(id.to_string())),
        _ => None,
    }
}

/// The relay's [`ActionSink`]: hands tokens from the callback transport to
/// the cache and the pipelines.
#[derive(Clone)]
pub struct ActionHandler(pub Arc<Relay>);

#[async_trait]
impl ActionSink for ActionHandler {
    async fn handle_action(&self, token: &str, source: Option<MessageHandle>) -> ActionReply {
        match parse_token(token) {
            Some(ActionToken::ApplyFix(id)) => self.0.apply_fix(&id, source).await,
            Some(ActionToken::Summarize(id)) => self.0.start_summary(&id),
            None => {
                debug!(token, "unrecognized action token, acknowledging silently");
                ActionReply::default()
            },
        }
    }
}

impl Relay {
    /// Write a cached corrected text back into its origin message. The cache
    /// read is destructive, so a second tap of the same control reports the
    /// fix as already applied instead of editing twice.
    async fn apply_fix(&self, id: &str, source: Option<MessageHandle>) -> ActionReply {
        let Some(entry) = self.cache.take(id) else {
            return ActionReply::alert("Nothing to apply: the fix expired or was already applied.");
        };

        if let Err(e) = self
            .session
            .edit_message_text(entry.origin_chat, entry.origin_message, &entry.payload_text)
            .await
        {
            warn!(
                chat_id = entry.origin_chat.0,
                message_id = entry.origin_message.0,
                error = %e,
                "apply-fix edit failed, restoring cache entry"
            );
            // Put the entry back so the operator can simply tap again.
            self.cache.restore(id, entry);
            return ActionReply::alert("Could not edit the message. Try again.");
        }

        info!(
            chat_id = entry.origin_chat.0,
            message_id = entry.origin_message.0,
            "fix applied"
        );

        // Collapse the diff message into a confirmation so the stale "Apply
        // fix" button disappears. Purely cosmetic; failures only get logged.
        if let Some(handle) = source {
            let controls: Vec<Control> = entry
                .origin_link
                .as_ref()
                .map(|link| Control::url("Open message", link.clone()))
                .into_iter()
                .collect();
            if let Err(e) = self
                .notifier
                .edit_message(handle, FIX_APPLIED_HTML, &controls)
                .await
            {
                debug!(error = %e, "could not collapse diff message after apply");
            }
        }

        ActionReply::toast("Fix applied.")
    }

    /// Kick off summarization of a cached transcript. Runs detached so the
    /// callback query gets its answer immediately; the summary arrives as a
    /// fresh message. The transcript stays cached, repeat taps re-summarize.
    fn start_summary(self: &Arc<Self>, id: &str) -> ActionReply {
        let Some(entry) = self.cache.get(id) else {
            return ActionReply::alert("The transcript expired, nothing to summarize.");
        };
        if entry.kind != EntryKind::Transcript {
            debug!(correlation_id = %id, kind = ?entry.kind, "summarize token on non-transcript entry");
            return ActionReply::default();
        }

        let relay = Arc::clone(self);
        tokio::spawn(async move {
            relay.run_summary_pipeline(&entry).await;
        });
        ActionReply::toast("Summarizing…")
    }
}
