//! Update dispatch: turns reaction-change events into pipeline runs.
//!
//! The trigger contract: only the operator's own reaction with the configured
//! emoji starts a run. The trigger reaction is removed before processing
//! begins, preserving any other reactions the operator had on the message, so
//! a cleared emoji is the visible acknowledgment that the relay took the job.

use {
    std::sync::Arc,
    tokio::{sync::mpsc, task::JoinHandle},
    tracing::{info, warn},
};

use crate::{
    session::{Reaction, UpdateEvent},
    state::Relay,
};

impl Relay {
    /// Consume the session update stream until the sender side closes. The
    /// per-message pipelines run as detached tasks, so a slow transcription
    /// never blocks the next trigger.
    pub fn spawn_update_loop(
        self: Arc<Self>,
        mut updates: mpsc::Receiver<UpdateEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(trigger = %self.config.trigger_emoji, "update loop started");
            while let Some(event) = updates.recv().await {
                self.handle_update(event).await;
            }
            info!("update stream closed, update loop exiting");
        })
    }

    /// Handle one update. Returns the spawned pipeline task when the event
    /// was a trigger, so tests can await completion deterministically.
    pub(crate) async fn handle_update(self: &Arc<Self>, event: UpdateEvent) -> Option<JoinHandle<()>> {
        let UpdateEvent::ReactionsChanged {
            chat,
            message_id,
            reactions,
        } = event
        else {
            return None;
        };

        // Partition the operator's reactions into the trigger and the rest.
        // Other users' reactions never matter and are never touched.
        let mut triggered = false;
        let mut keep: Vec<String> = Vec::new();
        for Reaction { user_id, emoji } in reactions {
            if user_id != self.config.operator_id {
                continue;
            }
            if emoji == self.config.trigger_emoji {
                triggered = true;
            } else {
                keep.push(emoji);
            }
        }
        if !triggered {
            return None;
        }

        info!(
            chat_id = chat.0,
            message_id = message_id.0,
            kept_reactions = keep.len(),
            "trigger reaction seen"
        );

        // Clear the trigger before the pipeline starts. The same write both
        // acknowledges the job and prevents the emoji from re-triggering on
        // the next reaction edit. A failed clear is logged and the run
        // proceeds; a duplicate result beats a dropped one.
        if let Err(e) = self
            .session
            .set_reactions(chat, message_id, keep)
            .await
        {
            warn!(
                chat_id = chat.0,
                message_id = message_id.0,
                error = %e,
                "failed to clear trigger reaction"
            );
        }

        let relay = Arc::clone(self);
        Some(tokio::spawn(async move {
            relay.process_target(chat, message_id).await;
        }))
    }
}
