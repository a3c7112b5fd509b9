//! The three transform pipelines. Each one catches its own AI failures and
//! hands the delivery engine well-formed text, so nothing propagates past a
//! pipeline boundary as an unhandled error.

use {
    bytes::Bytes,
    tracing::{debug, error, info, warn},
};

use {
    voxrelay_cache::{CacheEntry, EntryKind},
    voxrelay_common::{ChatRef, Control, MessageId},
};

use crate::{
    classify::{ContentKind, classify},
    deliver::{self, DeliveryHeader},
    session::SessionMessage,
    split::escape_html,
    state::Relay,
};

/// Shown instead of a transcript when the transcriber failed. The underlying
/// error goes to the log, not to the operator, to keep broken model output
/// out of the markup path.
pub const TRANSCRIBE_FAILED: &str = "❌ Could not transcribe the audio. See the server log.";

/// Shown when transcription succeeded but produced nothing.
pub const TRANSCRIPT_EMPTY: &str = "The voice message was recognized as empty.";

/// Shown instead of a summary when the summarizer failed.
pub const SUMMARY_FAILED: &str = "❌ Could not summarize the transcript. See the server log.";

impl Relay {
    /// Classify→pipeline→deliver for one target message. Runs as its own
    /// task; every exit path is terminal (logged or delivered), nothing is
    /// returned to the dispatcher.
    pub(crate) async fn process_target(&self, chat: ChatRef, message_id: MessageId) {
        let message = match self.session.fetch_message(chat, message_id).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                debug!(
                    chat_id = chat.0,
                    message_id = message_id.0,
                    "target message vanished before fetch"
                );
                return;
            },
            Err(e) => {
                warn!(
                    chat_id = chat.0,
                    message_id = message_id.0,
                    error = %e,
                    "failed to fetch target message"
                );
                return;
            },
        };

        match classify(&message) {
            kind @ (ContentKind::Voice | ContentKind::VideoNote) => {
                self.run_media_pipeline(&message, kind).await;
            },
            ContentKind::Text => self.run_text_fix_pipeline(&message).await,
            ContentKind::Unsupported => {
                info!(
                    chat_id = chat.0,
                    message_id = message_id.0,
                    "unsupported content kind, nothing to do"
                );
            },
        }
    }

    /// Download, transcribe, cache the transcript for later summarization,
    /// deliver.
    pub(crate) async fn run_media_pipeline(&self, message: &SessionMessage, kind: ContentKind) {
        let audio: Bytes = match self.session.download_media(message).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!(
                    chat_id = message.chat.0,
                    message_id = message.id.0,
                    error = %e,
                    "media download failed, aborting"
                );
                return;
            },
        };
        info!(
            chat_id = message.chat.0,
            message_id = message.id.0,
            bytes = audio.len(),
            "media downloaded, transcribing"
        );

        let hint = kind.filename_hint().unwrap_or("voice.ogg");
        let origin_link = message.chat.message_link(message.id);

        let (body, correlation_id) = match self.transcriber.transcribe(audio, hint).await {
            Ok(text) if text.trim().is_empty() => (TRANSCRIPT_EMPTY.to_string(), None),
            Ok(text) => {
                let id = self.cache.put(CacheEntry {
                    kind: EntryKind::Transcript,
                    payload_text: text.clone(),
                    origin_chat: message.chat,
                    origin_message: message.id,
                    origin_link: origin_link.clone(),
                });
                (escape_html(&text), Some(id))
            },
            Err(e) => {
                error!(
                    chat_id = message.chat.0,
                    message_id = message.id.0,
                    error = %e,
                    "transcription failed"
                );
                (TRANSCRIBE_FAILED.to_string(), None)
            },
        };

        let mut controls = Vec::new();
        if let Some(ref link) = origin_link {
            controls.push(Control::url("Open original", link.clone()));
        }
        if let Some(ref id) = correlation_id {
            controls.push(Control::callback("Summarize", format!("summ:{id}")));
        }

        let header = DeliveryHeader {
            kind_label: kind.label(),
            chat_title: message.chat_title.as_deref(),
            sender_name: message.sender_name.as_deref(),
        };
        if let Err(e) = deliver::format_and_send(
            self.notifier.as_ref(),
            &self.config,
            self.delivery_chat(),
            &header,
            &body,
            &controls,
        )
        .await
        {
            error!(error = %e, "failed to deliver transcript");
        }
    }

    /// Fix punctuation; stay silent when nothing changed.
    pub(crate) async fn run_text_fix_pipeline(&self, message: &SessionMessage) {
        let Some(original) = message.text.as_deref() else {
            return;
        };

        let fixed = match self.fixer.fix(original).await {
            Ok(fixed) => fixed,
            Err(e) => {
                // No placeholder here: an unfixed message is indistinguishable
                // from a no-op, and a failure notice for every glitch would be
                // noisier than the feature is worth.
                error!(
                    chat_id = message.chat.0,
                    message_id = message.id.0,
                    error = %e,
                    "punctuation fix failed"
                );
                return;
            },
        };

        if fixed.trim() == original.trim() {
            debug!(
                chat_id = message.chat.0,
                message_id = message.id.0,
                "text already clean, staying silent"
            );
            return;
        }

        let origin_link = message.chat.message_link(message.id);
        let correlation_id = self.cache.put(CacheEntry {
            kind: EntryKind::TextFix,
            payload_text: fixed.trim().to_string(),
            origin_chat: message.chat,
            origin_message: message.id,
            origin_link: origin_link.clone(),
        });

        let body = format!(
            "<i>{}</i>\n\n<b>Corrected</b>\n{}",
            escape_html(original),
            escape_html(fixed.trim()),
        );

        let mut controls = vec![Control::callback(
            "Apply fix",
            format!("fix:{correlation_id}"),
        )];
        if let Some(link) = origin_link {
            controls.push(Control::url("Open original", link));
        }

        let header = DeliveryHeader {
            kind_label: ContentKind::Text.label(),
            chat_title: message.chat_title.as_deref(),
            sender_name: message.sender_name.as_deref(),
        };
        if let Err(e) = deliver::format_and_send(
            self.notifier.as_ref(),
            &self.config,
            self.delivery_chat(),
            &header,
            &body,
            &controls,
        )
        .await
        {
            error!(error = %e, "failed to deliver punctuation fix");
        }
    }

    /// Summarize a cached transcript and deliver the result as a fresh
    /// message. Only reachable through the action handler.
    pub(crate) async fn run_summary_pipeline(&self, entry: &CacheEntry) {
        let body = match self.summarizer.summarize(&entry.payload_text).await {
            Ok(summary) => escape_html(&summary),
            Err(e) => {
                error!(error = %e, "summarization failed");
                SUMMARY_FAILED.to_string()
            },
        };

        let mut controls = Vec::new();
        if let Some(ref link) = entry.origin_link {
            controls.push(Control::url("Open original", link.clone()));
        }

        let header = DeliveryHeader {
            kind_label: "📋 Summary",
            ..Default::default()
        };
        if let Err(e) = deliver::format_and_send(
            self.notifier.as_ref(),
            &self.config,
            self.delivery_chat(),
            &header,
            &body,
            &controls,
        )
        .await
        {
            error!(error = %e, "failed to deliver summary");
        }
    }
}
