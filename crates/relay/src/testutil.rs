//! Shared test doubles: a recording session client, a recording notifier,
//! and scriptable transform stubs wired into a ready-made [`Relay`].

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering},
    },
};

use {anyhow::Result, async_trait::async_trait, bytes::Bytes};

use {
    voxrelay_common::{ChatRef, Control, ControlAction, MessageHandle, MessageId},
    voxrelay_transforms::{Summarizer, TextFixer, Transcriber},
};

use crate::{
    config::RelayConfig,
    notify::Notifier,
    session::{Attachment, SessionClient, SessionMessage},
    state::Relay,
};

/// The operator id every test harness uses.
pub const OPERATOR_ID: i64 = 99;

// ── Session double ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSession {
    messages: Mutex<HashMap<(i64, i32), SessionMessage>>,
    pub media: Mutex<Bytes>,
    pub edits: Mutex<Vec<(ChatRef, MessageId, String)>>,
    pub reaction_sets: Mutex<Vec<(ChatRef, MessageId, Vec<String>)>>,
    pub fetch_calls: AtomicUsize,
    pub fail_edit: AtomicBool,
}

impl MockSession {
    pub fn insert(&self, message: SessionMessage) {
        self.messages
            .lock()
            .unwrap()
            .insert((message.chat.0, message.id.0), message);
    }
}

#[async_trait]
impl SessionClient for MockSession {
    async fn fetch_message(
        &self,
        chat: ChatRef,
        id: MessageId,
    ) -> Result<Option<SessionMessage>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.messages.lock().unwrap().get(&(chat.0, id.0)).cloned())
    }

    async fn download_media(&self, _message: &SessionMessage) -> Result<Bytes> {
        Ok(self.media.lock().unwrap().clone())
    }

    async fn edit_message_text(&self, chat: ChatRef, id: MessageId, text: &str) -> Result<()> {
        if self.fail_edit.load(Ordering::SeqCst) {
            anyhow::bail!("edit rejected");
        }
        self.edits
            .lock()
            .unwrap()
            .push((chat, id, text.to_string()));
        if let Some(message) = self.messages.lock().unwrap().get_mut(&(chat.0, id.0)) {
            message.text = Some(text.to_string());
        }
        Ok(())
    }

    async fn set_reactions(
        &self,
        chat: ChatRef,
        id: MessageId,
        emojis: Vec<String>,
    ) -> Result<()> {
        self.reaction_sets.lock().unwrap().push((chat, id, emojis));
        Ok(())
    }
}

// ── Notifier double ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat: ChatRef,
    pub html: String,
    pub controls: Vec<Control>,
    pub handle: MessageHandle,
}

impl SentMessage {
    fn callback_token(&self, prefix: &str) -> Option<String> {
        self.controls.iter().find_map(|control| {
            match &control.action {
                ControlAction::Callback(token) => {
                    token.strip_prefix(prefix).map(str::to_string)
                },
                ControlAction::Url(_) => None,
            }
        })
    }

    /// Correlation id carried by this message's "Summarize" control.
    pub fn summ_token(&self) -> Option<String> {
        self.callback_token("summ:")
    }

    /// Correlation id carried by this message's "Apply fix" control.
    pub fn fix_token(&self) -> Option<String> {
        self.callback_token("fix:")
    }
}

#[derive(Default)]
pub struct MockNotifier {
    pub sent: Mutex<Vec<SentMessage>>,
    pub edited: Mutex<Vec<(MessageHandle, String, Vec<Control>)>>,
    next_id: AtomicI32,
    send_limit: Mutex<Option<usize>>,
    pub fail_edit: AtomicBool,
}

impl MockNotifier {
    /// Make every send after the first `n` fail.
    pub fn fail_after(&self, n: usize) {
        *self.send_limit.lock().unwrap() = Some(n);
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_message(
        &self,
        chat: ChatRef,
        html: &str,
        controls: &[Control],
    ) -> Result<MessageHandle> {
        let mut sent = self.sent.lock().unwrap();
        if let Some(limit) = *self.send_limit.lock().unwrap()
            && sent.len() >= limit
        {
            anyhow::bail!("send rejected");
        }
        let handle = MessageHandle {
            chat,
            message_id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
        };
        sent.push(SentMessage {
            chat,
            html: html.to_string(),
            controls: controls.to_vec(),
            handle,
        });
        Ok(handle)
    }

    async fn edit_message(
        &self,
        handle: MessageHandle,
        html: &str,
        controls: &[Control],
    ) -> Result<()> {
        if self.fail_edit.load(Ordering::SeqCst) {
            anyhow::bail!("edit rejected");
        }
        self.edited
            .lock()
            .unwrap()
            .push((handle, html.to_string(), controls.to_vec()));
        Ok(())
    }
}

// ── Transform stubs ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct StubTranscriber {
    output: Mutex<Option<String>>,
    error: Mutex<Option<String>>,
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _audio: Bytes, _filename_hint: &str) -> Result<String> {
        if let Some(message) = self.error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(self.output.lock().unwrap().clone().unwrap_or_default())
    }
}

/// Echoes its input unless scripted otherwise, so text-fix tests opt into a
/// change explicitly.
#[derive(Default)]
pub struct StubFixer {
    output: Mutex<Option<String>>,
    error: Mutex<Option<String>>,
}

#[async_trait]
impl TextFixer for StubFixer {
    async fn fix(&self, text: &str) -> Result<String> {
        if let Some(message) = self.error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(self
            .output
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| text.to_string()))
    }
}

#[derive(Default)]
pub struct StubSummarizer {
    output: Mutex<Option<String>>,
    error: Mutex<Option<String>>,
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String> {
        if let Some(message) = self.error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(self
            .output
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "summary".to_string()))
    }
}

// ── Harness ─────────────────────────────────────────────────────────────────

pub struct TestHarness {
    pub relay: Arc<Relay>,
    pub session: Arc<MockSession>,
    pub notifier: Arc<MockNotifier>,
    pub transcriber: Arc<StubTranscriber>,
    pub fixer: Arc<StubFixer>,
    pub summarizer: Arc<StubSummarizer>,
}

impl TestHarness {
    pub fn new() -> Self {
        let session = Arc::new(MockSession::default());
        let notifier = Arc::new(MockNotifier::default());
        let transcriber = Arc::new(StubTranscriber::default());
        let fixer = Arc::new(StubFixer::default());
        let summarizer = Arc::new(StubSummarizer::default());
        let config = RelayConfig {
            operator_id: OPERATOR_ID,
            // No pacing pauses in tests; chunk order is asserted, not timing.
            chunk_delay_ms: 0,
            ..Default::default()
        };
        let relay = Relay::new(
            config,
            session.clone(),
            notifier.clone(),
            transcriber.clone(),
            fixer.clone(),
            summarizer.clone(),
        );
        Self {
            relay,
            session,
            notifier,
            transcriber,
            fixer,
            summarizer,
        }
    }

    pub fn with_transcript(self, text: &str) -> Self {
        *self.transcriber.output.lock().unwrap() = Some(text.to_string());
        self
    }

    pub fn with_transcriber_error(self, message: &str) -> Self {
        *self.transcriber.error.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn with_fix_output(self, text: &str) -> Self {
        *self.fixer.output.lock().unwrap() = Some(text.to_string());
        self
    }

    pub fn with_fixer_error(self, message: &str) -> Self {
        *self.fixer.error.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn with_summary(self, text: &str) -> Self {
        *self.summarizer.output.lock().unwrap() = Some(text.to_string());
        self
    }

    pub fn with_summarizer_error(self, message: &str) -> Self {
        *self.summarizer.error.lock().unwrap() = Some(message.to_string());
        self
    }
}

/// Let detached tasks spawned during a test run to completion. Enough yields
/// for the single-threaded test runtime to drain everything ready.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

// ── Fixture messages ────────────────────────────────────────────────────────

pub fn voice_message(chat_id: i64, message_id: i32) -> SessionMessage {
    SessionMessage {
        chat: ChatRef(chat_id),
        id: MessageId(message_id),
        chat_title: Some("dev chat".into()),
        sender_name: Some("Ana".into()),
        text: None,
        attachment: Some(Attachment::Voice),
    }
}

pub fn text_message(chat_id: i64, message_id: i32, text: &str) -> SessionMessage {
    SessionMessage {
        chat: ChatRef(chat_id),
        id: MessageId(message_id),
        chat_title: Some("dev chat".into()),
        sender_name: Some("Ana".into()),
        text: Some(text.to_string()),
        attachment: None,
    }
}

pub fn photo_message(chat_id: i64, message_id: i32) -> SessionMessage {
    SessionMessage {
        chat: ChatRef(chat_id),
        id: MessageId(message_id),
        chat_title: None,
        sender_name: None,
        text: Some("look at this".into()),
        attachment: Some(Attachment::Photo),
    }
}
