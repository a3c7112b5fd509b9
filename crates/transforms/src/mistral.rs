//! Mistral-backed implementations of the three transform capabilities.
//!
//! Transcription goes through the Voxtral audio endpoint (multipart upload of
//! the raw voice/video-note bytes); punctuation fixing and summarization are
//! plain chat completions with fixed system prompts.

use std::time::Duration;

use {
    anyhow::{Context, Result, anyhow},
    async_trait::async_trait,
    bytes::Bytes,
    reqwest::{
        Client,
        multipart::{Form, Part},
    },
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{MistralConfig, Summarizer, TextFixer, Transcriber};

/// Mistral API base URL.
const API_BASE: &str = "https://api.mistral.ai/v1";

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

fn mime_for_hint(filename_hint: &str) -> &'static str {
    match filename_hint.rsplit('.').next() {
        Some("ogg" | "oga") => "audio/ogg",
        Some("mp4") => "video/mp4",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

// ── Transcription ────────────────────────────────────────────────────────

/// Voxtral speech-to-text.
#[derive(Clone)]
pub struct MistralTranscriber {
    client: Client,
    api_key: Option<Secret<String>>,
    model: String,
    language: Option<String>,
    base_url: String,
}

impl MistralTranscriber {
    #[must_use]
    pub fn new(config: &MistralConfig) -> Self {
        Self {
            client: build_client(config.timeout_secs),
            api_key: config.api_key.clone(),
            model: config.transcribe_model.clone(),
            language: config.language.clone(),
            base_url: API_BASE.into(),
        }
    }

    /// Point the client at a different base URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_key(&self) -> Result<&Secret<String>> {
        self.api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Mistral API key not configured"))
    }
}

impl std::fmt::Debug for MistralTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralTranscriber")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transcriber for MistralTranscriber {
    async fn transcribe(&self, audio: Bytes, filename_hint: &str) -> Result<String> {
        let api_key = self.api_key()?;

        debug!(
            bytes = audio.len(),
            filename_hint,
            model = %self.model,
            "starting transcription"
        );

        let file_part = Part::bytes(audio.to_vec())
            .file_name(filename_hint.to_string())
            .mime_str(mime_for_hint(filename_hint))
            .context("failed to build audio part")?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone());
        if let Some(ref language) = self.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .context("failed to send transcription request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("transcription request failed: {status} - {body}"));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .context("failed to parse transcription response")?;
        Ok(parsed.text)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

// ── Chat-completion transforms ───────────────────────────────────────────

/// Shared chat-completions plumbing for the text transforms.
#[derive(Clone)]
struct ChatBackend {
    client: Client,
    api_key: Option<Secret<String>>,
    base_url: String,
}

impl ChatBackend {
    fn new(config: &MistralConfig) -> Self {
        Self {
            client: build_client(config.timeout_secs),
            api_key: config.api_key.clone(),
            base_url: API_BASE.into(),
        }
    }

    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Mistral API key not configured"))?;

        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .context("failed to send chat completion request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("chat completion failed: {status} - {body}"));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("failed to parse chat completion response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("chat completion returned no choices")
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Punctuation-only corrector.
#[derive(Clone)]
pub struct MistralTextFixer {
    backend: ChatBackend,
    model: String,
    prompt: String,
}

impl MistralTextFixer {
    #[must_use]
    pub fn new(config: &MistralConfig) -> Self {
        Self {
            backend: ChatBackend::new(config),
            model: config.fix_model.clone(),
            prompt: config.fix_prompt.clone(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextFixer for MistralTextFixer {
    async fn fix(&self, text: &str) -> Result<String> {
        self.backend.complete(&self.model, &self.prompt, text).await
    }
}

/// Bullet-point summarizer.
#[derive(Clone)]
pub struct MistralSummarizer {
    backend: ChatBackend,
    model: String,
    prompt: String,
}

impl MistralSummarizer {
    #[must_use]
    pub fn new(config: &MistralConfig) -> Self {
        Self {
            backend: ChatBackend::new(config),
            model: config.summary_model.clone(),
            prompt: config.summary_prompt.clone(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Summarizer for MistralSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.backend.complete(&self.model, &self.prompt, text).await
    }
}
