//! AI transform capabilities consumed by the relay core, plus the Mistral
//! implementations of all three.
//!
//! The core only sees the three traits below; everything Mistral-specific
//! (endpoints, models, prompts) lives in [`mistral`] and [`config`].

pub mod config;
pub mod mistral;

use {anyhow::Result, async_trait::async_trait, bytes::Bytes};

pub use {
    config::MistralConfig,
    mistral::{MistralSummarizer, MistralTextFixer, MistralTranscriber},
};

/// Speech-to-text over an in-memory audio payload.
///
/// `filename_hint` tells the backend what container the bytes are in
/// (`"voice.ogg"` for voice notes, `"video.mp4"` for video notes); it is a
/// format hint only, never a path.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Bytes, filename_hint: &str) -> Result<String>;
}

/// Punctuation-only correction. Implementations must not rewrite wording;
/// callers rely on the output staying word-identical when nothing needed
/// fixing.
#[async_trait]
pub trait TextFixer: Send + Sync {
    async fn fix(&self, text: &str) -> Result<String>;
}

/// Short bullet-point summarization in the source language.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}
