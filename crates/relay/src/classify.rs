//! Content-kind classification: decided once per target message, switched on
//! everywhere downstream. Nothing after this re-inspects raw attributes.

use crate::session::{Attachment, SessionMessage};

/// The closed set of content kinds the relay understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Voice,
    VideoNote,
    Text,
    Unsupported,
}

/// Classify a freshly fetched target message.
#[must_use]
pub fn classify(message: &SessionMessage) -> ContentKind {
    match message.attachment {
        Some(Attachment::Voice) => ContentKind::Voice,
        Some(Attachment::VideoNote) => ContentKind::VideoNote,
        Some(_) => ContentKind::Unsupported,
        None => match message.text.as_deref() {
            Some(text) if !text.trim().is_empty() => ContentKind::Text,
            _ => ContentKind::Unsupported,
        },
    }
}

impl ContentKind {
    /// Filename hint passed to the transcriber, for media kinds only. A
    /// format hint, never a path.
    #[must_use]
    pub fn filename_hint(self) -> Option<&'static str> {
        match self {
            Self::Voice => Some("voice.ogg"),
            Self::VideoNote => Some("video.mp4"),
            Self::Text | Self::Unsupported => None,
        }
    }

    /// Header label for delivered results.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Voice => "🎤 Voice message",
            Self::VideoNote => "📹 Video note",
            Self::Text => "📝 Punctuation fix",
            Self::Unsupported => "unsupported",
        }
    }
}
