use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

/// Default transcription model (Voxtral).
pub const DEFAULT_TRANSCRIBE_MODEL: &str = "voxtral-mini-latest";
/// Default punctuation-fix model.
pub const DEFAULT_FIX_MODEL: &str = "magistral-medium-latest";
/// Default summarization model.
pub const DEFAULT_SUMMARY_MODEL: &str = "mistral-medium-latest";

const DEFAULT_FIX_PROMPT: &str = "You are a professional proofreader. Your only task is to place \
     punctuation (commas, dashes, hyphens, periods). You must NOT change words, fix spelling, \
     alter slang, change letter case, or remove profanity. Keep the text exactly as written and \
     add punctuation only.";

const DEFAULT_SUMMARY_PROMPT: &str = "You are an analyst. Produce a short summary of the provided \
     text. Keep only the most important facts, figures, and decisions, as a bulleted list. \
     Answer in the language of the original.";

/// Configuration for the Mistral-backed transforms.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MistralConfig {
    /// API key; all three transforms fail fast without one. Never written
    /// back out when the config is serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<Secret<String>>,

    pub transcribe_model: String,
    pub fix_model: String,
    pub summary_model: String,

    /// Language hint forwarded to transcription (ISO 639-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// System prompt for the punctuation fixer.
    pub fix_prompt: String,
    /// System prompt for the summarizer.
    pub summary_prompt: String,

    /// Per-request timeout. A hung transform call stalls only its own unit
    /// of work, but it must still end.
    pub timeout_secs: u64,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            transcribe_model: DEFAULT_TRANSCRIBE_MODEL.into(),
            fix_model: DEFAULT_FIX_MODEL.into(),
            summary_model: DEFAULT_SUMMARY_MODEL.into(),
            language: None,
            fix_prompt: DEFAULT_FIX_PROMPT.into(),
            summary_prompt: DEFAULT_SUMMARY_PROMPT.into(),
            timeout_secs: 120,
        }
    }
}

impl MistralConfig {
    /// Read configuration from the process environment. Unset variables keep
    /// their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(key) = std::env::var("MISTRAL_API_KEY")
            && !key.is_empty()
        {
            cfg.api_key = Some(Secret::new(key));
        }
        if let Ok(model) = std::env::var("MISTRAL_TRANSCRIBE_MODEL") {
            cfg.transcribe_model = model;
        }
        if let Ok(model) = std::env::var("MISTRAL_FIX_MODEL") {
            cfg.fix_model = model;
        }
        if let Ok(model) = std::env::var("MISTRAL_SUMMARY_MODEL") {
            cfg.summary_model = model;
        }
        if let Ok(lang) = std::env::var("TARGET_LANGUAGE")
            && !lang.is_empty()
        {
            cfg.language = Some(lang);
        }
        if let Ok(prompt) = std::env::var("FIX_PROMPT") {
            cfg.fix_prompt = prompt;
        }
        if let Ok(prompt) = std::env::var("SUMMARY_PROMPT") {
            cfg.summary_prompt = prompt;
        }
        cfg
    }
}

impl std::fmt::Debug for MistralConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("transcribe_model", &self.transcribe_model)
            .field("fix_model", &self.fix_model)
            .field("summary_model", &self.summary_model)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = MistralConfig::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.transcribe_model, DEFAULT_TRANSCRIBE_MODEL);
        assert_eq!(cfg.timeout_secs, 120);
        assert!(cfg.fix_prompt.contains("punctuation"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = MistralConfig {
            api_key: Some(Secret::new("sk-very-secret".into())),
            ..Default::default()
        };
        let debug = format!("{cfg:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn deserialize_partial_keeps_defaults() {
        let cfg: MistralConfig =
            serde_json::from_str(r#"{"transcribe_model": "voxtral-mini-2602"}"#).unwrap();
        assert_eq!(cfg.transcribe_model, "voxtral-mini-2602");
        assert_eq!(cfg.summary_model, DEFAULT_SUMMARY_MODEL);
    }

    #[test]
    fn serialize_never_writes_key_material() {
        let cfg = MistralConfig {
            api_key: Some(Secret::new("sk-very-secret".into())),
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("api_key"));
        assert!(!json.contains("sk-very-secret"));
    }
}
