use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

/// Configuration for the outbound bot identity.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(skip_serializing)]
    pub token: Option<Secret<String>>,

    /// Long-polling timeout passed to `getUpdates`, seconds.
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout_secs: 30,
        }
    }
}

impl TelegramConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(token) = std::env::var("BOT_TOKEN")
            && !token.is_empty()
        {
            cfg.token = Some(Secret::new(token));
        }
        if let Ok(secs) = std::env::var("BOT_POLL_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse()
        {
            cfg.poll_timeout_secs = secs;
        }
        cfg
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}
