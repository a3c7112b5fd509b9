use serde::{Deserialize, Serialize};

/// Default ceiling for a single outbound chunk, header included. Kept under
/// Telegram's 4096 hard limit to leave margin for markup the transport adds.
pub const DEFAULT_MAX_CHUNK: usize = 4000;

/// Default pause between successive chunk sends, to stay clear of burst-rate
/// rejection.
pub const DEFAULT_CHUNK_DELAY_MS: u64 = 300;

/// Default correlation-entry lifetime.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Relay behavior knobs. All fields have working defaults except
/// `operator_id`, which must identify the account whose reactions trigger
/// processing (results are delivered to the same account's bot chat).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// The single account whose reactions are honored.
    pub operator_id: i64,

    /// The reaction emoji that starts a pipeline run.
    pub trigger_emoji: String,

    /// Upper bound on one outbound message, header included.
    pub max_chunk: usize,

    /// Pause between successive chunks of one delivery.
    pub chunk_delay_ms: u64,

    /// How long correlation entries stay actionable.
    pub cache_ttl_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            operator_id: 0,
            trigger_emoji: "👀".into(),
            max_chunk: DEFAULT_MAX_CHUNK,
            chunk_delay_ms: DEFAULT_CHUNK_DELAY_MS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl RelayConfig {
    /// Read configuration from the process environment. Unset variables keep
    /// their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(id) = std::env::var("OPERATOR_ID")
            && let Ok(id) = id.parse()
        {
            cfg.operator_id = id;
        }
        if let Ok(emoji) = std::env::var("TRIGGER_EMOJI")
            && !emoji.is_empty()
        {
            cfg.trigger_emoji = emoji;
        }
        if let Ok(max) = std::env::var("MAX_CHUNK")
            && let Ok(max) = max.parse()
        {
            cfg.max_chunk = max;
        }
        if let Ok(ms) = std::env::var("CHUNK_DELAY_MS")
            && let Ok(ms) = ms.parse()
        {
            cfg.chunk_delay_ms = ms;
        }
        if let Ok(secs) = std::env::var("CACHE_TTL_SECS")
            && let Ok(secs) = secs.parse()
        {
            cfg.cache_ttl_secs = secs;
        }
        cfg
    }
}
