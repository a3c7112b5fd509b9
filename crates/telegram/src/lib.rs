//! Telegram Bot API side of the relay: the outbound notifier the pipelines
//! deliver through, and the callback loop that brings inline-control taps
//! back to the relay core.

use {
    secrecy::ExposeSecret,
    teloxide::{Bot, prelude::Requester},
    tracing::info,
};

pub mod callbacks;
pub mod config;
pub mod error;
pub mod outbound;

pub use {
    callbacks::spawn_callback_loop,
    config::TelegramConfig,
    error::{Error, Result},
    outbound::TelegramNotifier,
};

/// Build and verify a [`Bot`] from configuration.
///
/// Clears any webhook so long polling works, and fails fast on a missing or
/// rejected token.
pub async fn connect(config: &TelegramConfig) -> Result<Bot> {
    let token = config
        .token
        .as_ref()
        .ok_or_else(|| Error::message("BOT_TOKEN is not set"))?;

    // Client timeout longer than the long-polling timeout, so the HTTP
    // client never aborts a getUpdates call Telegram is still holding open.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(std::time::Duration::from_secs(
            u64::from(config.poll_timeout_secs) + 15,
        ))
        .build()?;
    let bot = Bot::with_client(token.expose_secret(), client);

    let me = bot.get_me().await?;
    bot.delete_webhook().await?;
    info!(username = ?me.username, "bot connected, webhook cleared");
    Ok(bot)
}
