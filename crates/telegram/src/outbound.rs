//! [`Notifier`] implementation on top of the Telegram Bot API.
//!
//! Messages go out as HTML first with a plain-text retry, since a result body
//! assembled from model output can occasionally trip Telegram's entity
//! parser and the operator should still get the text.

use {
    anyhow::Result,
    async_trait::async_trait,
    teloxide::{
        ApiError, RequestError,
        payloads::{EditMessageTextSetters, SendMessageSetters},
        prelude::*,
        types::{
            ChatId, InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions, ParseMode,
        },
    },
    tracing::warn,
};

use {
    voxrelay_common::{ChatRef, Control, ControlAction, MessageHandle, MessageId},
    voxrelay_relay::Notifier,
};

/// Outbound message sender for the bot identity.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Map controls onto an inline keyboard, one button per row. URL controls
/// whose target does not parse are dropped rather than failing the send.
fn keyboard(controls: &[Control]) -> Option<InlineKeyboardMarkup> {
    if controls.is_empty() {
        return None;
    }
    let rows: Vec<Vec<InlineKeyboardButton>> = controls
        .iter()
        .filter_map(|control| match &control.action {
            ControlAction::Url(url) => match url.parse() {
                Ok(url) => Some(vec![InlineKeyboardButton::url(&control.label, url)]),
                Err(e) => {
                    warn!(url = %url, error = %e, "dropping control with unparsable url");
                    None
                },
            },
            ControlAction::Callback(token) => {
                Some(vec![InlineKeyboardButton::callback(&control.label, token)])
            },
        })
        .collect();
    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(rows))
    }
}

fn no_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

fn is_not_modified(error: &RequestError) -> bool {
    matches!(error, RequestError::Api(ApiError::MessageNotModified))
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(
        &self,
        chat: ChatRef,
        html: &str,
        controls: &[Control],
    ) -> Result<MessageHandle> {
        let chat_id = ChatId(chat.0);
        let markup = keyboard(controls);

        let mut request = self
            .bot
            .send_message(chat_id, html)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview());
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }

        let message = match request.await {
            Ok(message) => message,
            Err(e) => {
                warn!(chat_id = chat.0, error = %e, "HTML send failed, retrying as plain text");
                let mut plain = self
                    .bot
                    .send_message(chat_id, html)
                    .link_preview_options(no_preview());
                if let Some(markup) = markup {
                    plain = plain.reply_markup(markup);
                }
                plain.await?
            },
        };

        Ok(MessageHandle {
            chat,
            message_id: MessageId(message.id.0),
        })
    }

    async fn edit_message(
        &self,
        handle: MessageHandle,
        html: &str,
        controls: &[Control],
    ) -> Result<()> {
        let chat_id = ChatId(handle.chat.0);
        let message_id = teloxide::types::MessageId(handle.message_id.0);
        let markup = keyboard(controls);

        let mut request = self
            .bot
            .edit_message_text(chat_id, message_id, html)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview());
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }

        match request.await {
            Ok(_) => Ok(()),
            Err(e) if is_not_modified(&e) => Ok(()),
            Err(e) => {
                warn!(
                    chat_id = handle.chat.0,
                    message_id = handle.message_id.0,
                    error = %e,
                    "HTML edit failed, retrying as plain text"
                );
                let mut plain = self
                    .bot
                    .edit_message_text(chat_id, message_id, html)
                    .link_preview_options(no_preview());
                if let Some(markup) = markup {
                    plain = plain.reply_markup(markup);
                }
                match plain.await {
                    Ok(_) => Ok(()),
                    Err(e) if is_not_modified(&e) => Ok(()),
                    Err(e) => Err(e.into()),
                }
            },
        }
    }
}
