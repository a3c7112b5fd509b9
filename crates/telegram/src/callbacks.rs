//! Manual long-polling loop for callback queries.
//!
//! The bot identity only ever needs `CallbackQuery` updates; everything else
//! (direct messages to the bot, group noise) is filtered out server-side via
//! `allowed_updates`. Each activation is forwarded to the [`ActionSink`] and
//! the query is answered with whatever reply the sink returns, so the
//! operator's client always stops its spinner.

use {
    std::{sync::Arc, time::Duration},
    teloxide::{
        ApiError, RequestError,
        payloads::AnswerCallbackQuerySetters,
        prelude::*,
        types::{AllowedUpdate, CallbackQuery, UpdateKind},
    },
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use {
    voxrelay_common::{ChatRef, MessageHandle, MessageId},
    voxrelay_relay::ActionSink,
};

/// Pause before re-polling after a transport error.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Start polling for callback queries. The task runs until the token is
/// cancelled or another instance takes over the bot token.
pub fn spawn_callback_loop(
    bot: Bot,
    sink: Arc<dyn ActionSink>,
    poll_timeout_secs: u32,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("starting callback polling loop");
        let mut offset: i32 = 0;

        loop {
            if cancel.is_cancelled() {
                info!("callback polling stopped");
                break;
            }

            let result = bot
                .get_updates()
                .offset(offset)
                .timeout(poll_timeout_secs)
                .allowed_updates(vec![AllowedUpdate::CallbackQuery])
                .await;

            match result {
                Ok(updates) => {
                    for update in updates {
                        offset = update.id.as_offset();
                        match update.kind {
                            UpdateKind::CallbackQuery(query) => {
                                handle_callback(&bot, sink.as_ref(), query).await;
                            },
                            other => {
                                debug!("ignoring non-callback update: {other:?}");
                            },
                        }
                    }
                },
                Err(e) => {
                    // Another process polling with the same token means this
                    // instance must stand down, not fight over updates.
                    if matches!(&e, RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) {
                        error!("another instance is polling with this bot token, stopping");
                        cancel.cancel();
                        break;
                    }
                    warn!(error = %e, "getUpdates failed, backing off");
                    tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                },
            }
        }
    })
}

async fn handle_callback(bot: &Bot, sink: &dyn ActionSink, query: CallbackQuery) {
    let Some(token) = query.data.as_deref() else {
        // Game or inline-mode callbacks carry no data; just acknowledge.
        if let Err(e) = bot.answer_callback_query(&query.id).await {
            warn!(error = %e, "failed to answer dataless callback query");
        }
        return;
    };

    debug!(token, "callback query received");

    let source = query.message.as_ref().map(|message| MessageHandle {
        chat: ChatRef(message.chat().id.0),
        message_id: MessageId(message.id().0),
    });

    let reply = sink.handle_action(token, source).await;

    let mut answer = bot.answer_callback_query(&query.id);
    if let Some(text) = reply.alert {
        answer = answer.text(text).show_alert(reply.show_alert);
    }
    if let Err(e) = answer.await {
        warn!(error = %e, "failed to answer callback query");
    }
}
