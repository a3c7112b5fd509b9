//! Delivery engine: header composition, chunked sends, control placement.

use std::time::Duration;

use {
    anyhow::Result,
    tracing::{info, warn},
};

use voxrelay_common::{ChatRef, Control, MessageHandle};

use crate::{config::RelayConfig, notify::Notifier, split};

/// Header fields for one delivered result.
#[derive(Debug, Clone, Default)]
pub struct DeliveryHeader<'a> {
    /// Content-kind label, shown bold. May contain markup of its own.
    pub kind_label: &'a str,
    pub chat_title: Option<&'a str>,
    pub sender_name: Option<&'a str>,
}

impl DeliveryHeader<'_> {
    /// Render the header block plus separator. Interpolated fields are
    /// escaped here; the label is trusted markup.
    #[must_use]
    pub fn compose(&self) -> String {
        let mut header = format!("<b>{}</b>", self.kind_label);
        let origin: Vec<String> = [self.chat_title, self.sender_name]
            .into_iter()
            .flatten()
            .map(split::escape_html)
            .collect();
        if !origin.is_empty() {
            header.push_str(" — ");
            header.push_str(&origin.join(", "));
        }
        header.push_str("\n\n");
        header
    }
}

/// Send one result: compose the header, chunk the body, attach controls to
/// the final chunk only, pace the sends. Chunks go out strictly in order and
/// a failed chunk aborts the rest.
///
/// `body_html` must already be escaped (via [`split::escape_html`]) or be
/// trusted markup built from escaped parts; it is chunked as-is so length
/// accounting sees final bytes.
///
/// Returns the handle of the last sent message, the one carrying the
/// controls.
pub async fn format_and_send(
    notifier: &dyn Notifier,
    config: &RelayConfig,
    chat: ChatRef,
    header: &DeliveryHeader<'_>,
    body_html: &str,
    controls: &[Control],
) -> Result<MessageHandle> {
    let chunks = split::split_with_header(&header.compose(), body_html, config.max_chunk);
    let last_idx = chunks.len().saturating_sub(1);

    info!(
        chat_id = chat.0,
        body_len = body_html.len(),
        chunk_count = chunks.len(),
        "delivering result"
    );

    let mut last_handle = None;
    for (i, chunk) in chunks.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(config.chunk_delay_ms)).await;
        }
        let chunk_controls = if i == last_idx { controls } else { &[] };
        match notifier.send_message(chat, chunk, chunk_controls).await {
            Ok(handle) => last_handle = Some(handle),
            Err(e) => {
                warn!(
                    chat_id = chat.0,
                    chunk = i,
                    chunk_count = chunks.len(),
                    error = %e,
                    "chunk send failed, dropping remainder"
                );
                return Err(e);
            },
        }
    }

    last_handle.ok_or_else(|| anyhow::anyhow!("nothing to deliver"))
}
