use std::{sync::Arc, time::Duration};

use {
    voxrelay_cache::ResultCache,
    voxrelay_common::ChatRef,
    voxrelay_transforms::{Summarizer, TextFixer, Transcriber},
};

use crate::{config::RelayConfig, notify::Notifier, session::SessionClient};

/// Shared runtime state: configuration, the two transport capabilities, the
/// three transforms, and the correlation cache that ties them together.
pub struct Relay {
    pub(crate) config: RelayConfig,
    pub(crate) session: Arc<dyn SessionClient>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) cache: ResultCache,
    pub(crate) transcriber: Arc<dyn Transcriber>,
    pub(crate) fixer: Arc<dyn TextFixer>,
    pub(crate) summarizer: Arc<dyn Summarizer>,
}

impl Relay {
    pub fn new(
        config: RelayConfig,
        session: Arc<dyn SessionClient>,
        notifier: Arc<dyn Notifier>,
        transcriber: Arc<dyn Transcriber>,
        fixer: Arc<dyn TextFixer>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Arc<Self> {
        let cache = ResultCache::new(Duration::from_secs(config.cache_ttl_secs));
        Arc::new(Self {
            config,
            session,
            notifier,
            cache,
            transcriber,
            fixer,
            summarizer,
        })
    }

    /// The chat results are delivered to: the operator's own chat with the
    /// bot identity.
    pub(crate) fn delivery_chat(&self) -> ChatRef {
        ChatRef(self.config.operator_id)
    }
}
