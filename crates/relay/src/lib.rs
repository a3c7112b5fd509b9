//! Reaction-triggered relay core: watches a chat session for the trigger
//! reaction, routes the target message through one transform pipeline, and
//! delivers the result through the notifier with interactive follow-ups.
//!
//! Everything transport-shaped is a trait here: [`session::SessionClient`]
//! for the watched chat session, [`notify::Notifier`] for the outbound bot
//! identity, and the transform traits from `voxrelay-transforms`. The two
//! identities are coupled only through the correlation cache and the
//! [`notify::ActionSink`] callback channel.

pub mod actions;
pub mod classify;
pub mod config;
pub mod deliver;
pub mod dispatch;
pub mod notify;
pub mod pipeline;
pub mod session;
pub mod split;
pub mod state;

#[cfg(test)]
pub(crate) mod testutil;

pub use {
    actions::ActionHandler,
    classify::ContentKind,
    config::RelayConfig,
    notify::{ActionReply, ActionSink, Notifier},
    session::{Reaction, SessionClient, SessionMessage, UpdateEvent},
    state::Relay,
};
