//! Shared types and telemetry setup used across all voxrelay crates.

pub mod telemetry;
pub mod types;

pub use types::{ChatRef, Control, ControlAction, MessageHandle, MessageId};
