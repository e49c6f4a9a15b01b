//! Error types for the frame host.
//!
//! Dispatch-style operations are fire-and-forget and never surface these;
//! they are reserved for lifecycle misuse, unsupported capabilities and
//! configuration problems.

use crate::frame::state::Lifecycle;
use thiserror::Error;

/// Frame lifecycle errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("{operation} must run on the owner thread")]
    WrongThread { operation: &'static str },

    #[error("Frame handle has been detached")]
    Detached,

    #[error("Illegal lifecycle transition: {event} while {from:?}")]
    IllegalTransition {
        from: Lifecycle,
        event: &'static str,
    },

    #[error("Unsupported in the browser process: {0}")]
    Unsupported(&'static str),
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
