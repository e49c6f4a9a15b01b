//! Framehost: Frame Handle Lifecycle and Action Dispatch
//!
//! Browser-side handles for renderer frames. Each handle sequences operations
//! aimed at its remote frame across the "bound but not ready" and "attached"
//! phases, from any calling thread, and goes inert once detached.

pub mod browser;
pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod message;
pub mod remote;
pub mod runner;
pub mod url_util;

pub use browser::{Browser, BrowserClient, DragHandler, StringVisitor};
pub use error::{ConfigError, FrameError};
pub use frame::{FrameHost, FrameId, Lifecycle};
pub use message::{ProcessId, ProcessMessage};
pub use remote::{RemoteFrame, RemoteFrameRecord};
pub use runner::{OwnerThread, TaskPump, TaskRunner};
