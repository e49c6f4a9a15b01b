//! Integration tests for the frame host

mod config_integration;
mod dispatch;
mod inbound;
