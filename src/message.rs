//! Process messages exchanged with the renderer side.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Process a message originates from or is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessId {
    Browser,
    Renderer,
}

/// Named message with a JSON argument list.
///
/// The argument list can be taken exactly once. After that, or after
/// `detach`, the message is invalid and its arguments can no longer be read.
#[derive(Debug)]
pub struct ProcessMessage {
    name: String,
    read_only: bool,
    arguments: Mutex<Option<Vec<Value>>>,
}

impl ProcessMessage {
    pub fn new(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            read_only: false,
            arguments: Mutex::new(Some(arguments)),
        }
    }

    /// Read-only view over an inbound payload.
    pub(crate) fn read_only_view(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            read_only: true,
            arguments: Mutex::new(Some(arguments)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self) -> bool {
        self.arguments.lock().is_some()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Copy of the current arguments, `None` once taken or detached.
    pub fn arguments(&self) -> Option<Vec<Value>> {
        self.arguments.lock().clone()
    }

    /// Append an argument. Fails on read-only or invalid messages.
    pub fn push_argument(&self, value: Value) -> bool {
        if self.read_only {
            return false;
        }
        match self.arguments.lock().as_mut() {
            Some(arguments) => {
                arguments.push(value);
                true
            }
            None => false,
        }
    }

    /// Transfer ownership of the argument list out of the message.
    pub fn take_argument_list(&self) -> Option<Vec<Value>> {
        self.arguments.lock().take()
    }

    /// Release the payload; the message becomes invalid.
    pub(crate) fn detach(&self) {
        self.arguments.lock().take();
    }
}
