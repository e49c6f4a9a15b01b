//! Deferred actions awaiting attachment.
//!
//! Only touched on the owner thread. Non-empty while the frame is bound but
//! not yet attached, or while attach is still draining it. Empty after
//! detach.

use crate::remote::RemoteFrame;
use std::collections::VecDeque;

/// Operation to run against a live remote frame connection.
pub type FrameAction = Box<dyn FnOnce(&dyn RemoteFrame) + Send + 'static>;

/// FIFO queue of [`FrameAction`]s.
#[derive(Default)]
pub struct ActionQueue {
    actions: VecDeque<FrameAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: FrameAction) {
        self.actions.push_back(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Remove the oldest queued action.
    pub fn pop(&mut self) -> Option<FrameAction> {
        self.actions.pop_front()
    }

    /// Remove every queued action, oldest first, leaving the queue empty.
    pub fn take(&mut self) -> VecDeque<FrameAction> {
        std::mem::take(&mut self.actions)
    }
}

impl std::fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionQueue")
            .field("pending", &self.actions.len())
            .finish()
    }
}
