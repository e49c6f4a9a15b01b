//! Lock-guarded frame state.

use crate::browser::Browser;
use crate::frame::binder::RemoteEndpointBinder;
use crate::frame::id::FrameId;
use crate::frame::queue::ActionQueue;
use crate::remote::RemoteFrameRecord;
use serde::Serialize;
use std::sync::{Arc, Weak};

/// Lifecycle of a frame handle.
///
/// `Unbound -> Bound -> Attached`, and any of those `-> Detached`, which is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// No remote record yet; dispatches are dropped.
    Unbound,
    /// Record bound, remote not ready; dispatches are queued.
    Bound,
    /// Remote ready; dispatches run immediately.
    Attached,
    /// Torn down; dispatches are dropped forever.
    Detached,
}

/// Remote endpoint link, carrying the record while bound.
pub(crate) enum Endpoint {
    Unbound,
    Bound(Arc<dyn RemoteFrameRecord>),
    Attached(Arc<dyn RemoteFrameRecord>),
    Detached,
}

impl Endpoint {
    pub(crate) fn lifecycle(&self) -> Lifecycle {
        match self {
            Endpoint::Unbound => Lifecycle::Unbound,
            Endpoint::Bound(_) => Lifecycle::Bound,
            Endpoint::Attached(_) => Lifecycle::Attached,
            Endpoint::Detached => Lifecycle::Detached,
        }
    }

    pub(crate) fn record(&self) -> Option<&Arc<dyn RemoteFrameRecord>> {
        match self {
            Endpoint::Bound(record) | Endpoint::Attached(record) => Some(record),
            Endpoint::Unbound | Endpoint::Detached => None,
        }
    }
}

/// Everything behind the frame's single lock.
///
/// `session` is `None` exactly when `endpoint` is `Detached`.
pub(crate) struct FrameState {
    pub(crate) frame_id: FrameId,
    pub(crate) parent_frame_id: FrameId,
    pub(crate) is_focused: bool,
    pub(crate) url: String,
    pub(crate) name: String,
    pub(crate) endpoint: Endpoint,
    pub(crate) session: Option<Weak<dyn Browser>>,
    pub(crate) queue: ActionQueue,
    pub(crate) binder: RemoteEndpointBinder,
}

impl FrameState {
    pub(crate) fn new(
        session: Weak<dyn Browser>,
        is_main_frame: bool,
        parent_frame_id: FrameId,
    ) -> Self {
        Self {
            frame_id: FrameId::INVALID,
            parent_frame_id,
            // The main frame always starts focused.
            is_focused: is_main_frame,
            url: String::new(),
            name: String::new(),
            endpoint: Endpoint::Unbound,
            session: Some(session),
            queue: ActionQueue::new(),
            binder: RemoteEndpointBinder::new(),
        }
    }

    pub(crate) fn browser(&self) -> Option<Arc<dyn Browser>> {
        self.session.as_ref()?.upgrade()
    }

    /// Whether `record` is still the bound record, attached or not.
    pub(crate) fn is_bound_to(&self, record: &Arc<dyn RemoteFrameRecord>) -> bool {
        self.endpoint
            .record()
            .is_some_and(|bound| same_record(bound, record))
    }

    pub(crate) fn is_attached_to(&self, record: &Arc<dyn RemoteFrameRecord>) -> bool {
        match &self.endpoint {
            Endpoint::Attached(attached) => same_record(attached, record),
            _ => false,
        }
    }
}

// Compare data pointers only; vtable pointers for one object may differ.
fn same_record(a: &Arc<dyn RemoteFrameRecord>, b: &Arc<dyn RemoteFrameRecord>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}
