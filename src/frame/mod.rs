//! Frames
//!
//! Browser-side frame handles and the pieces they are built from: identity,
//! lock-guarded state, the pre-attach action queue and the lazily bound
//! remote connection.

pub mod binder;
pub mod host;
pub mod id;
pub mod queue;
pub mod state;

pub use binder::RemoteEndpointBinder;
pub use host::FrameHost;
pub use id::{effective_id, make_frame_id, FrameId};
pub use queue::{ActionQueue, FrameAction};
pub use state::Lifecycle;
