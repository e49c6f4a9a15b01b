//! Remote Frame Collaborators
//!
//! The host-side record of a renderer frame and the control channel used to
//! talk to it. Both are supplied by the embedder; the frame host only drives
//! them.

use crate::frame::id::{make_frame_id, FrameId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Host-side record of a remote frame.
pub trait RemoteFrameRecord: Send + Sync {
    /// Id of the remote process hosting this frame.
    fn process_id(&self) -> i32;

    /// Routing id of the frame inside its process.
    fn routing_id(&self) -> i32;

    /// Node id in the browser's frame tree, used for unique-name lookup.
    fn frame_tree_node_id(&self) -> i64;

    fn last_committed_url(&self) -> String;

    /// Name assigned to the frame element; may be empty.
    fn frame_name(&self) -> String;

    /// Record of the parent frame, `None` for the main frame.
    fn parent(&self) -> Option<Arc<dyn RemoteFrameRecord>>;

    /// Look up the remote frame's control interface.
    ///
    /// Returns `None` when the record has no interface provider.
    fn connect(&self) -> Option<Arc<dyn RemoteFrame>>;

    /// Run script directly in the frame with a synthetic user gesture.
    fn execute_javascript_with_user_gesture_for_tests(&self, code: &str);
}

/// Frame id for a record, or [`FrameId::INVALID`] when its ids cannot be packed.
pub fn record_frame_id(record: &dyn RemoteFrameRecord) -> FrameId {
    make_frame_id(record.process_id(), record.routing_id()).unwrap_or(FrameId::INVALID)
}

/// Callback receiving the text response of a named command.
pub type TextCallback = Box<dyn FnOnce(SharedText) + Send + 'static>;

/// Control channel to a live remote frame.
pub trait RemoteFrame: Send + Sync {
    fn send_command(&self, command: &str);

    fn send_command_with_response(&self, command: &str, callback: TextCallback);

    fn send_javascript(&self, code: &str, script_url: &str, start_line: i32);

    fn load_request(&self, params: RequestParams);

    fn send_message(&self, name: &str, arguments: Vec<Value>);

    fn move_or_resize_started(&self);

    fn did_stop_loading(&self);
}

/// Read-only block of text shared by the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedText(Arc<[u8]>);

impl SharedText {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        SharedText(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode as UTF-8, replacing invalid sequences.
    pub fn decode(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for SharedText {
    fn from(text: &str) -> Self {
        SharedText(Arc::from(text.as_bytes()))
    }
}

/// Referrer policy sent with a navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferrerPolicy {
    #[default]
    Default,
    NoReferrer,
    Origin,
    StrictOrigin,
    SameOrigin,
    UnsafeUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    pub url: String,
    #[serde(default)]
    pub policy: ReferrerPolicy,
}

/// Structured navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub referrer: Option<Referrer>,
    /// Extra headers, CRLF separated.
    #[serde(default)]
    pub headers: String,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RequestParams {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            referrer: None,
            headers: String::new(),
        }
    }
}
