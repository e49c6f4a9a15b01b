//! Browser Collaborators
//!
//! The owning browser, its client and the client-side handlers a frame host
//! reports to. A frame host only ever holds a `Weak<dyn Browser>`; the
//! browser owns the frames.

use crate::frame::id::FrameId;
use crate::frame::FrameHost;
use crate::message::{ProcessId, ProcessMessage};
use crate::remote::Referrer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why focus moved to a frame's browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusSource {
    Navigation,
    System,
}

/// Page transition bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageTransition(u32);

impl PageTransition {
    pub const LINK: PageTransition = PageTransition(0);
    pub const TYPED: PageTransition = PageTransition(1);
    pub const RELOAD: PageTransition = PageTransition(8);
    pub const FROM_ADDRESS_BAR: PageTransition = PageTransition(0x0200_0000);

    /// A user-initiated load, as if typed into the address bar.
    pub const EXPLICIT: PageTransition =
        PageTransition(Self::TYPED.0 | Self::FROM_ADDRESS_BAR.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: PageTransition) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for PageTransition {
    type Output = PageTransition;

    fn bitor(self, rhs: Self) -> Self::Output {
        PageTransition(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOpenDisposition {
    #[default]
    CurrentTab,
    NewForegroundTab,
    NewBackgroundTab,
    NewWindow,
}

/// Top-level navigation issued through the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenUrlParams {
    pub url: String,
    pub referrer: Option<Referrer>,
    pub disposition: WindowOpenDisposition,
    pub transition: PageTransition,
    pub is_renderer_initiated: bool,
    pub extra_headers: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A region of the frame and whether it drags the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraggableRegion {
    pub bounds: Rect,
    pub draggable: bool,
}

/// The browser owning a collection of frames.
pub trait Browser: Send + Sync {
    /// Look up a live frame by id.
    fn frame(&self, id: FrameId) -> Option<Arc<FrameHost>>;

    fn on_set_focus(&self, source: FocusSource);

    /// Navigate the main frame through the browser's navigation controller.
    fn load_main_frame_url(&self, params: OpenUrlParams);

    /// Show text (page source) in a separate view.
    fn view_text(&self, text: String);

    fn on_did_finish_load(&self, _frame: &Arc<FrameHost>, _url: &str, _http_status_code: i32) {}

    /// Structurally unique name of a frame tree node, used when a frame has
    /// no assigned name.
    fn unique_name(&self, frame_tree_node_id: i64) -> Option<String>;

    fn client(&self) -> Option<Arc<dyn BrowserClient>>;
}

/// Embedder callbacks.
pub trait BrowserClient: Send + Sync {
    /// Returns true when the message was handled.
    fn on_process_message_received(
        &self,
        _browser: &Arc<dyn Browser>,
        _frame: &Arc<FrameHost>,
        _source: ProcessId,
        _message: &ProcessMessage,
    ) -> bool {
        false
    }

    fn drag_handler(&self) -> Option<Arc<dyn DragHandler>> {
        None
    }
}

pub trait DragHandler: Send + Sync {
    fn on_draggable_regions_changed(
        &self,
        browser: &Arc<dyn Browser>,
        frame: &Arc<FrameHost>,
        regions: &[DraggableRegion],
    );
}

/// Receives the text of a source or text request.
pub trait StringVisitor: Send + Sync {
    fn visit(&self, text: &str);
}

impl<F> StringVisitor for F
where
    F: Fn(&str) + Send + Sync,
{
    fn visit(&self, text: &str) {
        self(text)
    }
}
