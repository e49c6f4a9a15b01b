//! Frame identifiers
//!
//! A frame id packs the remote process id into the high 32 bits and the
//! remote routing id into the low 32 bits. Both components must be
//! non-negative, so every combined id is positive-or-zero and can never
//! collide with the four negative sentinels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 64-bit frame identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameId(i64);

impl FrameId {
    /// The main frame, as seen by every external caller.
    pub const MAIN: FrameId = FrameId(-1);
    /// Whichever frame currently has focus.
    pub const FOCUSED: FrameId = FrameId(-2);
    /// No frame was specified.
    pub const UNSPECIFIED: FrameId = FrameId(-3);
    /// Unresolved or torn-down identifier.
    pub const INVALID: FrameId = FrameId(-4);

    pub const fn from_raw(raw: i64) -> Self {
        FrameId(raw)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// True for any of the four reserved values.
    pub fn is_sentinel(self) -> bool {
        (Self::INVALID.0..=Self::MAIN.0).contains(&self.0)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FrameId::MAIN => f.write_str("main"),
            FrameId::FOCUSED => f.write_str("focused"),
            FrameId::UNSPECIFIED => f.write_str("unspecified"),
            FrameId::INVALID => f.write_str("invalid"),
            FrameId(raw) => write!(f, "{}:{}", raw >> 32, raw & 0xFFFF_FFFF),
        }
    }
}

/// Combine a remote process id and routing id into a frame id.
///
/// Returns `None` when either component is negative; those pairs have no
/// representation disjoint from the sentinels.
pub fn make_frame_id(process_id: i32, routing_id: i32) -> Option<FrameId> {
    if process_id < 0 || routing_id < 0 {
        return None;
    }
    Some(FrameId((i64::from(process_id) << 32) | i64::from(routing_id)))
}

/// Externally visible id: the main frame always reports [`FrameId::MAIN`].
pub fn effective_id(is_main_frame: bool, frame_id: FrameId) -> FrameId {
    if is_main_frame {
        FrameId::MAIN
    } else {
        frame_id
    }
}
