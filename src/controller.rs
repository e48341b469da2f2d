//! Attach/detach orchestration and attachment state.
//!
//! One controller per window. Both transitions are idempotent and tolerate an
//! invalid handle; individual user32 failures are logged and swallowed with
//! the state machine advancing optimistically, because a half-reparented
//! window cannot be reliably rolled back and "intended state" beats getting
//! stuck retrying. The one exception: if no desktop surface can be located,
//! attach aborts, undoes its style edit and stays `Detached` rather than
//! reparenting onto nothing.

use crate::error::AttachError;
use crate::locator;
use crate::style;
use crate::winsys::{ExStyle, WindowHandle, WindowSystem};
use tracing::{info, warn};

/// The two bits attach sets: keep the window off the taskbar and out of the
/// activation order while it lives behind the desktop icons.
const ATTACH_BITS: ExStyle = ExStyle(ExStyle::TOOL_WINDOW.0 | ExStyle::NO_ACTIVATE.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentState {
    Detached,
    Attached,
}

/// Orchestrates reparenting one window beneath the desktop icon layer.
pub struct DesktopAttachmentController<S: WindowSystem> {
    sys: S,
    window: WindowHandle,
    state: AttachmentState,
    /// Of the two attach bits, those that were already set before attach.
    /// Detach leaves them alone so a prior owner's styling survives.
    saved_bits: ExStyle,
}

impl<S: WindowSystem> DesktopAttachmentController<S> {
    /// `window` comes from the host's windowing toolkit (or from
    /// [`crate::resolver::resolve_by_title`]) and is held for the
    /// controller's lifetime. An invalid handle makes every operation a
    /// no-op.
    pub fn new(sys: S, window: WindowHandle) -> Self {
        Self {
            sys,
            window,
            state: AttachmentState::Detached,
            saved_bits: ExStyle::default(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.state == AttachmentState::Attached
    }

    pub fn state(&self) -> AttachmentState {
        self.state
    }

    /// Reparent the window beneath the desktop icon layer.
    ///
    /// No-op when already attached or the handle is invalid. Never raises;
    /// callers needing confirmation should re-query parent and style
    /// afterwards.
    pub fn attach(&mut self) {
        if !self.window.is_valid() || self.state == AttachmentState::Attached {
            return;
        }

        self.saved_bits = style::extended_style(&self.sys, self.window).intersect(ATTACH_BITS);
        style::add_bits(&self.sys, self.window, ATTACH_BITS);

        let target = locator::locate_worker(&self.sys);
        if !target.is_valid() {
            // Degrade to "feature off": the window stays a normal,
            // activatable top-level window.
            warn!(error = %AttachError::SurfaceNotFound, "attach aborted");
            style::clear_bits(&self.sys, self.window, ATTACH_BITS.without(self.saved_bits));
            return;
        }

        if let Err(e) = self.sys.set_parent(self.window, target) {
            warn!(?e, "reparent onto desktop surface failed");
        }
        if let Err(e) = self.sys.push_to_bottom(self.window) {
            warn!(?e, "restack to bottom failed");
        }

        self.state = AttachmentState::Attached;
        info!(window = ?self.window, ?target, "attached to desktop layer");
    }

    /// Restore the window to a normal top-level window.
    ///
    /// No-op when already detached or the handle is invalid.
    pub fn detach(&mut self) {
        if !self.window.is_valid() || self.state == AttachmentState::Detached {
            return;
        }

        if let Err(e) = self.sys.set_parent(self.window, WindowHandle::NULL) {
            warn!(?e, "clearing parent failed");
        }
        style::clear_bits(&self.sys, self.window, ATTACH_BITS.without(self.saved_bits));

        self.state = AttachmentState::Detached;
        info!(window = ?self.window, "detached from desktop layer");
    }
}
