//! Extended-style read-modify-write helpers.
//!
//! Style edits are always additive or subtractive over the current word,
//! never an absolute constant: the window-creation layer may have set bits of
//! its own (layered, transparent, ...) that must survive attach and detach.
//! Failures are logged and swallowed; a stale handle mid-call is normal.

use crate::winsys::{ExStyle, WindowHandle, WindowSystem};
use tracing::warn;

/// Current extended style word; zero for an invalid handle.
pub fn extended_style(sys: &impl WindowSystem, window: WindowHandle) -> ExStyle {
    if !window.is_valid() {
        return ExStyle::default();
    }
    sys.extended_style(window)
}

/// Set `bits` on top of the window's current extended style.
pub fn add_bits(sys: &impl WindowSystem, window: WindowHandle, bits: ExStyle) {
    if !window.is_valid() {
        return;
    }
    let current = sys.extended_style(window);
    if let Err(e) = sys.set_extended_style(window, current.with(bits)) {
        warn!(?window, ?bits, ?e, "extended style update failed");
    }
}

/// Clear `bits` from the window's current extended style.
pub fn clear_bits(sys: &impl WindowSystem, window: WindowHandle, bits: ExStyle) {
    if !window.is_valid() {
        return;
    }
    let current = sys.extended_style(window);
    if let Err(e) = sys.set_extended_style(window, current.without(bits)) {
        warn!(?window, ?bits, ?e, "extended style restore failed");
    }
}
