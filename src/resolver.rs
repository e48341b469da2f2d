//! Logical window identifier to native handle resolution.
//!
//! Hosts that already hold a native handle from their windowing toolkit skip
//! this entirely and construct the controller directly; title lookup is the
//! fallback path. It is a pure query with no fallback search, and a miss is
//! non-fatal because titles race with window creation and destruction.

use crate::error::AttachError;
use crate::winsys::{WindowHandle, WindowSystem};

/// Resolve the exact title of a top-level window to its handle.
pub fn resolve_by_title(
    sys: &impl WindowSystem,
    title: &str,
) -> Result<WindowHandle, AttachError> {
    let handle = sys.find_top_level(None, Some(title));
    if handle.is_valid() {
        Ok(handle)
    } else {
        Err(AttachError::WindowNotFound(title.to_owned()))
    }
}
