//! Desktop background surface discovery.
//!
//! The shell never exposes the wallpaper host window through a stable API; it
//! has to be coaxed into existence and then found by walking the top-level
//! z-order:
//!
//! 1. Find `Progman`, the shell's root desktop window.
//! 2. Send it the undocumented `0x052C` message with a bounded timeout. The
//!    side effect is what matters: it makes the shell lazily create a WorkerW
//!    surface behind the desktop icons. The reply is discarded and a timeout
//!    is harmless (the surface may already exist from an earlier run).
//! 3. Scan top-level windows for the one hosting a `SHELLDLL_DefView` child
//!    (the icon view), stopping at the first hit.
//! 4. The attachment target is the *next sibling below* that window, not the
//!    window itself: the icon layer and the wallpaper layer are siblings, and
//!    parenting onto the icon host would break desktop icon hit-testing.
//! 5. No such sibling (pre-WorkerW shells, composition off) falls back to
//!    Progman itself.

use crate::winsys::{WindowHandle, WindowSystem};
use std::ops::ControlFlow;
use tracing::{debug, warn};

/// Window class of the shell's root desktop window.
pub const PROGMAN_CLASS: &str = "Progman";
/// Window class of the desktop icon view child.
pub const DEFVIEW_CLASS: &str = "SHELLDLL_DefView";

/// Undocumented Progman message that spawns the WorkerW wallpaper surface.
const WM_SPAWN_WORKERW: u32 = 0x052C;
const SPAWN_TIMEOUT_MS: u32 = 1000;

/// Locate the surface wallpaper content should be parented onto.
///
/// Returns the WorkerW sibling when present, Progman as the fallback, and
/// NULL only when even Progman is missing, which callers must treat as
/// "attachment unavailable".
pub fn locate_worker(sys: &impl WindowSystem) -> WindowHandle {
    let progman = sys.find_top_level(Some(PROGMAN_CLASS), None);
    if !progman.is_valid() {
        warn!("Progman not found; no shell desktop to attach to");
        return WindowHandle::NULL;
    }

    if let Err(e) = sys.send_message_timeout(progman, WM_SPAWN_WORKERW, SPAWN_TIMEOUT_MS) {
        debug!(?e, "WorkerW spawn message did not complete; scanning anyway");
    }

    let mut target = WindowHandle::NULL;
    sys.for_each_top_level(&mut |window| {
        if sys.child_by_class(window, DEFVIEW_CLASS).is_valid() {
            target = sys.next_below(window);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });

    if target.is_valid() {
        debug!(?target, "WorkerW sibling located");
        target
    } else {
        debug!(?progman, "no WorkerW sibling; using Progman");
        progman
    }
}
