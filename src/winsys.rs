//! Window-system capability surface and its Win32 implementation.
//!
//! Everything the attachment core needs from the OS is expressed as the small
//! [`WindowSystem`] trait: handle lookup, child-class probing, z-order sibling
//! queries, extended-style read/write, reparenting, bottom restacking, a timed
//! broadcast send and short-circuiting top-level enumeration. The controller
//! and locator only ever talk to this trait, so the whole state machine runs
//! against an in-memory fake in the unit tests while the binary plugs in
//! [`Win32WindowSystem`].
//!
//! Handles are opaque and borrowed: the windows behind them belong to other
//! processes (or another layer of this one) and may die at any moment. Every
//! method therefore tolerates stale or null handles and reports failure
//! through `Result` instead of panicking.

use anyhow::Result;
use std::fmt;
use std::ops::ControlFlow;

/// Opaque OS window identifier. Zero is the explicit invalid sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub const fn from_raw(raw: isize) -> Self {
        WindowHandle(raw)
    }

    pub const fn raw(self) -> isize {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowHandle(0x{:X})", self.0)
    }
}

/// Extended window style word (GWL_EXSTYLE). Plain bit-set semantics; all
/// mutation helpers preserve bits they were not asked to touch.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ExStyle(pub isize);

impl ExStyle {
    /// WS_EX_TOOLWINDOW: hidden from the taskbar and Alt+Tab.
    pub const TOOL_WINDOW: ExStyle = ExStyle(0x0000_0080);
    /// WS_EX_NOACTIVATE: never takes input activation.
    pub const NO_ACTIVATE: ExStyle = ExStyle(0x0800_0000);

    pub const fn contains(self, bits: ExStyle) -> bool {
        self.0 & bits.0 == bits.0
    }

    pub const fn with(self, bits: ExStyle) -> ExStyle {
        ExStyle(self.0 | bits.0)
    }

    pub const fn without(self, bits: ExStyle) -> ExStyle {
        ExStyle(self.0 & !bits.0)
    }

    pub const fn intersect(self, bits: ExStyle) -> ExStyle {
        ExStyle(self.0 & bits.0)
    }
}

impl std::ops::BitOr for ExStyle {
    type Output = ExStyle;
    fn bitor(self, rhs: ExStyle) -> ExStyle {
        self.with(rhs)
    }
}

impl fmt::Debug for ExStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExStyle(0x{:08X})", self.0)
    }
}

/// Foreign-window operations used by the attachment core.
///
/// Query methods return [`WindowHandle::NULL`] (or a zero style) on failure;
/// mutating methods surface failure as `Err` so callers can log and continue.
/// Implementations must accept invalid handles without panicking.
pub trait WindowSystem {
    /// Find a top-level window by class and/or exact title. First match in
    /// z-order wins; NULL when nothing matches.
    fn find_top_level(&self, class: Option<&str>, title: Option<&str>) -> WindowHandle;

    /// Find a direct child of `parent` with the given window class.
    fn child_by_class(&self, parent: WindowHandle, class: &str) -> WindowHandle;

    /// The next sibling below `window` in z-order, NULL at the bottom.
    fn next_below(&self, window: WindowHandle) -> WindowHandle;

    /// Current extended style word; zero for invalid handles.
    fn extended_style(&self, window: WindowHandle) -> ExStyle;

    /// Overwrite the full extended style word. Callers compute the new word
    /// from the current one; this never merges on its own.
    fn set_extended_style(&self, window: WindowHandle, style: ExStyle) -> Result<()>;

    /// Re-parent `window` under `parent`; NULL parent restores it to a true
    /// top-level window.
    fn set_parent(&self, window: WindowHandle, parent: WindowHandle) -> Result<()>;

    /// Move `window` to the bottom of its sibling z-order without resizing,
    /// repositioning or activating it.
    fn push_to_bottom(&self, window: WindowHandle) -> Result<()>;

    /// Send `msg` to `window` and wait up to `timeout_ms` for it to be
    /// processed. The reply value is discarded; only delivery matters.
    fn send_message_timeout(&self, window: WindowHandle, msg: u32, timeout_ms: u32) -> Result<()>;

    /// Visit every top-level window in current z-order, top first. The scan
    /// stops as soon as the visitor breaks.
    fn for_each_top_level(&self, visit: &mut dyn FnMut(WindowHandle) -> ControlFlow<()>);
}

#[cfg(windows)]
pub use win32::Win32WindowSystem;

#[cfg(windows)]
mod win32 {
    use super::{ExStyle, WindowHandle, WindowSystem};
    use anyhow::{Result, anyhow};
    use std::ops::ControlFlow;
    use widestring::U16CString;
    use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, FindWindowExW, FindWindowW, GW_HWNDNEXT, GWL_EXSTYLE, GetWindow,
        GetWindowLongPtrW, HWND_BOTTOM, SMTO_NORMAL, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE,
        SendMessageTimeoutW, SetParent, SetWindowLongPtrW, SetWindowPos,
    };
    use windows::core::{BOOL, PCWSTR};

    /// Live user32 implementation of [`WindowSystem`].
    #[derive(Clone, Copy, Default)]
    pub struct Win32WindowSystem;

    fn hwnd(h: WindowHandle) -> HWND {
        HWND(h.raw() as *mut core::ffi::c_void)
    }

    fn handle(h: HWND) -> WindowHandle {
        WindowHandle::from_raw(h.0 as isize)
    }

    type Visitor<'a> = &'a mut dyn FnMut(WindowHandle) -> ControlFlow<()>;

    unsafe extern "system" fn enum_proc(h: HWND, lparam: LPARAM) -> BOOL {
        let visit = unsafe { &mut *(lparam.0 as *mut Visitor) };
        match visit(handle(h)) {
            ControlFlow::Continue(()) => BOOL(1),
            ControlFlow::Break(()) => BOOL(0),
        }
    }

    impl WindowSystem for Win32WindowSystem {
        fn find_top_level(&self, class: Option<&str>, title: Option<&str>) -> WindowHandle {
            let (Ok(class), Ok(title)) = (
                class.map(U16CString::from_str).transpose(),
                title.map(U16CString::from_str).transpose(),
            ) else {
                return WindowHandle::NULL;
            };
            let class = class.as_ref().map_or(PCWSTR::null(), |s| PCWSTR(s.as_ptr()));
            let title = title.as_ref().map_or(PCWSTR::null(), |s| PCWSTR(s.as_ptr()));
            unsafe { FindWindowW(class, title) }.map_or(WindowHandle::NULL, handle)
        }

        fn child_by_class(&self, parent: WindowHandle, class: &str) -> WindowHandle {
            if !parent.is_valid() {
                return WindowHandle::NULL;
            }
            let Ok(class) = U16CString::from_str(class) else {
                return WindowHandle::NULL;
            };
            unsafe {
                FindWindowExW(
                    Some(hwnd(parent)),
                    None,
                    PCWSTR(class.as_ptr()),
                    PCWSTR::null(),
                )
            }
            .map_or(WindowHandle::NULL, handle)
        }

        fn next_below(&self, window: WindowHandle) -> WindowHandle {
            if !window.is_valid() {
                return WindowHandle::NULL;
            }
            unsafe { GetWindow(hwnd(window), GW_HWNDNEXT) }.map_or(WindowHandle::NULL, handle)
        }

        fn extended_style(&self, window: WindowHandle) -> ExStyle {
            if !window.is_valid() {
                return ExStyle::default();
            }
            ExStyle(unsafe { GetWindowLongPtrW(hwnd(window), GWL_EXSTYLE) })
        }

        fn set_extended_style(&self, window: WindowHandle, style: ExStyle) -> Result<()> {
            if !window.is_valid() {
                return Ok(());
            }
            // A zero return can also be a legitimate previous style word, so
            // the call is treated as best-effort like the rest of user32.
            unsafe { SetWindowLongPtrW(hwnd(window), GWL_EXSTYLE, style.0) };
            Ok(())
        }

        fn set_parent(&self, window: WindowHandle, parent: WindowHandle) -> Result<()> {
            let parent = parent.is_valid().then(|| hwnd(parent));
            unsafe { SetParent(hwnd(window), parent) }
                .map(|_| ())
                .map_err(|e| anyhow!("SetParent failed: {e}"))
        }

        fn push_to_bottom(&self, window: WindowHandle) -> Result<()> {
            unsafe {
                SetWindowPos(
                    hwnd(window),
                    Some(HWND_BOTTOM),
                    0,
                    0,
                    0,
                    0,
                    SWP_NOSIZE | SWP_NOMOVE | SWP_NOACTIVATE,
                )
            }
            .map_err(|e| anyhow!("SetWindowPos failed: {e}"))
        }

        fn send_message_timeout(
            &self,
            window: WindowHandle,
            msg: u32,
            timeout_ms: u32,
        ) -> Result<()> {
            let mut reply = 0usize;
            let sent = unsafe {
                SendMessageTimeoutW(
                    hwnd(window),
                    msg,
                    WPARAM(0),
                    LPARAM(0),
                    SMTO_NORMAL,
                    timeout_ms,
                    Some(&mut reply),
                )
            };
            if sent.0 == 0 {
                return Err(anyhow!("SendMessageTimeoutW timed out (msg=0x{msg:04X})"));
            }
            Ok(())
        }

        fn for_each_top_level(&self, visit: &mut dyn FnMut(WindowHandle) -> ControlFlow<()>) {
            let mut visit: Visitor = visit;
            // EnumWindows reports an error whenever the callback stops the
            // scan early; that is the short-circuit path, not a failure.
            let _ = unsafe { EnumWindows(Some(enum_proc), LPARAM(&mut visit as *mut Visitor as isize)) };
        }
    }
}
