//! In-memory window system for the unit tests.
//!
//! Models just enough of the shell: a flat top-level window list in z-order
//! (top first), per-window class/title/child classes, a style table, a parent
//! table, and logs of restacks, broadcasts and enumeration visits. Failure
//! flags let tests inject user32-style errors per operation. Clones share the
//! same underlying state so a test can keep inspecting after handing the
//! system to a controller.

use crate::winsys::{ExStyle, WindowHandle, WindowSystem};
use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::rc::Rc;

struct FakeWindow {
    handle: WindowHandle,
    class: String,
    title: String,
    child_classes: Vec<String>,
}

#[derive(Default)]
struct Inner {
    // z-order, top first
    order: Vec<FakeWindow>,
    styles: HashMap<WindowHandle, ExStyle>,
    parents: HashMap<WindowHandle, WindowHandle>,
    bottomed: Vec<WindowHandle>,
    messages: Vec<(WindowHandle, u32)>,
    visited: Vec<WindowHandle>,
    style_writes: usize,
    fail_set_style: bool,
    fail_reparent: bool,
    fail_restack: bool,
    fail_broadcast: bool,
}

#[derive(Clone, Default)]
pub struct FakeWindowSystem {
    inner: Rc<RefCell<Inner>>,
}

impl FakeWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level window at the bottom of the current z-order.
    pub fn add_window(&self, raw: isize, class: &str, title: &str) -> WindowHandle {
        let handle = WindowHandle::from_raw(raw);
        self.inner.borrow_mut().order.push(FakeWindow {
            handle,
            class: class.to_owned(),
            title: title.to_owned(),
            child_classes: Vec::new(),
        });
        handle
    }

    /// Give an existing top-level window a direct child of `class`.
    pub fn add_child(&self, parent: WindowHandle, class: &str) {
        let mut inner = self.inner.borrow_mut();
        let w = inner
            .order
            .iter_mut()
            .find(|w| w.handle == parent)
            .expect("unknown parent window");
        w.child_classes.push(class.to_owned());
    }

    pub fn set_style(&self, window: WindowHandle, style: ExStyle) {
        self.inner.borrow_mut().styles.insert(window, style);
    }

    pub fn style_of(&self, window: WindowHandle) -> ExStyle {
        self.inner
            .borrow()
            .styles
            .get(&window)
            .copied()
            .unwrap_or_default()
    }

    /// Last parent recorded for `window`; `Some(NULL)` after an explicit
    /// unparent, `None` if never reparented.
    pub fn parent_of(&self, window: WindowHandle) -> Option<WindowHandle> {
        self.inner.borrow().parents.get(&window).copied()
    }

    pub fn bottomed(&self) -> Vec<WindowHandle> {
        self.inner.borrow().bottomed.clone()
    }

    pub fn messages(&self) -> Vec<(WindowHandle, u32)> {
        self.inner.borrow().messages.clone()
    }

    /// Windows handed to the enumeration visitor, in order.
    pub fn visited(&self) -> Vec<WindowHandle> {
        self.inner.borrow().visited.clone()
    }

    /// Number of `set_extended_style` calls that reached the fake.
    pub fn style_writes(&self) -> usize {
        self.inner.borrow().style_writes
    }

    pub fn fail_set_style(&self, fail: bool) {
        self.inner.borrow_mut().fail_set_style = fail;
    }

    pub fn fail_reparent(&self, fail: bool) {
        self.inner.borrow_mut().fail_reparent = fail;
    }

    pub fn fail_restack(&self, fail: bool) {
        self.inner.borrow_mut().fail_restack = fail;
    }

    pub fn fail_broadcast(&self, fail: bool) {
        self.inner.borrow_mut().fail_broadcast = fail;
    }
}

impl WindowSystem for FakeWindowSystem {
    fn find_top_level(&self, class: Option<&str>, title: Option<&str>) -> WindowHandle {
        let inner = self.inner.borrow();
        inner
            .order
            .iter()
            .find(|w| {
                class.is_none_or(|c| w.class == c) && title.is_none_or(|t| w.title == t)
            })
            .map_or(WindowHandle::NULL, |w| w.handle)
    }

    fn child_by_class(&self, parent: WindowHandle, class: &str) -> WindowHandle {
        let inner = self.inner.borrow();
        let Some(w) = inner.order.iter().find(|w| w.handle == parent) else {
            return WindowHandle::NULL;
        };
        if w.child_classes.iter().any(|c| c == class) {
            // Synthetic child handle; only validity matters to callers.
            WindowHandle::from_raw((parent.raw() << 8) | 1)
        } else {
            WindowHandle::NULL
        }
    }

    fn next_below(&self, window: WindowHandle) -> WindowHandle {
        let inner = self.inner.borrow();
        let Some(pos) = inner.order.iter().position(|w| w.handle == window) else {
            return WindowHandle::NULL;
        };
        inner
            .order
            .get(pos + 1)
            .map_or(WindowHandle::NULL, |w| w.handle)
    }

    fn extended_style(&self, window: WindowHandle) -> ExStyle {
        self.style_of(window)
    }

    fn set_extended_style(&self, window: WindowHandle, style: ExStyle) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_set_style {
            return Err(anyhow!("SetWindowLongPtrW rejected"));
        }
        inner.style_writes += 1;
        inner.styles.insert(window, style);
        Ok(())
    }

    fn set_parent(&self, window: WindowHandle, parent: WindowHandle) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_reparent {
            return Err(anyhow!("SetParent rejected"));
        }
        inner.parents.insert(window, parent);
        Ok(())
    }

    fn push_to_bottom(&self, window: WindowHandle) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_restack {
            return Err(anyhow!("SetWindowPos rejected"));
        }
        inner.bottomed.push(window);
        Ok(())
    }

    fn send_message_timeout(&self, window: WindowHandle, msg: u32, _timeout_ms: u32) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.messages.push((window, msg));
        if inner.fail_broadcast {
            return Err(anyhow!("SendMessageTimeoutW timed out"));
        }
        Ok(())
    }

    fn for_each_top_level(&self, visit: &mut dyn FnMut(WindowHandle) -> ControlFlow<()>) {
        // Snapshot the handles first: the visitor calls back into this fake
        // and must not observe a held borrow.
        let handles: Vec<WindowHandle> =
            self.inner.borrow().order.iter().map(|w| w.handle).collect();
        for handle in handles {
            self.inner.borrow_mut().visited.push(handle);
            if visit(handle).is_break() {
                return;
            }
        }
    }
}
