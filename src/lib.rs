//! Desktop-layer window attachment for Windows.
//!
//! Re-parents a host application's top-level window beneath the desktop icon
//! layer (the shell's hidden WorkerW surface) so it behaves as live wallpaper
//! instead of a normal foreground window, and reverses the whole edit on
//! detach.
//!
//! High-level flow:
//! 1. The host obtains the window's native handle from its toolkit, or
//!    resolves it by exact title via [`resolver::resolve_by_title`].
//! 2. [`DesktopAttachmentController::attach`] marks the window tool-window +
//!    no-activate (additively, preserving unrelated style bits), discovers
//!    the WorkerW surface through the Progman `0x052C` protocol, re-parents
//!    the window onto it and restacks it to the bottom without moving,
//!    resizing or activating it.
//! 3. [`DesktopAttachmentController::detach`] clears the parent and restores
//!    the style bits it set.
//!
//! All OS access goes through the [`WindowSystem`] capability trait so the
//! orchestration is unit-testable against a fake; the shell hierarchy is
//! externally owned and every operation is best-effort, logged via `tracing`
//! and never escalated: a failed attachment degrades to "feature off", never
//! to a broken window.

pub mod controller;
pub mod error;
pub mod locator;
pub mod resolver;
pub mod style;
pub mod winsys;

#[cfg(test)]
mod fake;

pub use controller::{AttachmentState, DesktopAttachmentController};
pub use error::AttachError;
#[cfg(windows)]
pub use winsys::Win32WindowSystem;
pub use winsys::{ExStyle, WindowHandle, WindowSystem};
